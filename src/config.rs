use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_PATH: &str = "/api";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub api: ApiConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    /// Exact origins allowed to call the API.
    pub allowed_origins: Vec<String>,
    /// Optional regex matching preview-deployment origins
    /// (e.g. `^https://taskpulse-.*\.vercel\.app$`).
    pub preview_origin_pattern: Option<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_path: String,
    pub enable_swagger: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret shared with anything that verifies our tokens.
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    /// Explicit public origin of the deployment. When unset, the
    /// platform-provided DEPLOYMENT_URL is used, then localhost.
    pub public_url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/taskpulse_db".to_string(),
            max_connections: 16,
            min_connections: 4,
            acquire_timeout: 5,
            run_migrations: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            address: "127.0.0.1".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            preview_origin_pattern: None,
            allow_credentials: true,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_API_BASE_PATH.to_string(),
            enable_swagger: true,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_days: 7,
            public_url: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            cors: CorsConfig::default(),
            api: ApiConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Struct defaults
    /// 2. Taskpulse.toml (base configuration file)
    /// 3. Environment variables prefixed with TASKPULSE_ (sections split
    ///    with a double underscore, e.g. TASKPULSE_DATABASE__URL)
    /// 4. DATABASE_URL, JWT_SECRET and PUBLIC_APP_URL as bare variables
    pub fn load() -> Result<Self, figment::Error> {
        // Plain providers, no profile nesting: the toml file holds
        // `[database]`, `[server]`, ... tables directly.
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("Taskpulse.toml"))
            .merge(Env::prefixed("TASKPULSE_").split("__"))
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database.url".into()))
            .merge(Env::raw().only(&["JWT_SECRET"]).map(|_| "auth.jwt_secret".into()))
            .merge(Env::raw().only(&["PUBLIC_APP_URL"]).map(|_| "auth.public_url".into()));

        figment.extract()
    }

    /// Resolve the public origin of this deployment. Used as both JWT
    /// issuer and audience, and appended to the CORS allow-list.
    ///
    /// Resolution order: explicit `auth.public_url`, then the
    /// platform-provided DEPLOYMENT_URL variable (scheme added when the
    /// platform omits it), then a localhost fallback on the configured port.
    pub fn resolve_public_origin(&self) -> String {
        if let Some(url) = &self.auth.public_url {
            let trimmed = url.trim().trim_end_matches('/');
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }

        if let Ok(url) = std::env::var("DEPLOYMENT_URL") {
            let trimmed = url.trim().trim_end_matches('/');
            if !trimmed.is_empty() {
                return if trimmed.contains("://") {
                    trimmed.to_string()
                } else {
                    format!("https://{}", trimmed)
                };
            }
        }

        format!("http://localhost:{}", self.server.port)
    }
}
