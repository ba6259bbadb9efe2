use rocket::serde::Serialize;
use schemars::JsonSchema;

#[derive(Debug, Serialize, JsonSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            database: "ok",
        }
    }

    pub fn degraded() -> Self {
        Self {
            status: "degraded",
            database: "unavailable",
        }
    }
}
