use crate::config::{AuthConfig, Config};
use crate::error::app_error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{FromRequest, Outcome as RequestOutcome, Request};
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::{Object, Responses, SecurityRequirement, SecurityScheme, SecuritySchemeData};
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by every access token. Issuer and audience are both the
/// resolved public origin of the deployment; verification rejects tokens
/// minted for any other origin.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, origin: &str, ttl_days: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email,
            iss: origin.to_string(),
            aud: origin.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(ttl_days)).timestamp(),
        }
    }
}

/// A freshly signed token together with its lifetime in seconds.
#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

pub fn issue_token(user_id: Uuid, email: &str, origin: &str, auth: &AuthConfig) -> Result<IssuedToken, AppError> {
    let claims = Claims::new(user_id, email.to_string(), origin, auth.token_ttl_days);
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.jwt_secret.as_bytes())).map_err(|e| {
        AppError::TokenIssuance {
            message: format!("Failed to sign token: {}", e),
        }
    })?;

    Ok(IssuedToken {
        token,
        expires_in: auth.token_ttl_days * 24 * 60 * 60,
    })
}

/// Verify signature, expiry, issuer and audience. Any failure collapses to
/// `Unauthorized` so callers cannot probe which check rejected the token.
pub fn decode_token(token: &str, origin: &str, auth: &AuthConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[origin]);
    validation.set_audience(&[origin]);

    let data = decode::<Claims>(token, &DecodingKey::from_secret(auth.jwt_secret.as_bytes()), &validation).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        AppError::Unauthorized
    })?;

    Ok(data.claims)
}

fn bearer_token<'r>(req: &'r Request<'_>) -> Option<&'r str> {
    let header = req.headers().get_one("Authorization")?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// The authenticated caller, extracted from the Authorization header.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        let Some(token) = bearer_token(req) else {
            return Outcome::Error((Status::Unauthorized, AppError::Unauthorized));
        };

        let config = match req.rocket().state::<Config>() {
            Some(config) => config,
            None => return Outcome::Error((Status::InternalServerError, AppError::Unauthorized)),
        };

        match decode_token(token, &config.resolve_public_origin(), &config.auth) {
            Ok(claims) => {
                let current_user = CurrentUser {
                    id: claims.sub,
                    email: claims.email,
                };
                req.local_cache(|| Some(current_user.clone()));
                Outcome::Success(current_user)
            }
            Err(err) => Outcome::Error((Status::Unauthorized, err)),
        }
    }
}

impl<'a> OpenApiFromRequest<'a> for CurrentUser {
    fn from_request_input(_gen: &mut OpenApiGenerator, _name: String, _required: bool) -> rocket_okapi::Result<RequestHeaderInput> {
        let security_scheme = SecurityScheme {
            description: Some("Bearer JWT. Obtain a token via POST /auth/login.".to_string()),
            data: SecuritySchemeData::Http {
                scheme: "bearer".to_string(),
                bearer_format: Some("JWT".to_string()),
            },
            extensions: Object::default(),
        };

        let mut security_req = SecurityRequirement::new();
        security_req.insert("bearerAuth".to_string(), Vec::new());

        Ok(RequestHeaderInput::Security("bearerAuth".to_string(), security_scheme, security_req))
    }

    fn get_responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response};
        let mut responses = Responses::default();
        responses.responses.insert(
            "401".to_string(),
            RefOr::Object(Response {
                description: "Unauthorized - Authentication required".to_string(),
                ..Default::default()
            }),
        );
        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;

    fn test_auth() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_days: 7,
            public_url: None,
        }
    }

    const ORIGIN: &str = "http://localhost:8000";

    #[test]
    fn issued_token_round_trips_claims() {
        let auth = test_auth();
        let user_id = Uuid::new_v4();

        let issued = issue_token(user_id, "a@example.com", ORIGIN, &auth).unwrap();
        assert_eq!(issued.expires_in, 7 * 24 * 60 * 60);

        let claims = decode_token(&issued.token, ORIGIN, &auth).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.iss, ORIGIN);
        assert_eq!(claims.aud, ORIGIN);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn token_for_other_origin_is_rejected() {
        let auth = test_auth();
        let issued = issue_token(Uuid::new_v4(), "a@example.com", "https://evil.example.com", &auth).unwrap();
        assert!(matches!(decode_token(&issued.token, ORIGIN, &auth), Err(AppError::Unauthorized)));
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let auth = test_auth();
        let issued = issue_token(Uuid::new_v4(), "a@example.com", ORIGIN, &auth).unwrap();

        let other = AuthConfig {
            jwt_secret: "other-secret".to_string(),
            ..test_auth()
        };
        assert!(matches!(decode_token(&issued.token, ORIGIN, &other), Err(AppError::Unauthorized)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = test_auth();
        let mut claims = Claims::new(Uuid::new_v4(), "a@example.com".to_string(), ORIGIN, 7);
        claims.iat = Utc::now().timestamp() - 120;
        claims.exp = Utc::now().timestamp() - 60;

        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.jwt_secret.as_bytes())).unwrap();
        assert!(matches!(decode_token(&token, ORIGIN, &auth), Err(AppError::Unauthorized)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let auth = test_auth();
        assert!(matches!(decode_token("not-a-jwt", ORIGIN, &auth), Err(AppError::Unauthorized)));
    }
}
