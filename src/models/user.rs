use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct RegisterRequest {
    #[validate(length(max = 100, message = "name must be at most 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "not a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 8, message = "password must be at least 8 characters"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct LoginRequest {
    #[validate(email(message = "not a valid email address"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Reject passwords whose zxcvbn score is below 3 ("safely unguessable"). The
/// 8-character minimum alone lets through keyboard walks and common words.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let estimate = zxcvbn::zxcvbn(password, &[]);
    if estimate.score() < zxcvbn::Score::Three {
        return Err(ValidationError::new("password_weak").with_message("password is too easy to guess".into()));
    }
    Ok(())
}
