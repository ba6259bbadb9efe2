use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Task row as stored in the database. `user_id` is never serialized to
/// clients; ownership is implied by the authenticated route.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct TaskCreateRequest {
    #[validate(
        length(max = 255, message = "title must be at most 255 characters"),
        custom(function = "validate_title_not_blank")
    )]
    pub title: String,
    #[validate(length(max = 10000, message = "description must be at most 10000 characters"))]
    pub description: Option<String>,
}

/// Partial update: absent fields are left untouched.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct TaskUpdateRequest {
    #[validate(
        length(max = 255, message = "title must be at most 255 characters"),
        custom(function = "validate_title_not_blank")
    )]
    pub title: Option<String>,
    #[validate(length(max = 10000, message = "description must be at most 10000 characters"))]
    pub description: Option<String>,
}

pub fn validate_title_not_blank(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("title_blank").with_message("title must not be blank".into()));
    }
    Ok(())
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use validator::Validate;

    fn create(title: &str, description: Option<&str>) -> TaskCreateRequest {
        TaskCreateRequest {
            title: title.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn blank_titles_are_rejected() {
        assert!(create("", None).validate().is_err());
        assert!(create("   ", None).validate().is_err());
        assert!(create("\t\n", None).validate().is_err());
    }

    #[test]
    fn overlong_title_is_rejected() {
        let long = "x".repeat(256);
        assert!(create(&long, None).validate().is_err());
        let max = "x".repeat(255);
        assert!(create(&max, None).validate().is_ok());
    }

    #[test]
    fn overlong_description_is_rejected() {
        let long = "d".repeat(10_001);
        assert!(create("Buy milk", Some(&long)).validate().is_err());
        let max = "d".repeat(10_000);
        assert!(create("Buy milk", Some(&max)).validate().is_ok());
    }

    #[test]
    fn update_with_no_fields_is_valid() {
        let update = TaskUpdateRequest {
            title: None,
            description: None,
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn update_with_blank_title_is_rejected() {
        let update = TaskUpdateRequest {
            title: Some("  ".to_string()),
            description: None,
        };
        assert!(update.validate().is_err());
    }

    proptest! {
        #[test]
        fn titles_within_bounds_validate(title in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,254}") {
            prop_assert!(create(&title, None).validate().is_ok());
        }

        #[test]
        fn titles_beyond_bound_fail(len in 256usize..300) {
            let title = "t".repeat(len);
            prop_assert!(create(&title, None).validate().is_err());
        }

        #[test]
        fn descriptions_within_bounds_validate(description in proptest::option::of("[a-z ]{0,200}")) {
            prop_assert!(create("Buy milk", description.as_deref()).validate().is_ok());
        }
    }
}
