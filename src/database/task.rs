use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::task::{Task, TaskCreateRequest, TaskUpdateRequest};
use uuid::Uuid;

/// Task storage scoped to a single owner. Every method takes the caller's
/// user id and every query carries it in the WHERE clause, so a task that
/// belongs to someone else is indistinguishable from one that does not
/// exist.
#[async_trait::async_trait]
pub trait TaskRepository {
    async fn create_task(&self, user_id: &Uuid, request: &TaskCreateRequest) -> Result<Task, AppError>;
    /// All tasks of the owner, newest first.
    async fn list_tasks(&self, user_id: &Uuid) -> Result<Vec<Task>, AppError>;
    async fn get_task_by_id(&self, user_id: &Uuid, id: &Uuid) -> Result<Option<Task>, AppError>;
    /// Applies only the fields present in the request.
    async fn update_task(&self, user_id: &Uuid, id: &Uuid, request: &TaskUpdateRequest) -> Result<Option<Task>, AppError>;
    async fn toggle_completed(&self, user_id: &Uuid, id: &Uuid) -> Result<Option<Task>, AppError>;
    /// Returns whether a row was deleted. A repeat delete returns false.
    async fn delete_task(&self, user_id: &Uuid, id: &Uuid) -> Result<bool, AppError>;
}

#[async_trait::async_trait]
impl TaskRepository for PostgresRepository {
    async fn create_task(&self, user_id: &Uuid, request: &TaskCreateRequest) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&request.title)
        .bind(request.description.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn list_tasks(&self, user_id: &Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn get_task_by_id(&self, user_id: &Uuid, id: &Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn update_task(&self, user_id: &Uuid, id: &Uuid, request: &TaskUpdateRequest) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(request.title.as_deref())
        .bind(request.description.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn toggle_completed(&self, user_id: &Uuid, id: &Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET completed = NOT completed,
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete_task(&self, user_id: &Uuid, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskCreateRequest;
    use crate::test_utils::MockRepository;

    fn create_request(title: &str, description: Option<&str>) -> TaskCreateRequest {
        TaskCreateRequest {
            title: title.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[rocket::async_test]
    async fn create_round_trips_fields() {
        let repo = MockRepository::default();
        let owner = Uuid::new_v4();

        let task = repo
            .create_task(&owner, &create_request("Buy milk", Some("two liters")))
            .await
            .unwrap();

        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description.as_deref(), Some("two liters"));
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[rocket::async_test]
    async fn list_is_newest_first_and_owner_scoped() {
        let repo = MockRepository::default();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let first = repo.create_task(&owner, &create_request("first", None)).await.unwrap();
        let second = repo.create_task(&owner, &create_request("second", None)).await.unwrap();
        repo.create_task(&stranger, &create_request("not yours", None)).await.unwrap();

        let tasks = repo.list_tasks(&owner).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, second.id);
        assert_eq!(tasks[1].id, first.id);
    }

    #[rocket::async_test]
    async fn toggle_twice_is_an_involution() {
        let repo = MockRepository::default();
        let owner = Uuid::new_v4();
        let task = repo.create_task(&owner, &create_request("Buy milk", None)).await.unwrap();

        let toggled = repo.toggle_completed(&owner, &task.id).await.unwrap().unwrap();
        assert!(toggled.completed);
        assert!(toggled.updated_at >= task.updated_at);

        let toggled_back = repo.toggle_completed(&owner, &task.id).await.unwrap().unwrap();
        assert_eq!(toggled_back.completed, task.completed);
    }

    #[rocket::async_test]
    async fn foreign_tasks_are_invisible() {
        let repo = MockRepository::default();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let task = repo.create_task(&owner, &create_request("mine", None)).await.unwrap();

        assert!(repo.get_task_by_id(&stranger, &task.id).await.unwrap().is_none());
        assert!(repo.toggle_completed(&stranger, &task.id).await.unwrap().is_none());
        let update = crate::models::task::TaskUpdateRequest {
            title: Some("hijacked".to_string()),
            description: None,
        };
        assert!(repo.update_task(&stranger, &task.id, &update).await.unwrap().is_none());
        assert!(!repo.delete_task(&stranger, &task.id).await.unwrap());

        // Still intact for the owner
        let kept = repo.get_task_by_id(&owner, &task.id).await.unwrap().unwrap();
        assert_eq!(kept.title, "mine");
    }

    #[rocket::async_test]
    async fn update_leaves_absent_fields_untouched() {
        let repo = MockRepository::default();
        let owner = Uuid::new_v4();
        let task = repo
            .create_task(&owner, &create_request("Buy milk", Some("two liters")))
            .await
            .unwrap();

        let update = crate::models::task::TaskUpdateRequest {
            title: Some("Buy oat milk".to_string()),
            description: None,
        };
        let updated = repo.update_task(&owner, &task.id, &update).await.unwrap().unwrap();
        assert_eq!(updated.title, "Buy oat milk");
        assert_eq!(updated.description.as_deref(), Some("two liters"));
    }

    #[rocket::async_test]
    async fn second_delete_reports_missing() {
        let repo = MockRepository::default();
        let owner = Uuid::new_v4();
        let task = repo.create_task(&owner, &create_request("ephemeral", None)).await.unwrap();

        assert!(repo.delete_task(&owner, &task.id).await.unwrap());
        assert!(!repo.delete_task(&owner, &task.id).await.unwrap());
        assert!(repo.list_tasks(&owner).await.unwrap().is_empty());
    }
}
