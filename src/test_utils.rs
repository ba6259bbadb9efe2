use crate::database::task::TaskRepository;
use crate::error::app_error::AppError;
use crate::models::task::{Task, TaskCreateRequest, TaskUpdateRequest};
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory stand-in for the Postgres task store. Keeps tasks in insertion
/// order and lists them reversed, which matches the newest-first ordering of
/// the real queries without depending on timestamp resolution.
#[derive(Default)]
pub struct MockRepository {
    tasks: Mutex<Vec<Task>>,
}

#[async_trait::async_trait]
impl TaskRepository for MockRepository {
    async fn create_task(&self, user_id: &Uuid, request: &TaskCreateRequest) -> Result<Task, AppError> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            user_id: *user_id,
            title: request.title.clone(),
            description: request.description.clone(),
            completed: false,
            created_at: now,
            updated_at: now,
        };
        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn list_tasks(&self, user_id: &Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.iter().rev().filter(|task| task.user_id == *user_id).cloned().collect())
    }

    async fn get_task_by_id(&self, user_id: &Uuid, id: &Uuid) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.iter().find(|task| task.id == *id && task.user_id == *user_id).cloned())
    }

    async fn update_task(&self, user_id: &Uuid, id: &Uuid, request: &TaskUpdateRequest) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.lock().unwrap();
        let Some(task) = tasks.iter_mut().find(|task| task.id == *id && task.user_id == *user_id) else {
            return Ok(None);
        };
        if let Some(title) = &request.title {
            task.title = title.clone();
        }
        if let Some(description) = &request.description {
            task.description = Some(description.clone());
        }
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn toggle_completed(&self, user_id: &Uuid, id: &Uuid) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.lock().unwrap();
        let Some(task) = tasks.iter_mut().find(|task| task.id == *id && task.user_id == *user_id) else {
            return Ok(None);
        };
        task.completed = !task.completed;
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, user_id: &Uuid, id: &Uuid) -> Result<bool, AppError> {
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|task| !(task.id == *id && task.user_id == *user_id));
        Ok(tasks.len() < before)
    }
}
