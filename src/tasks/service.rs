use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::dto::TaskPayload;
use super::model::Task;
use super::repo::{NewTask, TaskRepository};
use crate::auth::jwt::Claims;
use crate::error::AppError;

/// Task use-cases. Thin by design: one store call per operation, with the
/// owner stamp and field validation as the only logic on top.
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    fn validate(payload: &TaskPayload) -> Result<(), AppError> {
        if payload.title.trim().is_empty() {
            return Err(AppError::validation("title must not be empty"));
        }
        Ok(())
    }

    /// The owner is always the authenticated caller; the payload cannot say
    /// otherwise.
    pub async fn create(&self, caller: &Claims, payload: TaskPayload) -> Result<Task, AppError> {
        Self::validate(&payload)?;
        let task = self
            .tasks
            .create(NewTask {
                title: payload.title,
                description: payload.description,
                status: payload.status,
                due_date: payload.due_date,
                owner_id: caller.sub,
            })
            .await?;
        info!(task_id = %task.id, owner_id = %task.owner_id, "task created");
        Ok(task)
    }

    pub async fn get(&self, id: Uuid) -> Result<Task, AppError> {
        self.tasks.get(id).await?.ok_or(AppError::NotFound("task"))
    }

    pub async fn update(&self, id: Uuid, payload: TaskPayload) -> Result<Task, AppError> {
        Self::validate(&payload)?;
        self.tasks
            .update(id, payload)
            .await?
            .ok_or(AppError::NotFound("task"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.tasks.delete(id).await? {
            return Err(AppError::NotFound("task"));
        }
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Task>, AppError> {
        self.tasks.list().await
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
        self.tasks.list_by_owner(owner_id).await
    }
}
