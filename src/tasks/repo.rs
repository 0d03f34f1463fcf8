use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::TaskPayload;
use super::model::Task;
use crate::error::AppError;

/// Fields for a new task; the store stamps id and timestamps.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_date: OffsetDateTime,
    pub owner_id: Uuid,
}

/// Storage contract for task records.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, new: NewTask) -> Result<Task, AppError>;
    async fn get(&self, id: Uuid) -> Result<Option<Task>, AppError>;
    /// Replaces the mutable fields and stamps `updated_at`; id and owner are
    /// left untouched. `None` when the id is unknown.
    async fn update(&self, id: Uuid, fields: TaskPayload) -> Result<Option<Task>, AppError>;
    /// `false` when the id is unknown.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
    async fn list(&self) -> Result<Vec<Task>, AppError>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError>;
}

pub struct PgTaskRepository {
    db: PgPool,
}

impl PgTaskRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, new: NewTask) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, due_date, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, due_date, owner_id, created_at, updated_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.status)
        .bind(new.due_date)
        .bind(new.owner_id)
        .fetch_one(&self.db)
        .await?;
        Ok(task)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, due_date, owner_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(task)
    }

    async fn update(&self, id: Uuid, fields: TaskPayload) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, status = $4, due_date = $5, updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, status, due_date, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.status)
        .bind(fields.due_date)
        .fetch_optional(&self.db)
        .await?;
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, due_date, owner_id, created_at, updated_at
            FROM tasks
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(tasks)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, due_date, owner_id, created_at, updated_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(tasks)
    }
}

/// In-memory variant: one map behind one coarse lock.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: Mutex<HashMap<Uuid, Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, new: NewTask) -> Result<Task, AppError> {
        let now = OffsetDateTime::now_utc();
        let task = Task {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            status: new.status,
            due_date: new.due_date,
            owner_id: new.owner_id,
            created_at: now,
            updated_at: now,
        };
        let mut tasks = self.tasks.lock().expect("task map lock poisoned");
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.lock().expect("task map lock poisoned");
        Ok(tasks.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, fields: TaskPayload) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.lock().expect("task map lock poisoned");
        let Some(task) = tasks.get_mut(&id) else {
            return Ok(None);
        };
        task.title = fields.title;
        task.description = fields.description;
        task.status = fields.status;
        task.due_date = fields.due_date;
        task.updated_at = OffsetDateTime::now_utc();
        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tasks = self.tasks.lock().expect("task map lock poisoned");
        Ok(tasks.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.lock().expect("task map lock poisoned");
        let mut all: Vec<Task> = tasks.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.lock().expect("task map lock poisoned");
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn new_task(owner_id: Uuid) -> NewTask {
        NewTask {
            title: "Buy milk".into(),
            description: "2%".into(),
            status: "Pending".into(),
            due_date: datetime!(2025-01-01 00:00:00 UTC),
            owner_id,
        }
    }

    fn payload(title: &str) -> TaskPayload {
        TaskPayload {
            title: title.into(),
            description: "updated".into(),
            status: "In Progress".into(),
            due_date: datetime!(2025-02-01 00:00:00 UTC),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = InMemoryTaskRepository::new();
        let owner = Uuid::new_v4();
        let created = repo.create(new_task(owner)).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.owner_id, owner);
    }

    #[tokio::test]
    async fn update_stamps_updated_at_and_keeps_owner() {
        let repo = InMemoryTaskRepository::new();
        let owner = Uuid::new_v4();
        let created = repo.create(new_task(owner)).await.unwrap();

        let updated = repo
            .update(created.id, payload("Buy bread"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.owner_id, owner);
        assert_eq!(updated.title, "Buy bread");
        assert_eq!(updated.status, "In Progress");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_unknown_id_returns_none() {
        let repo = InMemoryTaskRepository::new();
        assert!(repo
            .update(Uuid::new_v4(), payload("x"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_task() {
        let repo = InMemoryTaskRepository::new();
        let created = repo.create(new_task(Uuid::new_v4())).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get(created.id).await.unwrap().is_none());
        // gone means gone
        assert!(!repo.delete(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn list_by_owner_filters() {
        let repo = InMemoryTaskRepository::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        repo.create(new_task(alice)).await.unwrap();
        repo.create(new_task(alice)).await.unwrap();
        repo.create(new_task(bob)).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 3);
        assert_eq!(repo.list_by_owner(alice).await.unwrap().len(), 2);
        assert_eq!(repo.list_by_owner(bob).await.unwrap().len(), 1);
        assert!(repo.list_by_owner(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
