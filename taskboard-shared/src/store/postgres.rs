/// PostgreSQL-backed stores
///
/// Thin adapter from the store ports onto the model queries in
/// [`crate::models`]. Constraint violations become [`StoreError::Conflict`].

use super::{StoreError, StoreResult, TaskStore, UserStore};
use crate::models::{
    task::{CreateTask, Task, TaskWithUser, UpdateTask},
    user::{CreateUser, UpdateUser, User},
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

/// Both stores over one connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create(&self, data: CreateUser) -> StoreResult<User> {
        let user = User::create(&self.pool, data).await?;
        debug!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        Ok(User::list(&self.pool).await?)
    }

    async fn update(&self, id: i32, data: UpdateUser) -> StoreResult<Option<User>> {
        User::update(&self.pool, id, data)
            .await
            .map_err(StoreError::from)
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        let deleted = User::delete(&self.pool, id).await?;
        debug!(user_id = id, deleted, "Deleted user");
        Ok(deleted)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create(&self, data: CreateTask) -> StoreResult<Task> {
        let task = Task::create(&self.pool, data).await?;
        debug!(task_id = task.id, user_id = task.user_id, "Inserted task");
        Ok(task)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<TaskWithUser>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list(&self) -> StoreResult<Vec<TaskWithUser>> {
        Ok(Task::list(&self.pool).await?)
    }

    async fn update(&self, id: i32, data: UpdateTask) -> StoreResult<Option<Task>> {
        Ok(Task::update(&self.pool, id, data).await?)
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        let deleted = Task::delete(&self.pool, id).await?;
        debug!(task_id = id, deleted, "Deleted task");
        Ok(deleted)
    }
}
