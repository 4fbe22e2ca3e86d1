/// Storage ports
///
/// Request handlers never talk to a database directly. They receive a
/// [`UserStore`] and a [`TaskStore`] through application state, which keeps
/// the HTTP layer independent of the backend:
///
/// - [`postgres::PgStore`]: PostgreSQL through sqlx
/// - [`memory::MemoryStore`]: process-local maps, for tests and local runs
///
/// Lookups return `Option`, updates return `None` and deletes return `false`
/// when the target id does not exist. Only genuine failures are errors.

use crate::models::{
    task::{CreateTask, Task, TaskWithUser, UpdateTask},
    user::{CreateUser, UpdateUser, User},
};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

/// Storage failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique or foreign key constraint rejected the write
    #[error("Constraint violation: {constraint}")]
    Conflict { constraint: String },

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// True if this is a violation of the given constraint
    pub fn violates(&self, name: &str) -> bool {
        matches!(self, StoreError::Conflict { constraint } if constraint == name)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::Conflict { constraint };
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for users
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// All users, ascending by id
    async fn list(&self) -> StoreResult<Vec<User>>;

    async fn update(&self, id: i32, data: UpdateUser) -> StoreResult<Option<User>>;

    /// Removes the user and every task it owns
    async fn delete(&self, id: i32) -> StoreResult<bool>;
}

/// Persistence for tasks
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, data: CreateTask) -> StoreResult<Task>;

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<TaskWithUser>>;

    /// All tasks with their owners, ascending by id
    async fn list(&self) -> StoreResult<Vec<TaskWithUser>>;

    async fn update(&self, id: i32, data: UpdateTask) -> StoreResult<Option<Task>>;

    async fn delete(&self, id: i32) -> StoreResult<bool>;
}
