/// In-memory stores
///
/// Keeps users and tasks in ordered maps behind a single `RwLock`, so one
/// `MemoryStore` (and every clone of it) behaves like one small database:
/// ids come from per-table sequences, emails are unique and deleting a user
/// cascades to its tasks, mirroring the PostgreSQL schema.

use super::{StoreError, StoreResult, TaskStore, UserStore};
use crate::models::{
    task::{CreateTask, Task, TaskWithUser, UpdateTask, USER_FOREIGN_KEY},
    user::{CreateUser, UpdateUser, User, UserSummary, EMAIL_UNIQUE_CONSTRAINT},
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    tasks: BTreeMap<i32, Task>,
    last_user_id: i32,
    last_task_id: i32,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn with_user(&self, task: &Task) -> Option<TaskWithUser> {
        let user = self.users.get(&task.user_id)?;
        Some(TaskWithUser {
            task: task.clone(),
            user: UserSummary::from(user),
        })
    }
}

fn conflict(constraint: &str) -> StoreError {
    StoreError::Conflict {
        constraint: constraint.to_string(),
    }
}

/// Process-local users and tasks
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, data: CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.email_taken(&data.email, None) {
            return Err(conflict(EMAIL_UNIQUE_CONSTRAINT));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            name: data.name,
            email: data.email,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());

        debug!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn update(&self, id: i32, data: UpdateUser) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = &data.email {
            if tables.email_taken(email, Some(id)) {
                return Err(conflict(EMAIL_UNIQUE_CONSTRAINT));
            }
        }

        let user = tables.users.get_mut(&id).map(|user| {
            data.apply_to(user);
            user.clone()
        });
        Ok(user)
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }

        let before = tables.tasks.len();
        tables.tasks.retain(|_, task| task.user_id != id);
        debug!(
            user_id = id,
            cascaded_tasks = before - tables.tasks.len(),
            "Deleted user"
        );
        Ok(true)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create(&self, data: CreateTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&data.user_id) {
            return Err(conflict(USER_FOREIGN_KEY));
        }

        tables.last_task_id += 1;
        let task = Task {
            id: tables.last_task_id,
            title: data.title,
            description: data.description,
            status: data.status,
            user_id: data.user_id,
            created_at: Utc::now(),
        };
        tables.tasks.insert(task.id, task.clone());

        debug!(task_id = task.id, user_id = task.user_id, "Inserted task");
        Ok(task)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<TaskWithUser>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.get(&id).and_then(|task| tables.with_user(task)))
    }

    async fn list(&self) -> StoreResult<Vec<TaskWithUser>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter_map(|task| tables.with_user(task))
            .collect())
    }

    async fn update(&self, id: i32, data: UpdateTask) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;
        Ok(tables.tasks.get_mut(&id).map(|task| {
            data.apply_to(task);
            task.clone()
        }))
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        let deleted = self.tables.write().await.tasks.remove(&id).is_some();
        debug!(task_id = id, deleted, "Deleted task");
        Ok(deleted)
    }
}
