/// Task model and database operations
///
/// Every task belongs to one user. Reads embed the owner's public fields
/// (see [`TaskWithUser`]).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'done');
///
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     status task_status NOT NULL DEFAULT 'pending',
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{Task, CreateTask, TaskStatus};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Write docs".to_string(),
///     description: "Cover the HTTP surface".to_string(),
///     status: TaskStatus::Pending,
///     user_id: 1,
/// }).await?;
///
/// let with_owner = Task::find_by_id(&pool, task.id).await?;
/// # Ok(())
/// # }
/// ```

use crate::models::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Name of the foreign key from `tasks.user_id` to `users.id`
pub const USER_FOREIGN_KEY: &str = "tasks_user_id_fkey";

/// Task progress
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not started or in progress
    #[default]
    Pending,

    /// Finished
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Done => "done",
        }
    }
}

/// A task owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-generated identifier
    pub id: i32,

    pub title: String,

    pub description: String,

    pub status: TaskStatus,

    /// Owning user
    pub user_id: i32,

    /// When the task was created (immutable)
    pub created_at: DateTime<Utc>,
}

/// A task together with its owner's public fields
///
/// Serializes as the task's own fields plus a `user` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskWithUser {
    #[serde(flatten)]
    pub task: Task,

    pub user: UserSummary,
}

/// Flat row produced by the tasks/users join
#[derive(Debug, sqlx::FromRow)]
struct TaskUserRow {
    id: i32,
    title: String,
    description: String,
    status: TaskStatus,
    user_id: i32,
    created_at: DateTime<Utc>,
    user_name: String,
    user_email: String,
}

impl From<TaskUserRow> for TaskWithUser {
    fn from(row: TaskUserRow) -> Self {
        Self {
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
            task: Task {
                id: row.id,
                title: row.title,
                description: row.description,
                status: row.status,
                user_id: row.user_id,
                created_at: row.created_at,
            },
        }
    }
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub user_id: i32,
}

/// Input for updating an existing task
///
/// Only `Some` fields are written. The owner cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl UpdateTask {
    /// True when no field would be changed
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Applies the present fields to `task` in place
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

const SELECT_WITH_USER: &str = r#"
    SELECT t.id, t.title, t.description, t.status, t.user_id, t.created_at,
           u.name AS user_name, u.email AS user_email
    FROM tasks t
    JOIN users u ON u.id = t.user_id
"#;

impl Task {
    /// Inserts a new task
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation if `user_id` does not exist.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, status, user_id, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, including its owner
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<TaskWithUser>, sqlx::Error> {
        let query = format!("{} WHERE t.id = $1", SELECT_WITH_USER);

        let row = sqlx::query_as::<_, TaskUserRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(TaskWithUser::from))
    }

    /// Lists every task with its owner, ordered by id ascending
    pub async fn list(pool: &PgPool) -> Result<Vec<TaskWithUser>, sqlx::Error> {
        let query = format!("{} ORDER BY t.id ASC", SELECT_WITH_USER);

        let rows = sqlx::query_as::<_, TaskUserRow>(&query)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(TaskWithUser::from).collect())
    }

    /// Fetches a task without its owner
    async fn find_plain(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, user_id, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Updates the supplied fields of a task
    ///
    /// Returns `None` if no task has this id.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_plain(pool, id).await;
        }

        let mut assignments = Vec::new();
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            assignments.push(format!("title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            assignments.push(format!("description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            assignments.push(format!("status = ${}", bind_count));
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE id = $1 \
             RETURNING id, title, description, status, user_id, created_at",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// Returns false if the task didn't exist.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
