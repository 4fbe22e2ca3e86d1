/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     name TEXT NOT NULL,
///     email TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_email_key UNIQUE (email)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{User, CreateUser};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     name: "Ada".to_string(),
///     email: "ada@example.com".to_string(),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "ada@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Name of the unique constraint guarding `users.email`
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// A user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-generated identifier
    pub id: i32,

    /// Display name (never empty)
    pub name: String,

    /// Email address, unique across all users
    pub email: String,

    /// When the user was created (immutable)
    pub created_at: DateTime<Utc>,
}

/// Public fields of a user embedded in task reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

/// Input for updating an existing user
///
/// All fields are optional. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateUser {
    /// True when no field would be changed
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// Applies the present fields to `user` in place
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
    }
}

impl User {
    /// Inserts a new user and returns it with its generated id and timestamp
    ///
    /// # Errors
    ///
    /// Fails on a unique violation of `users_email_key` or a connection error.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by exact email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists every user, ordered by id ascending
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Updates the supplied fields of a user
    ///
    /// Returns `None` if no user has this id. An empty update is a plain read.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut assignments = Vec::new();
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            assignments.push(format!("name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            assignments.push(format!("email = ${}", bind_count));
        }

        let query = format!(
            "UPDATE users SET {} WHERE id = $1 RETURNING id, name, email, created_at",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Deletes a user by ID, cascading to the tasks it owns
    ///
    /// Returns false if the user didn't exist.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
