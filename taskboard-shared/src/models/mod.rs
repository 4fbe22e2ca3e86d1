/// Database models for Taskboard
///
/// # Models
///
/// - `user`: User accounts, unique by email
/// - `task`: Tasks owned by a user
///
/// Each model carries its own PostgreSQL queries as associated functions
/// taking a `&PgPool`. Code that must work against any backend goes through
/// the ports in [`crate::store`] instead.

pub mod task;
pub mod user;
