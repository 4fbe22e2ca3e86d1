//! # Taskboard Shared Library
//!
//! Domain types and persistence used by the Taskboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Users and tasks, with their PostgreSQL queries
//! - `store`: Storage ports and their PostgreSQL / in-memory implementations
//! - `db`: Connection pool and embedded migrations

pub mod db;
pub mod models;
pub mod store;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
