//! # Taskboard API Server Library
//!
//! Users and tasks over JSON/HTTP.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Cross-cutting error handler
//! - `routes`: API route handlers
//! - `validation`: Request body schemas

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod validation;
