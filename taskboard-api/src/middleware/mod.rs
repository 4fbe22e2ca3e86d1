/// Middleware modules for the API server
///
/// - `error_handler`: panic recovery and unhandled-error reporting

pub mod error_handler;
