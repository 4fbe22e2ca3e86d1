/// API route handlers
///
/// - `health`: Health check endpoint
/// - `users`: User CRUD
/// - `tasks`: Task CRUD

pub mod health;
pub mod tasks;
pub mod users;

use crate::error::ApiError;
use axum::{extract::rejection::JsonRejection, Json};
use serde_json::{Map, Value};

/// Parses a path identifier
///
/// Anything that is not an integer names no entity, so callers answer 404.
pub(crate) fn parse_id(raw: &str) -> Option<i32> {
    raw.parse().ok()
}

/// Unwraps a JSON body
///
/// A request sent without a JSON content type carries no body to read and is
/// checked as `{}`. Malformed JSON keeps the extractor's rejection.
pub(crate) fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(raw)) => Ok(raw),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Object(Map::new())),
        Err(rejection) => Err(rejection.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("1.5"), None);
        assert_eq!(parse_id("99999999999"), None);
    }
}
