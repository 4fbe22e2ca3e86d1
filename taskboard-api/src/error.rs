/// Error handling for the API server
///
/// Every handler returns `ApiResult<T>`. The error side maps onto exactly one
/// HTTP response, always shaped as `{ "error": ... }`:
///
/// | Variant | Status | `error` |
/// |---|---|---|
/// | `Validation` | 400 | list of issues |
/// | `NotFound` | 404 | `"<Entity> not found"` |
/// | `Conflict` | 409 | e.g. `"Email already exists"` |
/// | `Unhandled` | carried status or 500 | message or `"Internal Server Error"` |
///
/// Unhandled errors also attach an [`UnhandledError`] to the response so the
/// error reporting middleware can log them (see
/// [`crate::middleware::error_handler`]).
///
/// # Example
///
/// ```
/// use taskboard_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler(found: bool) -> ApiResult<Json<&'static str>> {
///     if !found {
///         return Err(ApiError::user_not_found());
///     }
///     Ok(Json("ok"))
/// }
/// ```

use crate::validation::ValidationIssue;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use taskboard_shared::models::user::EMAIL_UNIQUE_CONSTRAINT;
use taskboard_shared::store::StoreError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

pub const USER_NOT_FOUND: &str = "User not found";
pub const TASK_NOT_FOUND: &str = "Task not found";
pub const EMAIL_ALREADY_EXISTS: &str = "Email already exists";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - body failed its schema
    Validation(Vec<ValidationIssue>),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email
    Conflict(String),

    /// Anything not handled above
    Unhandled {
        /// Status to answer with, 500 when absent
        status: Option<StatusCode>,

        /// Message for the client, the generic text when empty
        message: String,
    },
}

/// Error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse<T> {
    pub error: T,
}

/// Details of an unhandled error, attached to its response as an extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnhandledError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn user_not_found() -> Self {
        ApiError::NotFound(USER_NOT_FOUND.to_string())
    }

    pub fn task_not_found() -> Self {
        ApiError::NotFound(TASK_NOT_FOUND.to_string())
    }

    pub fn email_already_exists() -> Self {
        ApiError::Conflict(EMAIL_ALREADY_EXISTS.to_string())
    }

    /// Unhandled error without a status of its own
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Unhandled {
            status: None,
            message: message.into(),
        }
    }

    /// Unhandled error carrying an explicit status
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Unhandled {
            status: Some(status),
            message: message.into(),
        }
    }

    /// The status this error answers with
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unhandled { status, .. } => {
                status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(issues) => {
                write!(f, "Validation failed: {} issues", issues.len())
            }
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Unhandled { message, .. } => write!(f, "Unhandled error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            ApiError::Validation(issues) => {
                (status, Json(ErrorResponse { error: issues })).into_response()
            }
            ApiError::NotFound(message) | ApiError::Conflict(message) => {
                (status, Json(ErrorResponse { error: message })).into_response()
            }
            ApiError::Unhandled { message, .. } => {
                let message = if message.is_empty() {
                    INTERNAL_SERVER_ERROR.to_string()
                } else {
                    message
                };

                let mut response = (
                    status,
                    Json(ErrorResponse {
                        error: message.clone(),
                    }),
                )
                    .into_response();
                response
                    .extensions_mut()
                    .insert(UnhandledError { status, message });
                response
            }
        }
    }
}

impl From<Vec<ValidationIssue>> for ApiError {
    fn from(issues: Vec<ValidationIssue>) -> Self {
        ApiError::Validation(issues)
    }
}

/// Store failures other than a duplicate email are unhandled
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.violates(EMAIL_UNIQUE_CONSTRAINT) {
            return ApiError::email_already_exists();
        }
        ApiError::internal(err.to_string())
    }
}

/// Unreadable bodies keep the extractor's status and message
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::with_status(rejection.status(), rejection.body_text())
    }
}
