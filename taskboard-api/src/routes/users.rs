/// User endpoints
///
/// - `GET    /users`     - List users (ascending id)
/// - `POST   /users`     - Create a user
/// - `GET    /users/:id` - Fetch a user
/// - `PUT    /users/:id` - Partially update a user
/// - `DELETE /users/:id` - Delete a user and its tasks

use super::{json_body, parse_id};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    validation::{present, RequestSchema},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use taskboard_shared::models::user::{CreateUser, UpdateUser, User};
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

impl RequestSchema for CreateUserRequest {}

impl From<CreateUserRequest> for CreateUser {
    fn from(req: CreateUserRequest) -> Self {
        CreateUser {
            name: req.name,
            email: req.email,
        }
    }
}

/// Update user request, every field optional
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[serde(default, deserialize_with = "present")]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    #[serde(default, deserialize_with = "present")]
    pub email: Option<String>,
}

impl RequestSchema for UpdateUserRequest {}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        UpdateUser {
            name: req.name,
            email: req.email,
        }
    }
}

/// Lists every user
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.list().await?))
}

/// Creates a user
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already exists
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let raw = json_body(payload)?;
    let req = CreateUserRequest::parse(raw)?;

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(ApiError::email_already_exists());
    }

    let user = state.users.create(req.into()).await?;
    tracing::info!(user_id = user.id, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Fetches one user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id).ok_or_else(ApiError::user_not_found)?;

    state
        .users
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::user_not_found)
}

/// Applies the supplied fields to a user
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: No such user
/// - `409 Conflict`: Email belongs to another user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let raw = json_body(payload)?;
    let req = UpdateUserRequest::parse(raw)?;
    let id = parse_id(&id).ok_or_else(ApiError::user_not_found)?;

    state
        .users
        .update(id, req.into())
        .await?
        .map(Json)
        .ok_or_else(ApiError::user_not_found)
}

/// Deletes a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id).ok_or_else(ApiError::user_not_found)?;

    if !state.users.delete(id).await? {
        return Err(ApiError::user_not_found());
    }

    tracing::info!(user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_requires_valid_email() {
        let issues = CreateUserRequest::parse(json!({ "name": "A", "email": "not-an-email" }))
            .unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "email");
    }

    #[test]
    fn test_update_request_converts_only_present_fields() {
        let req = UpdateUserRequest::parse(json!({ "name": "B" })).unwrap();
        let update = UpdateUser::from(req);
        assert_eq!(update.name.as_deref(), Some("B"));
        assert!(update.email.is_none());
    }

    #[test]
    fn test_update_request_rejects_empty_name() {
        let issues = UpdateUserRequest::parse(json!({ "name": "" })).unwrap_err();
        assert_eq!(issues[0].field, "name");
        assert_eq!(issues[0].message, "Name is required");
    }
}
