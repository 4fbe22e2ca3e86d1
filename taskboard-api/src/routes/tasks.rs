/// Task endpoints
///
/// - `GET    /tasks`     - List tasks with their owners (ascending id)
/// - `POST   /tasks`     - Create a task for an existing user
/// - `GET    /tasks/:id` - Fetch a task with its owner
/// - `PUT    /tasks/:id` - Partially update a task
/// - `DELETE /tasks/:id` - Delete a task

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
use taskboard_shared::models::task::{CreateTask, Task, TaskStatus, TaskWithUser, UpdateTask};
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Defaults to `pending` when omitted
    #[serde(default, deserialize_with = "present")]
    pub status: Option<TaskStatus>,

    pub user_id: i32,
}

impl RequestSchema for CreateTaskRequest {}

impl From<CreateTaskRequest> for CreateTask {
    fn from(req: CreateTaskRequest) -> Self {
        CreateTask {
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or_default(),
            user_id: req.user_id,
        }
    }
}

/// Update task request, every field optional
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    #[serde(default, deserialize_with = "present")]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description is required"))]
    #[serde(default, deserialize_with = "present")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub status: Option<TaskStatus>,
}

impl RequestSchema for UpdateTaskRequest {}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
        }
    }
}

/// Lists every task with its owner
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskWithUser>>> {
    Ok(Json(state.tasks.list().await?))
}

/// Creates a task
///
/// The owner is looked up first; the insert only happens if it exists.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: `userId` does not exist
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let raw = json_body(payload)?;
    let req = CreateTaskRequest::parse(raw)?;

    if state.users.find_by_id(req.user_id).await?.is_none() {
        return Err(ApiError::user_not_found());
    }

    let task = state.tasks.create(req.into()).await?;
    tracing::info!(task_id = task.id, user_id = task.user_id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Fetches one task with its owner
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskWithUser>> {
    let id = parse_id(&id).ok_or_else(ApiError::task_not_found)?;

    state
        .tasks
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::task_not_found)
}

/// Applies the supplied fields to a task
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: No such task
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let raw = json_body(payload)?;
    let req = UpdateTaskRequest::parse(raw)?;
    let id = parse_id(&id).ok_or_else(ApiError::task_not_found)?;

    state
        .tasks
        .update(id, req.into())
        .await?
        .map(Json)
        .ok_or_else(ApiError::task_not_found)
}

/// Deletes a task
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id).ok_or_else(ApiError::task_not_found)?;

    if !state.tasks.delete(id).await? {
        return Err(ApiError::task_not_found());
    }

    tracing::info!(task_id = id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_defaults_status() {
        let req = CreateTaskRequest::parse(json!({
            "title": "T",
            "description": "D",
            "userId": 1
        }))
        .unwrap();

        let create = CreateTask::from(req);
        assert_eq!(create.status, TaskStatus::Pending);
        assert_eq!(create.user_id, 1);
    }

    #[test]
    fn test_create_request_reports_each_empty_field() {
        let issues = CreateTaskRequest::parse(json!({
            "title": "",
            "description": "",
            "userId": 1
        }))
        .unwrap_err();

        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["description", "title"]);
    }

    #[test]
    fn test_create_request_requires_user_id() {
        let issues = CreateTaskRequest::parse(json!({ "title": "T", "description": "D" }))
            .unwrap_err();
        assert_eq!(issues[0].field, "userId");
        assert_eq!(issues[0].code, "required");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let issues = UpdateTaskRequest::parse(json!({ "status": "archived" })).unwrap_err();
        assert_eq!(issues[0].code, "invalid_type");
    }
}
