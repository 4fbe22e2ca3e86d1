#![allow(dead_code)]
//! Common test utilities for integration tests
//!
//! - `RecordingStore`: in-memory store that remembers which operations ran
//! - `FailingStore`: store whose every operation fails
//! - `TestContext`: router wired to a store, plus request helpers

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{Config, Environment};
use taskboard_shared::models::task::{CreateTask, Task, TaskStatus, TaskWithUser, UpdateTask};
use taskboard_shared::models::user::{CreateUser, UpdateUser, User};
use taskboard_shared::store::memory::MemoryStore;
use taskboard_shared::store::{StoreError, StoreResult, TaskStore, UserStore};
use tower::ServiceExt;

/// Wraps a `MemoryStore` and logs every call as `"<entity>.<operation>"`
#[derive(Clone, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingStore {
    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls().iter().any(|c| *c == call)
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl UserStore for RecordingStore {
    async fn create(&self, data: CreateUser) -> StoreResult<User> {
        self.record("user.create");
        UserStore::create(&self.inner, data).await
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        self.record("user.find_by_id");
        UserStore::find_by_id(&self.inner, id).await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.record("user.find_by_email");
        UserStore::find_by_email(&self.inner, email).await
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        self.record("user.list");
        UserStore::list(&self.inner).await
    }

    async fn update(&self, id: i32, data: UpdateUser) -> StoreResult<Option<User>> {
        self.record("user.update");
        UserStore::update(&self.inner, id, data).await
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        self.record("user.delete");
        UserStore::delete(&self.inner, id).await
    }
}

#[async_trait]
impl TaskStore for RecordingStore {
    async fn create(&self, data: CreateTask) -> StoreResult<Task> {
        self.record("task.create");
        TaskStore::create(&self.inner, data).await
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<TaskWithUser>> {
        self.record("task.find_by_id");
        TaskStore::find_by_id(&self.inner, id).await
    }

    async fn list(&self) -> StoreResult<Vec<TaskWithUser>> {
        self.record("task.list");
        TaskStore::list(&self.inner).await
    }

    async fn update(&self, id: i32, data: UpdateTask) -> StoreResult<Option<Task>> {
        self.record("task.update");
        TaskStore::update(&self.inner, id, data).await
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        self.record("task.delete");
        TaskStore::delete(&self.inner, id).await
    }
}

/// Store that fails every call with a database error
#[derive(Clone, Default)]
pub struct FailingStore;

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl UserStore for FailingStore {
    async fn create(&self, _data: CreateUser) -> StoreResult<User> {
        unavailable()
    }
    async fn find_by_id(&self, _id: i32) -> StoreResult<Option<User>> {
        unavailable()
    }
    async fn find_by_email(&self, _email: &str) -> StoreResult<Option<User>> {
        unavailable()
    }
    async fn list(&self) -> StoreResult<Vec<User>> {
        unavailable()
    }
    async fn update(&self, _id: i32, _data: UpdateUser) -> StoreResult<Option<User>> {
        unavailable()
    }
    async fn delete(&self, _id: i32) -> StoreResult<bool> {
        unavailable()
    }
}

#[async_trait]
impl TaskStore for FailingStore {
    async fn create(&self, _data: CreateTask) -> StoreResult<Task> {
        unavailable()
    }
    async fn find_by_id(&self, _id: i32) -> StoreResult<Option<TaskWithUser>> {
        unavailable()
    }
    async fn list(&self) -> StoreResult<Vec<TaskWithUser>> {
        unavailable()
    }
    async fn update(&self, _id: i32, _data: UpdateTask) -> StoreResult<Option<Task>> {
        unavailable()
    }
    async fn delete(&self, _id: i32) -> StoreResult<bool> {
        unavailable()
    }
}

/// Test context: an app over a recording in-memory store
pub struct TestContext {
    pub app: Router,
    pub store: RecordingStore,
}

impl TestContext {
    pub fn new() -> Self {
        let store = RecordingStore::default();
        let state = AppState::with_store(store.clone(), Config::in_memory(Environment::Test));

        TestContext {
            app: build_router(state),
            store,
        }
    }

    /// Sends a request and returns status plus parsed JSON body (Null if empty)
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        send_request(&self.app, request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, None).await
    }

    /// Inserts a user directly, bypassing HTTP and the call log
    pub async fn seed_user(&self, name: &str, email: &str) -> User {
        UserStore::create(
            &self.store.inner,
            CreateUser {
                name: name.to_string(),
                email: email.to_string(),
            },
        )
        .await
        .unwrap()
    }

    /// Inserts a task directly, bypassing HTTP and the call log
    pub async fn seed_task(&self, title: &str, user_id: i32) -> Task {
        TaskStore::create(
            &self.store.inner,
            CreateTask {
                title: title.to_string(),
                description: format!("{} description", title),
                status: TaskStatus::Pending,
                user_id,
            },
        )
        .await
        .unwrap()
    }
}

/// Drives a request through a router and parses the response
pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!("Expected JSON body, got: {}", String::from_utf8_lossy(&body))
        })
    };

    (status, json)
}
