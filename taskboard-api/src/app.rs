/// Application state and router builder
///
/// The stores are constructed by the caller and injected here; handlers
/// only ever see the `UserStore` / `TaskStore` traits.
///
/// # Example
///
/// ```
/// use taskboard_api::app::{build_router, AppState};
/// use taskboard_api::config::{Config, Environment};
/// use taskboard_shared::store::memory::MemoryStore;
///
/// let state = AppState::with_store(MemoryStore::new(), Config::in_memory(Environment::Test));
/// let app = build_router(state);
/// ```

use crate::{
    config::{Config, Environment},
    middleware::error_handler::handle_errors,
};
use axum::{routing::get, Router};
use std::sync::Arc;
use taskboard_shared::store::{TaskStore, UserStore};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// User persistence
    pub users: Arc<dyn UserStore>,

    /// Task persistence
    pub tasks: Arc<dyn TaskStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state from separate store handles
    pub fn new(users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>, config: Config) -> Self {
        Self {
            users,
            tasks,
            config: Arc::new(config),
        }
    }

    /// Creates state where one store serves both entities
    pub fn with_store<S>(store: S, config: Config) -> Self
    where
        S: UserStore + TaskStore + 'static,
    {
        let store = Arc::new(store);
        Self::new(store.clone(), store, config)
    }

    /// Operating mode
    pub fn environment(&self) -> Environment {
        self.config.api.environment
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET /health
/// ├── /users
/// │   ├── GET    /
/// │   ├── POST   /
/// │   ├── GET    /:id
/// │   ├── PUT    /:id
/// │   └── DELETE /:id
/// └── /tasks
///     ├── GET    /
///     ├── POST   /
///     ├── GET    /:id
///     ├── PUT    /:id
///     └── DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (inner to outer):
/// 1. Panic recovery and unhandled-error reporting
/// 2. Request logging (tower-http TraceLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{health, tasks, users};

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    let task_routes = Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/:id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        );

    let environment = state.environment();

    let router = Router::new()
        .route("/health", get(health::health_check))
        .nest("/users", user_routes)
        .nest("/tasks", task_routes)
        .with_state(state);

    handle_errors(router, environment).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}
