/// Cross-cutting error handler
///
/// Guarantees that every request ends in exactly one `{ "error": ... }`
/// response, whatever went wrong below the router:
///
/// - handlers returning [`ApiError::Unhandled`] already produce the response;
///   [`report_unhandled`] logs them unless running in production
/// - panics are caught by `CatchPanicLayer` and turned into the same shape by
///   [`panic_response`]
///
/// # Example
///
/// ```
/// use axum::{routing::get, Router};
/// use taskboard_api::config::Environment;
/// use taskboard_api::middleware::error_handler::handle_errors;
///
/// let app: Router = handle_errors(Router::new().route("/", get(|| async { "ok" })), Environment::Production);
/// ```

use crate::config::Environment;
use crate::error::{ApiError, UnhandledError};
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;

/// Wraps a router with panic recovery and unhandled-error reporting
pub fn handle_errors<S>(router: Router<S>, environment: Environment) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(environment, report_unhandled))
}

/// Logs unhandled errors outside production
///
/// The response itself is passed through untouched.
pub async fn report_unhandled(
    State(environment): State<Environment>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    if let Some(err) = response.extensions().get::<UnhandledError>() {
        if !environment.is_production() {
            tracing::error!(
                %method,
                %uri,
                status = err.status.as_u16(),
                error = %err.message,
                "Unhandled error"
            );
        }
    }

    response
}

/// Turns a caught panic into an unhandled-error response
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        String::new()
    };

    ApiError::internal(message).into_response()
}
