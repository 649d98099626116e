//! Aggregator Server - HTTP API of the B2B diagnostic aggregator
//!
//! Leads, packages with their test bundles and price mappings, the
//! client/lab/employee directories and login flows, served as JSON under
//! `/api/v1` with a uniform `{success, data, message, timestamp}` envelope.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod services;
pub mod types;

pub use error::*;
pub use server::{database_config, AppState};

use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Turn a handler panic into the 500 envelope
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");
    ApiError::internal("Internal server error").into_response()
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .nest(routes::paths::API_V1, routes::api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer())
                .layer(from_fn(middleware::request_context_middleware))
                .layer(from_fn_with_state(state.clone(), middleware::db_guard_middleware)),
        )
        .with_state(state)
}
