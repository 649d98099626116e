//! Short-circuits requests while the database is unreachable.

use crate::error::ApiError;
use crate::routes::paths;
use crate::server::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

fn is_exempt(path: &str) -> bool {
    path == paths::health::PING || path == paths::health::API_PING
}

/// Every route except the ping endpoints answers 503 until the pool is usable
pub async fn db_guard_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.is_db_ready() && !is_exempt(request.uri().path()) {
        return ApiError::service_unavailable("Database unavailable").into_response();
    }

    next.run(request).await
}
