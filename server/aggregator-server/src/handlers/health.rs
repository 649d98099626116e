use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
}

/// Liveness probe; answers even while the database is down
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse { message: "pong" })
}
