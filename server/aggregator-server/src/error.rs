use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{SecondsFormat, Utc};
use crypto::CryptoError;
use database_layer::DatabaseError;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

const DEFAULT_MESSAGE: &str = "Success";

/// RFC3339 UTC timestamp with second precision, as carried by every envelope
pub fn server_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Standard success envelope: `{success, data?, message, timestamp, ...extra}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip)]
    status: StatusCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> ApiResponse<T> {
    fn with_status(status: StatusCode, data: Option<T>) -> Self {
        Self {
            status,
            success: true,
            data,
            message: DEFAULT_MESSAGE.to_string(),
            timestamp: server_timestamp(),
            extra: Map::new(),
        }
    }

    /// 200 with `data`
    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, Some(data))
    }

    /// 201 with `data`
    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, Some(data))
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        if !message.is_empty() {
            self.message = message;
        }
        self
    }

    /// Add a top-level field next to `data`
    pub fn extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }
}

impl ApiResponse<()> {
    /// 200 carrying only a message
    pub fn message_only(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, None).message(message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Error envelope: `{success: false, message, timestamp, ...extra}`
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(db_err) => database_status(db_err),
        }
    }

    /// Client-facing message; database internals are never echoed verbatim
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest { message }
            | ApiError::Unauthorized { message }
            | ApiError::NotFound { message }
            | ApiError::Conflict { message }
            | ApiError::Internal { message }
            | ApiError::ServiceUnavailable { message } => message.clone(),
            ApiError::Database(db_err) => Self::format_database_error(db_err),
        }
    }

    pub fn format_database_error(db_error: &DatabaseError) -> String {
        match db_error {
            DatabaseError::ConnectionFailed(_) => "Database unavailable".to_string(),
            DatabaseError::SqlxError(sqlx::Error::RowNotFound) => "Resource not found".to_string(),
            DatabaseError::SqlxError(sqlx::Error::Database(db)) => {
                if db.is_unique_violation() {
                    "A record with these details already exists".to_string()
                } else if db.is_foreign_key_violation() {
                    "Referenced record does not exist".to_string()
                } else if db.is_check_violation() {
                    "The provided data does not meet validation requirements".to_string()
                } else {
                    "Database operation failed".to_string()
                }
            }
            DatabaseError::SqlxError(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_),
            ) => "Database unavailable".to_string(),
            _ => "Database operation failed".to_string(),
        }
    }
}

fn database_status(db_error: &DatabaseError) -> StatusCode {
    match db_error {
        DatabaseError::ConnectionFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
        DatabaseError::SqlxError(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
        DatabaseError::SqlxError(sqlx::Error::Database(db)) => {
            if db.is_unique_violation() {
                StatusCode::CONFLICT
            } else if db.is_foreign_key_violation() || db.is_check_violation() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
        DatabaseError::SqlxError(
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_),
        ) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_with(Map::new())
    }
}

impl ApiError {
    /// Error envelope carrying additional top-level fields next to `message`
    pub fn into_response_with(self, extra: Map<String, Value>) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            let error_id = Uuid::new_v4().to_string();
            error!(
                error_id = %error_id,
                status_code = %status_code.as_u16(),
                error = %self,
                "API error occurred"
            );
        } else {
            warn!(status_code = %status_code.as_u16(), error = %self, "Request rejected");
        }

        let body = ApiErrorResponse {
            success: false,
            message: self.message(),
            timestamp: server_timestamp(),
            extra,
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(sqlx_error: sqlx::Error) -> Self {
        ApiError::Database(DatabaseError::SqlxError(sqlx_error))
    }
}

impl From<CryptoError> for ApiError {
    fn from(error: CryptoError) -> Self {
        ApiError::Internal {
            message: error.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(format!("Invalid query parameter: {}", rejection.body_text()))
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        ApiError::bad_request(format!("Invalid multipart body: {}", error.body_text()))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::bad_request(format!("Invalid multipart body: {}", rejection.body_text()))
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let response = ApiResponse::ok(vec![1, 2])
            .message("Lead statuses updated successfully")
            .extra("count", 2);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["data"], serde_json::json!([1, 2]));
        assert_eq!(value["message"], "Lead statuses updated successfully");
        assert_eq!(value["count"], 2);
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
        assert!(value.get("status").is_none());
    }

    #[test]
    fn test_default_message_and_message_only() {
        let value = serde_json::to_value(ApiResponse::ok(1).message("")).unwrap();
        assert_eq!(value["message"], "Success");

        let only = ApiResponse::message_only("Lead deleted successfully");
        assert_eq!(only.status_code(), StatusCode::OK);
        let value = serde_json::to_value(&only).unwrap();
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_created_status() {
        assert_eq!(ApiResponse::created(()).status_code(), StatusCode::CREATED);
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::internal("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::service_unavailable("x").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Resource not found");
    }

    #[test]
    fn test_pool_timeout_maps_to_503() {
        let err = ApiError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.message(), "Database unavailable");
    }

    #[tokio::test]
    async fn test_error_envelope_extra_fields() {
        let mut extra = Map::new();
        extra.insert("insertedCount".to_string(), Value::from(2));
        let response = ApiError::bad_request("Row 3: PatientName and ContactNumber are required")
            .into_response_with(extra);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["insertedCount"], 2);
        assert_eq!(
            value["message"],
            "Row 3: PatientName and ContactNumber are required"
        );
    }

    #[test]
    fn test_messages_are_not_prefixed() {
        assert_eq!(ApiError::not_found("Lead not found").message(), "Lead not found");
    }
}
