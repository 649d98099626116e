//! Request correlation ids and the per-request access log line.
//!
//! - `X-Context-Id`: echoed, or 16 random bytes hex-encoded
//! - `X-Request-Id` / `X-Trace-Id`: echoed, or a fresh UUID v4
//!
//! All three are set on the response and stored in the request extensions so
//! handlers can pick them up through [`RequestContext`].

use crate::error::ApiError;
use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request};
use axum::http::{request::Parts, HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use lazy_static::lazy_static;
use logger_redacted::{PiiRedactor, RedactionConfig};
use rand::RngCore;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

pub const CONTEXT_ID_HEADER: &str = "x-context-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const TRACE_ID_HEADER: &str = "x-trace-id";

lazy_static! {
    static ref URI_REDACTOR: PiiRedactor = PiiRedactor::new(RedactionConfig::default());
}

/// Correlation ids for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub context_id: String,
    pub request_id: String,
    pub trace_id: String,
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// 16 random bytes, hex encoded
pub fn generate_context_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            context_id: header_value(headers, CONTEXT_ID_HEADER).unwrap_or_else(generate_context_id),
            request_id: header_value(headers, REQUEST_ID_HEADER)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            trace_id: header_value(headers, TRACE_ID_HEADER)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        }
    }

    fn write_headers(&self, headers: &mut HeaderMap) {
        for (name, value) in [
            (CONTEXT_ID_HEADER, &self.context_id),
            (REQUEST_ID_HEADER, &self.request_id),
            (TRACE_ID_HEADER, &self.trace_id),
        ] {
            match HeaderValue::from_str(value) {
                Ok(value) => {
                    headers.insert(HeaderName::from_static(name), value);
                }
                Err(_) => warn!(header = name, "Skipping non-ASCII correlation id"),
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(|| RequestContext::from_headers(&parts.headers)))
    }
}

/// Attach correlation ids and log one line per request
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let context = RequestContext::from_headers(request.headers());
    let method = request.method().clone();
    let uri = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    request.extensions_mut().insert(context.clone());

    let mut response = next.run(request).await;
    context.write_headers(response.headers_mut());

    info!(
        method = %method,
        path = %URI_REDACTOR.redact_uri(&uri),
        status = response.status().as_u16(),
        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        request_id = %context.request_id,
        trace_id = %context.trace_id,
        context_id = %context.context_id,
        "Request processed"
    );

    response
}
