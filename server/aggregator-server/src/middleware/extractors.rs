//! Extractors whose rejections render as the JSON error envelope.
//!
//! Axum's stock `Json`, `Path` and `Query` reject with plain text; these
//! wrappers route the rejection through [`ApiError`] so malformed input is a
//! `400 {success: false, ...}` like every other failure.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};
use serde::Serialize;

/// JSON body extractor
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

impl<T: Serialize> axum::response::IntoResponse for AppJson<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}

/// Path parameter extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

/// Query string extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);
