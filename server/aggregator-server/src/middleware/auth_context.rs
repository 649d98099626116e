//! Bearer-token authentication as an extractor.
//!
//! Adding `auth: AuthContext` to a handler makes the route protected: the
//! token is validated against the configured secret and the caller identity
//! becomes available as `auth.user_id`.

use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::server::AppState;
use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};
use database_layer::models::UserType;

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    /// Numeric user type code from the token
    pub user_type: i32,
    pub request: RequestContext,
}

impl AuthContext {
    pub fn new(user_id: i64, user_type: i32) -> Self {
        Self {
            user_id,
            user_type,
            request: RequestContext::from_headers(&Default::default()),
        }
    }

    pub fn kind(&self) -> Option<UserType> {
        UserType::from_code(self.user_type)
    }
}

/// Pull the bearer token out of the `Authorization` header
fn extract_token(parts: &Parts) -> Result<String, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Authorization header is required"))?;

    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim().to_string())
        }
        _ => Err(ApiError::unauthorized(
            "Authorization header format must be Bearer {token}",
        )),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let request = RequestContext::from_request_parts(parts, state).await?;
        let token = extract_token(parts)?;

        let app = AppState::from_ref(state);
        let claims = app.tokens.validate(&token)?;

        Ok(AuthContext {
            user_id: claims.user_id,
            user_type: claims.user_type,
            request,
        })
    }
}
