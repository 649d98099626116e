//! Public login endpoints. Everything except the legacy `userId` login and
//! the key-based reset needs the `X-Domain` header.

use crate::auth::{domain_from_headers, require_domain};
use crate::error::{ApiError, ApiResponse, ApiResult};
use crate::middleware::{AppJson, AppQuery};
use crate::server::AppState;
use crate::services::login::{ForgotPasswordKey, LoginRequest, LoginResponse, Principal};
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct MobileNumberBody {
    #[serde(rename = "mobileNumber", default)]
    pub mobile_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MobileNumberQuery {
    #[serde(rename = "mobileNumber", default)]
    pub mobile_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordResetRequest {
    #[serde(rename = "forgetPasswordKey")]
    pub forget_password_key: String,
    #[serde(rename = "Password")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "mobileNumber", default)]
    pub mobile_number: String,
    #[serde(rename = "OldPassword")]
    pub old_password: String,
    #[serde(rename = "NewPassword")]
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "mobileNumber")]
    pub mobile_number: Option<String>,
}

fn required_mobile(value: &str) -> ApiResult<&str> {
    let value = value.trim();
    if value.is_empty() {
        Err(ApiError::bad_request("mobileNumber is required"))
    } else {
        Ok(value)
    }
}

/// Pre-service checks on which identity form the caller used
fn validate_login_identity(request: &LoginRequest) -> ApiResult<()> {
    let has_mobile = request
        .mobile_number
        .as_deref()
        .is_some_and(|m| !m.trim().is_empty());
    let has_user_id = request.user_id.is_some_and(|id| id != 0);

    match (&request.domain, has_mobile, has_user_id) {
        (Some(_), false, false) => Err(ApiError::bad_request(
            "mobileNumber is required when using X-Domain",
        )),
        (None, _, false) => Err(ApiError::bad_request(
            "Either (domain + mobileNumber) or userId is required",
        )),
        _ => Ok(()),
    }
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(mut request): AppJson<LoginRequest>,
) -> ApiResult<ApiResponse<LoginResponse>> {
    request.domain = domain_from_headers(&headers);
    validate_login_identity(&request)?;

    let response = state.logins.login(request).await?;
    Ok(ApiResponse::ok(response).message("Authenticated"))
}

pub async fn create_forgot_password_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(body): AppJson<MobileNumberBody>,
) -> ApiResult<ApiResponse<i32>> {
    let domain = require_domain(&headers)?;
    let mobile = required_mobile(&body.mobile_number)?;

    let created = state
        .logins
        .create_forgot_password_record(&domain, mobile)
        .await?;
    Ok(ApiResponse::ok(created).message("Forgot password key generated successfully"))
}

pub async fn get_forgot_password_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppQuery(query): AppQuery<MobileNumberQuery>,
) -> ApiResult<ApiResponse<ForgotPasswordKey>> {
    let domain = require_domain(&headers)?;
    let mobile = required_mobile(&query.mobile_number)?;

    let key = state
        .logins
        .latest_forgot_password_key(&domain, mobile)
        .await?;
    Ok(ApiResponse::ok(key).message("Forgot password key fetched successfully"))
}

pub async fn forgot_password_reset(
    State(state): State<AppState>,
    AppJson(request): AppJson<ForgotPasswordResetRequest>,
) -> ApiResult<ApiResponse<i32>> {
    let reset = state
        .logins
        .forgot_password_reset(&request.forget_password_key, &request.password)
        .await?;
    if !reset {
        return Err(ApiError::bad_request("Invalid or expired forgot password key"));
    }
    Ok(ApiResponse::ok(1).message("Password updated successfully"))
}

pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(request): AppJson<ChangePasswordRequest>,
) -> ApiResult<ApiResponse<i32>> {
    let domain = require_domain(&headers)?;
    let mobile = required_mobile(&request.mobile_number)?;

    let changed = state
        .logins
        .change_password(&domain, mobile, &request.old_password, &request.new_password)
        .await?;
    if !changed {
        return Err(ApiError::bad_request("Old password does not match"));
    }
    Ok(ApiResponse::ok(1).message("Password updated successfully"))
}

pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppQuery(query): AppQuery<ProfileQuery>,
) -> ApiResult<ApiResponse<Principal>> {
    let domain = require_domain(&headers)?;
    let profile = state
        .logins
        .profile(&domain, query.user_id.as_deref(), query.mobile_number.as_deref())
        .await?;
    Ok(ApiResponse::ok(profile).message("Profile fetched successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(domain: Option<&str>, mobile: Option<&str>, user_id: Option<i64>) -> LoginRequest {
        LoginRequest {
            domain: domain.map(str::to_string),
            mobile_number: mobile.map(str::to_string),
            password: "secret".to_string(),
            user_id,
        }
    }

    #[test]
    fn test_identity_validation() {
        let err = validate_login_identity(&request(Some("client"), None, None)).unwrap_err();
        assert_eq!(err.message(), "mobileNumber is required when using X-Domain");

        let err = validate_login_identity(&request(None, Some("999"), None)).unwrap_err();
        assert_eq!(err.message(), "Either (domain + mobileNumber) or userId is required");

        let err = validate_login_identity(&request(None, None, Some(0))).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

        assert!(validate_login_identity(&request(Some("lab"), Some("999"), None)).is_ok());
        assert!(validate_login_identity(&request(None, None, Some(12))).is_ok());
        assert!(validate_login_identity(&request(Some("lab"), None, Some(12))).is_ok());
    }

    #[test]
    fn test_required_mobile() {
        assert_eq!(required_mobile(" 9998887776 ").unwrap(), "9998887776");
        assert_eq!(
            required_mobile("  ").unwrap_err().message(),
            "mobileNumber is required"
        );
    }
}
