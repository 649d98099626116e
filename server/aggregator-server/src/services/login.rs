//! Authentication, password reset and profile lookup.
//!
//! Callers are identified either by a legacy numeric `userId` or by the
//! `(domain, mobileNumber)` pair, where the domain selects which master table
//! the mobile number is looked up in. Passwords never leave the legacy cipher:
//! comparisons are made on ciphertext.

use crate::auth::{DomainResolver, TokenPair, TokenService};
use crate::error::{ApiError, ApiResult};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use crypto::LegacyCipher;
use database_layer::models::{Client, Employee, Lab, Login, UserType};
use database_layer::{
    ClientRepository, EmployeeRepository, ForgotPasswordRepository, LabRepository,
    LoginRepository, PgPool,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Lifetime of a forgot-password key
pub const FORGOT_PASSWORD_TTL_MINUTES: i64 = 5;

/// Master record behind a login
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Principal {
    Client(Client),
    Employee(Employee),
    Lab(Lab),
    Login(Login),
}

/// Caller resolved from `(domain, mobileNumber)` or a legacy user id
#[derive(Debug, Clone)]
pub struct ResolvedUser {
    pub user_id: i64,
    pub user_type: UserType,
    pub principal: Principal,
}

/// Login request body; `domain` comes from the `X-Domain` header
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(skip)]
    pub domain: Option<String>,
    #[serde(rename = "mobileNumber", default)]
    pub mobile_number: Option<String>,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "userId", default)]
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub user: Principal,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForgotPasswordKey {
    #[serde(rename = "forgetPasswordKey")]
    pub forget_password_key: String,
    pub expiry: String,
}

/// Plaintext carried inside an encrypted forgot-password key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordPayload {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "userType")]
    pub user_type: i32,
    #[serde(default)]
    pub expiry: String,
}

impl ForgotPasswordPayload {
    pub fn new(user_id: i64, user_type: UserType, expiry: DateTime<Utc>) -> Self {
        Self {
            user_id,
            user_type: user_type.code(),
            expiry: expiry.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Value of the `user_type` column the key was stored under
    pub fn stored_user_type(&self) -> String {
        self.user_type.to_string()
    }
}

#[derive(Clone)]
pub struct LoginService {
    logins: LoginRepository,
    forgot_passwords: ForgotPasswordRepository,
    clients: ClientRepository,
    employees: EmployeeRepository,
    labs: LabRepository,
    cipher: Option<Arc<LegacyCipher>>,
    tokens: TokenService,
    domains: DomainResolver,
}

impl std::fmt::Debug for LoginService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginService")
            .field("cipher_configured", &self.cipher.is_some())
            .field("domains", &self.domains)
            .finish_non_exhaustive()
    }
}

impl LoginService {
    pub fn new(
        pool: PgPool,
        cipher: Option<Arc<LegacyCipher>>,
        tokens: TokenService,
        domains: DomainResolver,
    ) -> Self {
        Self {
            logins: LoginRepository::new(pool.clone()),
            forgot_passwords: ForgotPasswordRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            employees: EmployeeRepository::new(pool.clone()),
            labs: LabRepository::new(pool),
            cipher,
            tokens,
            domains,
        }
    }

    fn encrypt(&self, plain_text: &str, failure: &str) -> ApiResult<String> {
        let cipher = self.cipher.as_deref().ok_or_else(|| {
            warn!("Legacy cipher is not configured");
            ApiError::internal(failure)
        })?;
        cipher.encrypt(plain_text).map_err(|e| {
            warn!(error = %e, "Legacy cipher encryption failed");
            ApiError::internal(failure)
        })
    }

    /// Look the mobile number up in the master table selected by `domain`
    pub async fn resolve_by_mobile(&self, domain: &str, mobile_number: &str) -> ApiResult<ResolvedUser> {
        let user_type = self.domains.resolve(domain)?;
        let not_found = || ApiError::not_found("User not found");

        let resolved = match user_type {
            UserType::Client => {
                let client = self
                    .clients
                    .find_by_contact_number(mobile_number)
                    .await?
                    .ok_or_else(not_found)?;
                ResolvedUser {
                    user_id: client.client_id,
                    user_type,
                    principal: Principal::Client(client),
                }
            }
            UserType::Employee => {
                let employee = self
                    .employees
                    .find_by_mobile_number(mobile_number)
                    .await?
                    .ok_or_else(not_found)?;
                ResolvedUser {
                    user_id: employee.uid,
                    user_type,
                    principal: Principal::Employee(employee),
                }
            }
            UserType::Lab => {
                let lab = self
                    .labs
                    .find_by_contact_number(mobile_number)
                    .await?
                    .ok_or_else(not_found)?;
                ResolvedUser {
                    user_id: lab.lab_id,
                    user_type,
                    principal: Principal::Lab(lab),
                }
            }
        };
        Ok(resolved)
    }

    pub async fn login(&self, request: LoginRequest) -> ApiResult<LoginResponse> {
        let domain = request.domain.as_deref().filter(|d| !d.is_empty());
        let mobile = request
            .mobile_number
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty());

        // (user id, user_type column value, token user type, principal)
        let (user_id, stored_type, user_type, principal) = match (domain, mobile, request.user_id) {
            (Some(domain), Some(mobile), _) => {
                let resolved = self.resolve_by_mobile(domain, mobile).await?;
                (
                    resolved.user_id,
                    resolved.user_type.stored_value(),
                    Some(resolved.user_type),
                    resolved.principal,
                )
            }
            (_, _, Some(user_id)) if user_id != 0 => {
                let login = self
                    .logins
                    .find_by_user_id(user_id)
                    .await?
                    .ok_or_else(|| ApiError::unauthorized("Invalid user ID or password"))?;
                let user_type = UserType::from_stored(&login.user_type);
                (login.user_id, login.user_type.clone(), user_type, Principal::Login(login))
            }
            _ => {
                return Err(ApiError::bad_request(
                    "Either (domain + mobileNumber) or userId is required",
                ))
            }
        };

        let encrypted = self.encrypt(&request.password, "Error validating credentials")?;
        let matched = self
            .logins
            .authenticate(user_id, &encrypted, &stored_type)
            .await
            .map_err(|e| {
                warn!(user_id, error = %e, "Credential lookup failed");
                ApiError::internal("Error validating credentials")
            })?;

        if !matched {
            info!(user_id, "Login rejected");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }

        // Untyped legacy rows sign in as clients
        let user_type = user_type.unwrap_or(UserType::Client);
        let tokens = self.tokens.issue_pair(user_id, user_type.code())?;
        info!(user_id, user_type = %user_type, "Login succeeded");

        Ok(LoginResponse {
            user: principal,
            tokens,
        })
    }

    /// Issue a reset key valid for five minutes
    pub async fn create_forgot_password_record(&self, domain: &str, mobile_number: &str) -> ApiResult<i32> {
        let resolved = self.resolve_by_mobile(domain, mobile_number).await?;

        let now = Utc::now();
        let expiry = now + Duration::minutes(FORGOT_PASSWORD_TTL_MINUTES);
        let payload = ForgotPasswordPayload::new(resolved.user_id, resolved.user_type, expiry);
        let plain = serde_json::to_string(&payload)
            .map_err(|_| ApiError::internal("Failed to generate reset key"))?;
        let key = self.encrypt(&plain, "Failed to generate reset key")?;

        self.forgot_passwords
            .create(
                resolved.user_id,
                &resolved.user_type.stored_value(),
                &key,
                now,
                expiry,
            )
            .await?;

        info!(user_id = resolved.user_id, "Forgot password key issued");
        Ok(1)
    }

    pub async fn latest_forgot_password_key(
        &self,
        domain: &str,
        mobile_number: &str,
    ) -> ApiResult<ForgotPasswordKey> {
        let resolved = self.resolve_by_mobile(domain, mobile_number).await?;
        let record = self
            .forgot_passwords
            .find_latest_valid(resolved.user_id, &resolved.user_type.stored_value(), Utc::now())
            .await?
            .ok_or_else(|| ApiError::not_found("Forgot password key not found or expired"))?;

        Ok(ForgotPasswordKey {
            forget_password_key: record.forget_password_key,
            expiry: record
                .expiry_timestamp
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }

    /// Reset the password with a key. `Ok(false)` means the key is expired,
    /// already used or unknown.
    pub async fn forgot_password_reset(&self, key: &str, new_password: &str) -> ApiResult<bool> {
        let cipher = self
            .cipher
            .as_deref()
            .ok_or_else(|| ApiError::internal("Failed to update password"))?;

        let plain = cipher
            .decrypt(key)
            .map_err(|_| ApiError::bad_request("Invalid forgot password key"))?;
        let payload: ForgotPasswordPayload = serde_json::from_str(&plain)
            .map_err(|_| ApiError::bad_request("Invalid forgot password key payload"))?;
        if payload.user_id == 0 {
            return Err(ApiError::bad_request("Invalid forgot password key"));
        }

        let Some(record) = self
            .forgot_passwords
            .find_valid_by_key(key, payload.user_id, &payload.stored_user_type(), Utc::now())
            .await?
        else {
            info!(user_id = payload.user_id, "Forgot password key rejected");
            return Ok(false);
        };

        let encrypted = self.encrypt(new_password, "Failed to update password")?;
        let consumed = self
            .forgot_passwords
            .consume_and_set_password(record.uid, payload.user_id, &encrypted)
            .await?;

        if consumed {
            info!(user_id = payload.user_id, "Password reset with forgot password key");
        }
        Ok(consumed)
    }

    /// `Ok(false)` when the old password does not match
    pub async fn change_password(
        &self,
        domain: &str,
        mobile_number: &str,
        old_password: &str,
        new_password: &str,
    ) -> ApiResult<bool> {
        let resolved = self.resolve_by_mobile(domain, mobile_number).await?;
        let old_encrypted = self.encrypt(old_password, "Error validating password")?;
        let new_encrypted = self.encrypt(new_password, "Failed to set new password")?;

        let rows = self
            .logins
            .update_password_if_matches(resolved.user_id, &old_encrypted, &new_encrypted)
            .await?;

        if rows > 0 {
            info!(user_id = resolved.user_id, "Password changed");
        }
        Ok(rows > 0)
    }

    pub async fn profile(
        &self,
        domain: &str,
        user_id: Option<&str>,
        mobile_number: Option<&str>,
    ) -> ApiResult<Principal> {
        if let Some(raw_id) = user_id.map(str::trim).filter(|id| !id.is_empty()) {
            let user_type = self.domains.resolve(domain)?;
            let id: i64 = raw_id
                .parse()
                .map_err(|_| ApiError::bad_request("userId must be a number"))?;
            let not_found = || ApiError::not_found("Profile not found");

            return match user_type {
                UserType::Client => Ok(Principal::Client(
                    self.clients.find_by_id(id).await?.ok_or_else(not_found)?,
                )),
                UserType::Lab => Ok(Principal::Lab(
                    self.labs.find_by_id(id).await?.ok_or_else(not_found)?,
                )),
                UserType::Employee => Err(ApiError::bad_request("Employee profile not supported")),
            };
        }

        if let Some(mobile) = mobile_number.map(str::trim).filter(|m| !m.is_empty()) {
            return Ok(self.resolve_by_mobile(domain, mobile).await?.principal);
        }

        Err(ApiError::bad_request("Either userId or mobileNumber is required"))
    }
}
