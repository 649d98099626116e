//! Access and refresh token issuance.
//!
//! Both tokens are HS256 JWTs carrying the same `{userId, userType}` pair;
//! only their expiry differs.

use crate::error::{ApiError, ApiResult};
use chrono::Utc;
use config_engine::JwtSettings;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// JWT claims shared by access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "userType")]
    pub user_type: i32,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(user_id: i64, user_type: i32, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            user_id,
            user_type,
            iat: now,
            exp: now.saturating_add(ttl_secs),
        }
    }
}

/// Issued token pair
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Signs and validates tokens with the configured secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_settings(settings: &JwtSettings) -> Self {
        Self::new(&settings.secret, settings.access_ttl(), settings.refresh_ttl())
    }

    fn sign(&self, claims: &TokenClaims) -> ApiResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Issue an access token and a refresh token for the same identity
    pub fn issue_pair(&self, user_id: i64, user_type: i32) -> ApiResult<TokenPair> {
        let token = self.sign(&TokenClaims::new(user_id, user_type, self.access_ttl))?;
        let refresh_token = self.sign(&TokenClaims::new(user_id, user_type, self.refresh_ttl))?;
        debug!(user_id, user_type, "Issued token pair");

        Ok(TokenPair {
            token,
            refresh_token,
        })
    }

    /// Verify signature and expiry
    pub fn validate(&self, token: &str) -> ApiResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                ApiError::unauthorized("Invalid or expired token")
            })
    }
}
