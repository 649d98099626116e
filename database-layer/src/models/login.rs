use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Kind of principal behind a login row.
///
/// Stored as the numeric code in new rows; older rows may carry the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Employee,
    Client,
    Lab,
}

impl UserType {
    pub fn code(self) -> i32 {
        match self {
            UserType::Employee => 1,
            UserType::Client => 2,
            UserType::Lab => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(UserType::Employee),
            2 => Some(UserType::Client),
            3 => Some(UserType::Lab),
            _ => None,
        }
    }

    /// Domain literal for this type
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Employee => "employee",
            UserType::Client => "client",
            UserType::Lab => "lab",
        }
    }

    /// Parse the `login.user_type` column, accepting both encodings
    pub fn from_stored(value: &str) -> Option<Self> {
        match value.trim() {
            "1" | "employee" => Some(UserType::Employee),
            "2" | "client" => Some(UserType::Client),
            "3" | "lab" => Some(UserType::Lab),
            _ => None,
        }
    }

    /// Value written to `user_type` columns
    pub fn stored_value(self) -> String {
        self.code().to_string()
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials row; `pwd` holds the legacy ciphertext
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Login {
    #[serde(rename = "RecordID")]
    pub record_id: i64,
    #[serde(rename = "UserID")]
    pub user_id: i64,
    #[serde(skip_serializing)]
    pub pwd: String,
    #[serde(rename = "UserType")]
    pub user_type: String,
    #[serde(rename = "CreatedOn")]
    pub created_on: DateTime<Utc>,
    #[serde(rename = "LastUpdatedOn")]
    pub last_updated_on: DateTime<Utc>,
}

/// Issued reset key; valid while unexpired and unconsumed
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ForgotPassword {
    #[serde(rename = "Uid")]
    pub uid: i64,
    #[serde(rename = "UserID")]
    pub user_id: i64,
    #[serde(rename = "UserType")]
    pub user_type: String,
    #[serde(rename = "ForgetPasswordKey")]
    pub forget_password_key: String,
    #[serde(rename = "CreatedOn")]
    pub created_on: DateTime<Utc>,
    #[serde(rename = "ExpiryTimestamp")]
    pub expiry_timestamp: DateTime<Utc>,
    #[serde(rename = "IsPasswordChanged")]
    pub is_password_changed: bool,
    #[serde(rename = "IsPasswordUpdatedOn")]
    pub is_password_updated_on: Option<DateTime<Utc>>,
}

impl ForgotPassword {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_password_changed && self.expiry_timestamp > now
    }
}
