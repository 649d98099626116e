use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A sellable bundle of diagnostic tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Package {
    #[serde(rename = "PackageID")]
    pub package_id: i32,
    #[serde(rename = "PackageName")]
    pub package_name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "IsActive")]
    pub is_active: bool,
    #[serde(rename = "CreatedBy")]
    pub created_by: i64,
    #[serde(rename = "CreatedOn")]
    pub created_on: DateTime<Utc>,
    #[serde(rename = "LastUpdatedBy")]
    pub last_updated_by: i64,
    #[serde(rename = "LastUpdatedOn")]
    pub last_updated_on: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPackage {
    pub package_name: String,
    pub description: String,
    pub is_active: bool,
    pub created_by: i64,
}
