use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PackageTestMapping {
    #[serde(rename = "PackageTestID")]
    pub package_test_id: i32,
    #[serde(rename = "PackageID")]
    pub package_id: i32,
    #[serde(rename = "TestID")]
    pub test_id: i32,
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

/// Client-specific price for a package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PackageClientMapping {
    #[serde(rename = "PackageClientID")]
    pub package_client_id: i32,
    #[serde(rename = "PackageID")]
    pub package_id: i32,
    #[serde(rename = "ClientID")]
    pub client_id: i64,
    #[serde(rename = "Price")]
    pub price: f64,
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

/// Lab-specific price for a package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PackageLabMapping {
    #[serde(rename = "PackageLabID")]
    pub package_lab_id: i32,
    #[serde(rename = "PackageID")]
    pub package_id: i32,
    #[serde(rename = "LabID")]
    pub lab_id: i64,
    #[serde(rename = "Price")]
    pub price: f64,
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
