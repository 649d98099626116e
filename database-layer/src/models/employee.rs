use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Internal staff member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    #[serde(rename = "UID")]
    pub uid: i64,
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "CityID")]
    pub city_id: i16,
    #[serde(rename = "StateID")]
    pub state_id: i16,
    #[serde(rename = "Pincode")]
    pub pincode: String,
    #[serde(rename = "MobileNumber")]
    pub mobile_number: String,
    #[serde(rename = "CompanyEmailID")]
    pub company_email_id: String,
    #[serde(rename = "Designation")]
    pub designation: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "CreatedBy")]
    pub created_by: i64,
    #[serde(rename = "CreatedOn")]
    pub created_on: DateTime<Utc>,
    #[serde(rename = "LastUpdatedBy")]
    pub last_updated_by: i64,
    #[serde(rename = "LastUpdatedOn")]
    pub last_updated_on: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewEmployee {
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "CityID")]
    pub city_id: i16,
    #[serde(rename = "StateID")]
    pub state_id: i16,
    #[serde(rename = "Pincode")]
    pub pincode: String,
    #[serde(rename = "MobileNumber")]
    pub mobile_number: String,
    #[serde(rename = "CompanyEmailID")]
    pub company_email_id: String,
    #[serde(rename = "Designation")]
    pub designation: String,
    #[serde(rename = "Department")]
    pub department: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EmployeeUpdate {
    #[serde(rename = "FullName")]
    pub full_name: Option<String>,
    #[serde(rename = "Address")]
    pub address: Option<String>,
    #[serde(rename = "CityID")]
    pub city_id: Option<i16>,
    #[serde(rename = "StateID")]
    pub state_id: Option<i16>,
    #[serde(rename = "Pincode")]
    pub pincode: Option<String>,
    #[serde(rename = "MobileNumber")]
    pub mobile_number: Option<String>,
    #[serde(rename = "CompanyEmailID")]
    pub company_email_id: Option<String>,
    #[serde(rename = "Designation")]
    pub designation: Option<String>,
    #[serde(rename = "Department")]
    pub department: Option<String>,
}

impl EmployeeUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, employee: &mut Employee) {
        if let Some(v) = &self.full_name {
            employee.full_name = v.clone();
        }
        if let Some(v) = &self.address {
            employee.address = v.clone();
        }
        if let Some(v) = self.city_id {
            employee.city_id = v;
        }
        if let Some(v) = self.state_id {
            employee.state_id = v;
        }
        if let Some(v) = &self.pincode {
            employee.pincode = v.clone();
        }
        if let Some(v) = &self.mobile_number {
            employee.mobile_number = v.clone();
        }
        if let Some(v) = &self.company_email_id {
            employee.company_email_id = v.clone();
        }
        if let Some(v) = &self.designation {
            employee.designation = v.clone();
        }
        if let Some(v) = &self.department {
            employee.department = v.clone();
        }
    }
}
