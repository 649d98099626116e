use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A diagnostic lead raised for a patient on behalf of a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Lead {
    #[serde(rename = "LeadID")]
    pub lead_id: i64,
    #[serde(rename = "ClientID")]
    pub client_id: i64,
    #[serde(rename = "PatientID")]
    pub patient_id: String,
    #[serde(rename = "PatientName")]
    pub patient_name: String,
    #[serde(rename = "Age")]
    pub age: i16,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "PackageID")]
    pub package_id: i32,
    #[serde(rename = "ContactNumber")]
    pub contact_number: String,
    #[serde(rename = "Emailid")]
    pub emailid: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "CityID")]
    pub city_id: i16,
    #[serde(rename = "StateID")]
    pub state_id: i16,
    #[serde(rename = "Pincode")]
    pub pincode: String,
    #[serde(rename = "LeadStatusID")]
    pub lead_status_id: i16,
    #[serde(rename = "CreatedBy")]
    pub created_by: i64,
    #[serde(rename = "CreatedOn")]
    pub created_on: DateTime<Utc>,
    #[serde(rename = "LastUpdatedBy")]
    pub last_updated_by: i64,
    #[serde(rename = "LastUpdatedOn")]
    pub last_updated_on: DateTime<Utc>,
}

/// A lead joined with its client and package names
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct LeadWithNames {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub lead: Lead,
    #[serde(rename = "ClientName")]
    pub client_name: String,
    #[serde(rename = "PackageName")]
    pub package_name: String,
}

/// Insert payload; `patient_id` is always derived by the caller
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewLead {
    #[serde(rename = "ClientID")]
    pub client_id: i64,
    #[serde(skip)]
    pub patient_id: String,
    #[serde(rename = "PatientName")]
    pub patient_name: String,
    #[serde(rename = "Age")]
    pub age: i16,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "PackageID")]
    pub package_id: i32,
    #[serde(rename = "ContactNumber")]
    pub contact_number: String,
    #[serde(rename = "Emailid")]
    pub emailid: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "CityID")]
    pub city_id: i16,
    #[serde(rename = "StateID")]
    pub state_id: i16,
    #[serde(rename = "Pincode")]
    pub pincode: String,
    #[serde(rename = "LeadStatusID")]
    pub lead_status_id: i16,
    #[serde(skip)]
    pub created_by: i64,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LeadUpdate {
    #[serde(rename = "ClientID")]
    pub client_id: Option<i64>,
    #[serde(rename = "PatientName")]
    pub patient_name: Option<String>,
    #[serde(rename = "Age")]
    pub age: Option<i16>,
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "PackageID")]
    pub package_id: Option<i32>,
    #[serde(rename = "ContactNumber")]
    pub contact_number: Option<String>,
    #[serde(rename = "Emailid")]
    pub emailid: Option<String>,
    #[serde(rename = "Address")]
    pub address: Option<String>,
    #[serde(rename = "CityID")]
    pub city_id: Option<i16>,
    #[serde(rename = "StateID")]
    pub state_id: Option<i16>,
    #[serde(rename = "Pincode")]
    pub pincode: Option<String>,
    #[serde(rename = "LeadStatusID")]
    pub lead_status_id: Option<i16>,
}

impl LeadUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// True when the merge changes an input of the derived patient id
    pub fn touches_patient_identity(&self) -> bool {
        self.patient_name.is_some() || self.contact_number.is_some()
    }

    /// Merge present fields into `lead`
    pub fn apply_to(&self, lead: &mut Lead) {
        if let Some(v) = self.client_id {
            lead.client_id = v;
        }
        if let Some(v) = &self.patient_name {
            lead.patient_name = v.clone();
        }
        if let Some(v) = self.age {
            lead.age = v;
        }
        if let Some(v) = &self.gender {
            lead.gender = v.clone();
        }
        if let Some(v) = self.package_id {
            lead.package_id = v;
        }
        if let Some(v) = &self.contact_number {
            lead.contact_number = v.clone();
        }
        if let Some(v) = &self.emailid {
            lead.emailid = v.clone();
        }
        if let Some(v) = &self.address {
            lead.address = v.clone();
        }
        if let Some(v) = self.city_id {
            lead.city_id = v;
        }
        if let Some(v) = self.state_id {
            lead.state_id = v;
        }
        if let Some(v) = &self.pincode {
            lead.pincode = v.clone();
        }
        if let Some(v) = self.lead_status_id {
            lead.lead_status_id = v;
        }
    }
}

/// Audit action recorded in `lead_history`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadAction {
    Create,
    Update,
    Delete,
    StatusUpdate,
    CsvImport,
}

impl LeadAction {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadAction::Create => "CREATE",
            LeadAction::Update => "UPDATE",
            LeadAction::Delete => "DELETE",
            LeadAction::StatusUpdate => "STATUS_UPDATE",
            LeadAction::CsvImport => "CSV_IMPORT",
        }
    }
}

impl std::fmt::Display for LeadAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit row per lead mutation
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct LeadHistory {
    #[serde(rename = "UID")]
    pub uid: i64,
    #[serde(rename = "LeadID")]
    pub lead_id: i64,
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "CreatedBy")]
    pub created_by: i64,
    #[serde(rename = "CreatedOn")]
    pub created_on: DateTime<Utc>,
}
