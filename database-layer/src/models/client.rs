use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A B2B customer that raises leads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Client {
    #[serde(rename = "ClientID")]
    pub client_id: i64,
    #[serde(rename = "ClientName")]
    pub client_name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "CityID")]
    pub city_id: i16,
    #[serde(rename = "StateID")]
    pub state_id: i16,
    #[serde(rename = "Pincode")]
    pub pincode: String,
    #[serde(rename = "ContactPerson1Name")]
    pub contact_person1_name: String,
    #[serde(rename = "ContactPerson1Number")]
    pub contact_person1_number: String,
    #[serde(rename = "ContactPerson1EmailID")]
    pub contact_person1_email_id: String,
    #[serde(rename = "ContactPerson1Designation")]
    pub contact_person1_designation: String,
    #[serde(rename = "ContactPerson2Name")]
    pub contact_person2_name: Option<String>,
    #[serde(rename = "ContactPerson2Number")]
    pub contact_person2_number: Option<String>,
    #[serde(rename = "ContactPerson2EmailID")]
    pub contact_person2_email_id: Option<String>,
    #[serde(rename = "ContactPerson2Designation")]
    pub contact_person2_designation: Option<String>,
    #[serde(rename = "CategoryID")]
    pub category_id: Option<i16>,
    #[serde(rename = "GSTIN_UIN")]
    pub gstin_uin: Option<String>,
    #[serde(rename = "PANNumber")]
    pub pan_number: Option<String>,
    #[serde(rename = "BusinessVertical")]
    pub business_vertical: String,
    #[serde(rename = "BillingName")]
    pub billing_name: Option<String>,
    #[serde(rename = "BillingAdderss")]
    pub billing_address: Option<String>,
    #[serde(rename = "BillingPincode")]
    pub billing_pincode: Option<String>,
    #[serde(rename = "IsAcitve")]
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

/// Create payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewClient {
    #[serde(rename = "ClientName")]
    pub client_name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "CityID")]
    pub city_id: i16,
    #[serde(rename = "StateID")]
    pub state_id: i16,
    #[serde(rename = "Pincode")]
    pub pincode: String,
    #[serde(rename = "ContactPerson1Name")]
    pub contact_person1_name: String,
    #[serde(rename = "ContactPerson1Number")]
    pub contact_person1_number: String,
    #[serde(rename = "ContactPerson1EmailID")]
    pub contact_person1_email_id: String,
    #[serde(rename = "ContactPerson1Designation")]
    pub contact_person1_designation: String,
    #[serde(rename = "ContactPerson2Name", default)]
    pub contact_person2_name: Option<String>,
    #[serde(rename = "ContactPerson2Number", default)]
    pub contact_person2_number: Option<String>,
    #[serde(rename = "ContactPerson2EmailID", default)]
    pub contact_person2_email_id: Option<String>,
    #[serde(rename = "ContactPerson2Designation", default)]
    pub contact_person2_designation: Option<String>,
    #[serde(rename = "CategoryID", default)]
    pub category_id: Option<i16>,
    #[serde(rename = "GSTIN_UIN", default)]
    pub gstin_uin: Option<String>,
    #[serde(rename = "PANNumber", default)]
    pub pan_number: Option<String>,
    #[serde(rename = "BusinessVertical")]
    pub business_vertical: String,
    #[serde(rename = "BillingName", default)]
    pub billing_name: Option<String>,
    #[serde(rename = "BillingAdderss", default)]
    pub billing_address: Option<String>,
    #[serde(rename = "BillingPincode", default)]
    pub billing_pincode: Option<String>,
    #[serde(rename = "IsAcitve", default)]
    pub is_active: bool,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClientUpdate {
    #[serde(rename = "ClientName")]
    pub client_name: Option<String>,
    #[serde(rename = "Address")]
    pub address: Option<String>,
    #[serde(rename = "CityID")]
    pub city_id: Option<i16>,
    #[serde(rename = "StateID")]
    pub state_id: Option<i16>,
    #[serde(rename = "Pincode")]
    pub pincode: Option<String>,
    #[serde(rename = "ContactPerson1Name")]
    pub contact_person1_name: Option<String>,
    #[serde(rename = "ContactPerson1Number")]
    pub contact_person1_number: Option<String>,
    #[serde(rename = "ContactPerson1EmailID")]
    pub contact_person1_email_id: Option<String>,
    #[serde(rename = "ContactPerson1Designation")]
    pub contact_person1_designation: Option<String>,
    #[serde(rename = "ContactPerson2Name")]
    pub contact_person2_name: Option<String>,
    #[serde(rename = "ContactPerson2Number")]
    pub contact_person2_number: Option<String>,
    #[serde(rename = "ContactPerson2EmailID")]
    pub contact_person2_email_id: Option<String>,
    #[serde(rename = "ContactPerson2Designation")]
    pub contact_person2_designation: Option<String>,
    #[serde(rename = "CategoryID")]
    pub category_id: Option<i16>,
    #[serde(rename = "GSTIN_UIN")]
    pub gstin_uin: Option<String>,
    #[serde(rename = "PANNumber")]
    pub pan_number: Option<String>,
    #[serde(rename = "BusinessVertical")]
    pub business_vertical: Option<String>,
    #[serde(rename = "BillingName")]
    pub billing_name: Option<String>,
    #[serde(rename = "BillingAdderss")]
    pub billing_address: Option<String>,
    #[serde(rename = "BillingPincode")]
    pub billing_pincode: Option<String>,
    #[serde(rename = "IsAcitve")]
    pub is_active: Option<bool>,
}

impl ClientUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge present fields into `client`
    pub fn apply_to(&self, client: &mut Client) {
        if let Some(v) = &self.client_name {
            client.client_name = v.clone();
        }
        if let Some(v) = &self.address {
            client.address = v.clone();
        }
        if let Some(v) = self.city_id {
            client.city_id = v;
        }
        if let Some(v) = self.state_id {
            client.state_id = v;
        }
        if let Some(v) = &self.pincode {
            client.pincode = v.clone();
        }
        if let Some(v) = &self.contact_person1_name {
            client.contact_person1_name = v.clone();
        }
        if let Some(v) = &self.contact_person1_number {
            client.contact_person1_number = v.clone();
        }
        if let Some(v) = &self.contact_person1_email_id {
            client.contact_person1_email_id = v.clone();
        }
        if let Some(v) = &self.contact_person1_designation {
            client.contact_person1_designation = v.clone();
        }
        if self.contact_person2_name.is_some() {
            client.contact_person2_name = self.contact_person2_name.clone();
        }
        if self.contact_person2_number.is_some() {
            client.contact_person2_number = self.contact_person2_number.clone();
        }
        if self.contact_person2_email_id.is_some() {
            client.contact_person2_email_id = self.contact_person2_email_id.clone();
        }
        if self.contact_person2_designation.is_some() {
            client.contact_person2_designation = self.contact_person2_designation.clone();
        }
        if self.category_id.is_some() {
            client.category_id = self.category_id;
        }
        if self.gstin_uin.is_some() {
            client.gstin_uin = self.gstin_uin.clone();
        }
        if self.pan_number.is_some() {
            client.pan_number = self.pan_number.clone();
        }
        if let Some(v) = &self.business_vertical {
            client.business_vertical = v.clone();
        }
        if self.billing_name.is_some() {
            client.billing_name = self.billing_name.clone();
        }
        if self.billing_address.is_some() {
            client.billing_address = self.billing_address.clone();
        }
        if self.billing_pincode.is_some() {
            client.billing_pincode = self.billing_pincode.clone();
        }
        if let Some(v) = self.is_active {
            client.is_active = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_optional_fields_default() {
        let client: NewClient = serde_json::from_str(
            r#"{
                "ClientName": "Acme Diagnostics",
                "Address": "1 Main St",
                "CityID": 4,
                "StateID": 2,
                "Pincode": "400001",
                "ContactPerson1Name": "Ravi",
                "ContactPerson1Number": "9876543210",
                "ContactPerson1EmailID": "ravi@acme.in",
                "ContactPerson1Designation": "Manager",
                "BusinessVertical": "Corporate"
            }"#,
        )
        .unwrap();

        assert_eq!(client.contact_person2_number, None);
        assert_eq!(client.gstin_uin, None);
        assert!(!client.is_active);
    }

    #[test]
    fn test_update_keeps_legacy_active_spelling() {
        let update: ClientUpdate = serde_json::from_str(r#"{"IsAcitve": true}"#).unwrap();
        assert_eq!(update.is_active, Some(true));
        assert!(!update.is_empty());
        assert!(ClientUpdate::default().is_empty());
    }
}
