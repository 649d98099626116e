use super::flex::{flex_date, flex_list};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A partner laboratory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Lab {
    #[serde(rename = "LabID")]
    pub lab_id: i64,
    #[serde(rename = "LabName")]
    pub lab_name: String,
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
    #[serde(rename = "ContactPerson1Name1")]
    pub contact_person2_name: Option<String>,
    #[serde(rename = "ContactPerson1Number1")]
    pub contact_person2_number: Option<String>,
    #[serde(rename = "ContactPerson1EmailID1")]
    pub contact_person2_email_id: Option<String>,
    #[serde(rename = "ContactPerson1Designation1")]
    pub contact_person2_designation: Option<String>,
    #[serde(rename = "CategoryID")]
    pub category_id: Option<i16>,
    #[serde(rename = "GSTIN_UIN")]
    pub gstin_uin: Option<String>,
    #[serde(rename = "PANNumber")]
    pub pan_number: Option<String>,
    #[serde(rename = "MOUStartDate")]
    pub mou_start_date: Option<NaiveDate>,
    #[serde(rename = "MOUEndDate")]
    pub mou_end_date: Option<NaiveDate>,
    #[serde(rename = "AccreditationID")]
    pub accreditation_id: Option<i16>,
    #[serde(rename = "CollectionTypes")]
    pub collection_types: Option<String>,
    #[serde(rename = "ServicesID")]
    pub services_id: Option<String>,
    #[serde(rename = "CollectionPincodes")]
    pub collection_pincodes: Option<String>,
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

/// Create payload; everything but the name is optional
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewLab {
    #[serde(rename = "LabName")]
    pub lab_name: String,
    #[serde(flatten)]
    pub details: LabUpdate,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LabUpdate {
    #[serde(rename = "LabName", default)]
    pub lab_name: Option<String>,
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "CityID", default)]
    pub city_id: Option<i16>,
    #[serde(rename = "StateID", default)]
    pub state_id: Option<i16>,
    #[serde(rename = "Pincode", default)]
    pub pincode: Option<String>,
    #[serde(rename = "ContactPerson1Name", default)]
    pub contact_person1_name: Option<String>,
    #[serde(rename = "ContactPerson1Number", default)]
    pub contact_person1_number: Option<String>,
    #[serde(rename = "ContactPerson1EmailID", default)]
    pub contact_person1_email_id: Option<String>,
    #[serde(rename = "ContactPerson1Designation", default)]
    pub contact_person1_designation: Option<String>,
    #[serde(rename = "ContactPerson1Name1", default)]
    pub contact_person2_name: Option<String>,
    #[serde(rename = "ContactPerson1Number1", default)]
    pub contact_person2_number: Option<String>,
    #[serde(rename = "ContactPerson1EmailID1", default)]
    pub contact_person2_email_id: Option<String>,
    #[serde(rename = "ContactPerson1Designation1", default)]
    pub contact_person2_designation: Option<String>,
    #[serde(rename = "CategoryID", default)]
    pub category_id: Option<i16>,
    #[serde(rename = "GSTIN_UIN", default)]
    pub gstin_uin: Option<String>,
    #[serde(rename = "PANNumber", default)]
    pub pan_number: Option<String>,
    #[serde(rename = "MOUStartDate", default, deserialize_with = "flex_date")]
    pub mou_start_date: Option<NaiveDate>,
    #[serde(rename = "MOUEndDate", default, deserialize_with = "flex_date")]
    pub mou_end_date: Option<NaiveDate>,
    #[serde(rename = "AccreditationID", default)]
    pub accreditation_id: Option<i16>,
    #[serde(rename = "CollectionTypes", default, deserialize_with = "flex_list")]
    pub collection_types: Option<String>,
    #[serde(rename = "ServicesID", default, deserialize_with = "flex_list")]
    pub services_id: Option<String>,
    #[serde(rename = "CollectionPincodes", default, deserialize_with = "flex_list")]
    pub collection_pincodes: Option<String>,
    #[serde(rename = "IsActive", default)]
    pub is_active: Option<bool>,
}

impl LabUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge present fields into `lab`
    pub fn apply_to(&self, lab: &mut Lab) {
        fn merge<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *target = value.clone();
            }
        }

        if let Some(name) = &self.lab_name {
            lab.lab_name = name.clone();
        }
        merge(&mut lab.address, &self.address);
        merge(&mut lab.city_id, &self.city_id);
        merge(&mut lab.state_id, &self.state_id);
        merge(&mut lab.pincode, &self.pincode);
        merge(&mut lab.contact_person1_name, &self.contact_person1_name);
        merge(&mut lab.contact_person1_number, &self.contact_person1_number);
        merge(&mut lab.contact_person1_email_id, &self.contact_person1_email_id);
        merge(&mut lab.contact_person1_designation, &self.contact_person1_designation);
        merge(&mut lab.contact_person2_name, &self.contact_person2_name);
        merge(&mut lab.contact_person2_number, &self.contact_person2_number);
        merge(&mut lab.contact_person2_email_id, &self.contact_person2_email_id);
        merge(&mut lab.contact_person2_designation, &self.contact_person2_designation);
        merge(&mut lab.category_id, &self.category_id);
        merge(&mut lab.gstin_uin, &self.gstin_uin);
        merge(&mut lab.pan_number, &self.pan_number);
        merge(&mut lab.mou_start_date, &self.mou_start_date);
        merge(&mut lab.mou_end_date, &self.mou_end_date);
        merge(&mut lab.accreditation_id, &self.accreditation_id);
        merge(&mut lab.collection_types, &self.collection_types);
        merge(&mut lab.services_id, &self.services_id);
        merge(&mut lab.collection_pincodes, &self.collection_pincodes);
        if let Some(active) = self.is_active {
            lab.is_active = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_lab_accepts_flexible_input() {
        let lab: NewLab = serde_json::from_str(
            r#"{
                "LabName": "City Path Labs",
                "MOUStartDate": "2026-01-01",
                "MOUEndDate": "2027-01-01T00:00:00+05:30",
                "CollectionPincodes": [560001, 560002],
                "ServicesID": "1,4",
                "ContactPerson1Number1": "9123456780"
            }"#,
        )
        .unwrap();

        assert_eq!(lab.lab_name, "City Path Labs");
        assert_eq!(lab.details.mou_start_date, NaiveDate::from_ymd_opt(2026, 1, 1));
        assert_eq!(lab.details.mou_end_date, NaiveDate::from_ymd_opt(2027, 1, 1));
        assert_eq!(lab.details.collection_pincodes.as_deref(), Some("560001,560002"));
        assert_eq!(lab.details.services_id.as_deref(), Some("1,4"));
        assert_eq!(lab.details.contact_person2_number.as_deref(), Some("9123456780"));
        assert_eq!(lab.details.is_active, None);
    }

    #[test]
    fn test_name_is_required() {
        assert!(serde_json::from_str::<NewLab>(r#"{"Address": "x"}"#).is_err());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(LabUpdate::default().is_empty());
        let update: LabUpdate = serde_json::from_str(r#"{"IsActive": false}"#).unwrap();
        assert!(!update.is_empty());
    }
}
