use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A collection address belonging to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ClientLocation {
    #[serde(rename = "ClientLocationID")]
    pub client_location_id: i64,
    #[serde(rename = "ClientID")]
    pub client_id: i64,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Pincode")]
    pub pincode: String,
    #[serde(rename = "CityID")]
    pub city_id: i16,
    #[serde(rename = "StateID")]
    pub state_id: i16,
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

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewClientLocation {
    #[serde(rename = "Address", default)]
    pub address: String,
    #[serde(rename = "Pincode", default)]
    pub pincode: String,
    #[serde(rename = "CityID")]
    pub city_id: i16,
    #[serde(rename = "StateID")]
    pub state_id: i16,
    #[serde(rename = "IsActive", default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClientLocationUpdate {
    #[serde(rename = "Address")]
    pub address: Option<String>,
    #[serde(rename = "Pincode")]
    pub pincode: Option<String>,
    #[serde(rename = "CityID")]
    pub city_id: Option<i16>,
    #[serde(rename = "StateID")]
    pub state_id: Option<i16>,
    #[serde(rename = "IsActive")]
    pub is_active: Option<bool>,
}

impl ClientLocationUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, location: &mut ClientLocation) {
        if let Some(v) = &self.address {
            location.address = v.clone();
        }
        if let Some(v) = &self.pincode {
            location.pincode = v.clone();
        }
        if let Some(v) = self.city_id {
            location.city_id = v;
        }
        if let Some(v) = self.state_id {
            location.state_id = v;
        }
        if let Some(v) = self.is_active {
            location.is_active = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_location_defaults_active() {
        let location: NewClientLocation =
            serde_json::from_str(r#"{"CityID": 1, "StateID": 1, "Pincode": "110001"}"#).unwrap();
        assert!(location.is_active);
        assert_eq!(location.address, "");
    }

    #[test]
    fn test_update_merge() {
        let now = Utc::now();
        let mut location = ClientLocation {
            client_location_id: 9,
            client_id: 3,
            address: "Old".to_string(),
            pincode: "110001".to_string(),
            city_id: 1,
            state_id: 1,
            is_active: true,
            created_by: 1,
            created_on: now,
            last_updated_by: 1,
            last_updated_on: now,
        };

        let update: ClientLocationUpdate =
            serde_json::from_str(r#"{"Address": "New", "IsActive": false}"#).unwrap();
        update.apply_to(&mut location);

        assert_eq!(location.address, "New");
        assert!(!location.is_active);
        assert_eq!(location.pincode, "110001");
    }
}
