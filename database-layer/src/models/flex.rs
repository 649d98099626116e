//! Lenient deserializers for lab payloads.
//!
//! Dates arrive either as `YYYY-MM-DD` or RFC3339; list-ish columns arrive
//! either as a ready string or as a JSON array which is stored comma-joined.

use chrono::{DateTime, NaiveDate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a date given as `YYYY-MM-DD` or an RFC3339 timestamp.
pub fn parse_flex_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|e| format!("date must be YYYY-MM-DD or RFC3339: {}", e))
}

/// `deserialize_with` target for optional flexible dates; null and "" mean absent.
pub fn flex_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_flex_date(&raw).map(Some).map_err(D::Error::custom),
    }
}

/// `deserialize_with` target for a string-or-array field.
pub fn flex_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Array(items)) => Ok(Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        )),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or array, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "flex_date")]
        date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "flex_list")]
        list: Option<String>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_date_only() {
        let p = probe(r#"{"date": "2026-03-03"}"#);
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2026, 3, 3));
    }

    #[test]
    fn test_rfc3339_date() {
        let p = probe(r#"{"date": "2025-12-31T10:00:00Z"}"#);
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[test]
    fn test_missing_and_null() {
        let p = probe("{}");
        assert!(p.date.is_none());
        assert!(p.list.is_none());

        let p = probe(r#"{"date": null, "list": null}"#);
        assert!(p.date.is_none());
        assert!(p.list.is_none());
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(serde_json::from_str::<Probe>(r#"{"date": "03/03/2026"}"#).is_err());
    }

    #[test]
    fn test_list_variants() {
        assert_eq!(probe(r#"{"list": [1, 2, 3]}"#).list.as_deref(), Some("1,2,3"));
        assert_eq!(probe(r#"{"list": ["home", "walkin"]}"#).list.as_deref(), Some("home,walkin"));
        assert_eq!(probe(r#"{"list": "560001,560002"}"#).list.as_deref(), Some("560001,560002"));
        assert!(serde_json::from_str::<Probe>(r#"{"list": 5}"#).is_err());
    }
}
