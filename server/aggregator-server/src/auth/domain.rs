//! `X-Domain` header handling.
//!
//! A domain is either one of the literals `employee`, `client`, `lab` or one
//! of the deployment hostnames configured per user type.

use crate::error::{ApiError, ApiResult};
use axum::http::HeaderMap;
use config_engine::DomainSettings;
use database_layer::models::UserType;

pub const DOMAIN_HEADER: &str = "x-domain";

/// Trimmed, lowercased `X-Domain` value; `None` when absent or blank
pub fn domain_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(DOMAIN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|raw| raw.trim().to_lowercase())
        .filter(|domain| !domain.is_empty())
}

/// Like [`domain_from_headers`] but a missing header is a bad request
pub fn require_domain(headers: &HeaderMap) -> ApiResult<String> {
    domain_from_headers(headers).ok_or_else(|| ApiError::bad_request("Domain header is required"))
}

fn normalize_host(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    without_scheme.trim_end_matches('/').to_string()
}

/// Maps domain strings to user types
#[derive(Debug, Clone, Default)]
pub struct DomainResolver {
    hosts: Vec<(String, UserType)>,
}

impl DomainResolver {
    pub fn new(settings: &DomainSettings) -> Self {
        let hosts = [
            (&settings.employee_domain_url, UserType::Employee),
            (&settings.client_domain_url, UserType::Client),
            (&settings.lab_domain_url, UserType::Lab),
        ]
        .into_iter()
        .map(|(url, user_type)| (normalize_host(url), user_type))
        .filter(|(host, _)| !host.is_empty())
        .collect();

        Self { hosts }
    }

    pub fn user_type(&self, domain: &str) -> Option<UserType> {
        let domain = normalize_host(domain);
        match domain.as_str() {
            "employee" => Some(UserType::Employee),
            "client" => Some(UserType::Client),
            "lab" => Some(UserType::Lab),
            _ => self
                .hosts
                .iter()
                .find(|(host, _)| *host == domain)
                .map(|(_, user_type)| *user_type),
        }
    }

    pub fn resolve(&self, domain: &str) -> ApiResult<UserType> {
        self.user_type(domain)
            .ok_or_else(|| ApiError::bad_request("Invalid domain"))
    }
}
