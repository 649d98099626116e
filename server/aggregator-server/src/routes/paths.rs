//! Route path constants.
//!
//! Paths inside the feature modules are relative to [`API_V1`]; `health`
//! carries absolute paths because the ping route is mounted outside the
//! versioned prefix too.

/// API base path
pub const API_V1: &str = "/api/v1";

/// Liveness endpoints
pub mod health {
    pub const PING: &str = "/ping";
    pub const API_PING: &str = "/api/v1/ping";
}

/// Public login endpoints
pub mod login {
    pub const LOGIN: &str = "/login";
    pub const FORGOT_PASSWORD: &str = "/login/forgot-password";
    pub const FORGOT_PASSWORD_KEY: &str = "/login/forgot-password-key";
    pub const CHANGE_PASSWORD: &str = "/login/change-password";
    pub const PROFILE: &str = "/login/profile";
}

pub mod packages {
    pub const PACKAGES: &str = "/packages";
    pub const PACKAGE_BY_ID: &str = "/packages/:id";
    pub const WITH_TESTS: &str = "/packages/with-tests";
    pub const WITH_TESTS_DETAILS: &str = "/packages/with-tests-details";
    pub const CLIENT_MAPPINGS: &str = "/packages/client-mapping";
    pub const CLIENT_MAPPING_BY_ID: &str = "/packages/client-mapping/:id";
    pub const LAB_MAPPINGS: &str = "/packages/lab-mapping";
    pub const LAB_MAPPING_BY_ID: &str = "/packages/lab-mapping/:id";
}

pub mod clients {
    pub const CLIENTS: &str = "/clients";
    pub const CLIENT_BY_CONTACT: &str = "/clients/contact";
    pub const CLIENT_BY_ID: &str = "/clients/:id";
    pub const LOCATIONS: &str = "/client/:client_id/locations";
    pub const LOCATION_BY_ID: &str = "/client/:client_id/locations/:id";
}

pub mod labs {
    pub const LABS: &str = "/labs";
    pub const LAB_BY_CONTACT: &str = "/labs/contact";
    pub const LAB_BY_ID: &str = "/labs/:id";
}

pub mod employees {
    pub const EMPLOYEES: &str = "/employees";
    pub const SEARCH: &str = "/employees/search";
    pub const EMPLOYEE_BY_ID: &str = "/employees/:id";
}

pub mod leads {
    pub const LEADS: &str = "/leads";
    pub const LEAD_BY_ID: &str = "/leads/:id";
    pub const BULK_STATUS: &str = "/leads/bulk-status";
    pub const BULK_CSV: &str = "/leads/bulk-csv";
}

pub mod test_catalog {
    pub const TESTS: &str = "/tests";
    pub const ACTIVE: &str = "/tests/active";
    pub const TEST_BY_ID: &str = "/tests/:id";
}
