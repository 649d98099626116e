//! Router assembly. Every feature router is mounted under `/api/v1`.

pub mod paths;

use crate::handlers::{client, client_location, employee, health, lab, lead, login, package, test};
use crate::server::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

/// `/ping` is served both at the root and under the API prefix
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route(paths::health::PING, get(health::ping))
        .route(paths::health::API_PING, get(health::ping))
}

pub fn login_routes() -> Router<AppState> {
    use paths::login::*;

    Router::new()
        .route(LOGIN, post(login::login))
        .route(FORGOT_PASSWORD, post(login::forgot_password_reset))
        .route(
            FORGOT_PASSWORD_KEY,
            post(login::create_forgot_password_key).get(login::get_forgot_password_key),
        )
        .route(CHANGE_PASSWORD, post(login::change_password))
        .route(PROFILE, get(login::get_profile))
}

pub fn package_routes() -> Router<AppState> {
    use paths::packages::*;

    Router::new()
        .route(PACKAGES, get(package::list_packages).post(package::create_package))
        .route(WITH_TESTS_DETAILS, get(package::list_packages_with_tests))
        .route(WITH_TESTS, post(package::create_package_with_tests))
        .route(
            CLIENT_MAPPINGS,
            get(package::list_client_mappings).post(package::create_client_mapping),
        )
        .route(CLIENT_MAPPING_BY_ID, put(package::update_client_mapping_status))
        .route(
            LAB_MAPPINGS,
            get(package::list_lab_mappings).post(package::create_lab_mapping),
        )
        .route(LAB_MAPPING_BY_ID, put(package::update_lab_mapping_status))
        .route(
            PACKAGE_BY_ID,
            get(package::get_package)
                .put(package::update_package_status)
                .delete(package::delete_package),
        )
}

pub fn client_routes() -> Router<AppState> {
    use paths::clients::*;

    Router::new()
        .route(CLIENTS, get(client::list_clients).post(client::create_client))
        .route(CLIENT_BY_CONTACT, get(client::get_client_by_contact))
        .route(
            CLIENT_BY_ID,
            get(client::get_client)
                .put(client::update_client)
                .delete(client::delete_client),
        )
        .route(
            LOCATIONS,
            get(client_location::list_locations).post(client_location::create_location),
        )
        .route(
            LOCATION_BY_ID,
            get(client_location::get_location)
                .put(client_location::update_location)
                .delete(client_location::delete_location),
        )
}

pub fn lab_routes() -> Router<AppState> {
    use paths::labs::*;

    Router::new()
        .route(LABS, get(lab::list_labs).post(lab::create_lab))
        .route(LAB_BY_CONTACT, get(lab::get_lab_by_contact))
        .route(
            LAB_BY_ID,
            get(lab::get_lab).put(lab::update_lab).delete(lab::delete_lab),
        )
}

pub fn employee_routes() -> Router<AppState> {
    use paths::employees::*;

    Router::new()
        .route(
            EMPLOYEES,
            get(employee::list_employees).post(employee::create_employee),
        )
        .route(SEARCH, get(employee::search_employee))
        .route(
            EMPLOYEE_BY_ID,
            get(employee::get_employee)
                .put(employee::update_employee)
                .delete(employee::delete_employee),
        )
}

pub fn lead_routes() -> Router<AppState> {
    use paths::leads::*;

    Router::new()
        .route(LEADS, get(lead::list_leads).post(lead::create_lead))
        .route(BULK_STATUS, post(lead::bulk_update_status))
        .route(BULK_CSV, post(lead::bulk_import_csv))
        .route(
            LEAD_BY_ID,
            get(lead::get_lead).put(lead::update_lead).delete(lead::delete_lead),
        )
}

pub fn test_routes() -> Router<AppState> {
    use paths::test_catalog::*;

    Router::new()
        .route(TESTS, get(test::list_tests))
        .route(ACTIVE, get(test::list_active_tests))
        .route(TEST_BY_ID, get(test::get_test))
}

/// Every versioned route, not yet nested
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(login_routes())
        .merge(package_routes())
        .merge(client_routes())
        .merge(lab_routes())
        .merge(employee_routes())
        .merge(lead_routes())
        .merge(test_routes())
}
