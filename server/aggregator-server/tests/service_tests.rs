// Service flows against a live Postgres; run with
// DATABASE_URL=postgres://... cargo test -p aggregator-server -- --ignored
use aggregator_server::auth::{DomainResolver, TokenService};
use aggregator_server::services::package::{MSG_MAPPING_BLOCKED, MSG_PACKAGE_EXISTS, RET_EXISTING};
use aggregator_server::services::{
    ClientService, LeadService, LoginRequest, LoginService, PackageService,
};
use aggregator_server::ApiError;
use axum::http::StatusCode;
use config_engine::DomainSettings;
use crypto::LegacyCipher;
use database_layer::models::{LeadUpdate, NewClient, NewLead, NewPackage};
use database_layer::{DatabaseConfig, DatabasePool, LeadHistoryRepository};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

const CLIENT_DOMAIN: &str = "client.example.com";

async fn setup() -> PgPool {
    let config = DatabaseConfig {
        url: std::env::var("DATABASE_URL").ok(),
        ..DatabaseConfig::default()
    };
    let db = DatabasePool::connect(&config).await.unwrap();
    db.migrate().await.unwrap();
    db.pool().clone()
}

async fn insert_test(pool: &PgPool, name: &str) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO tests (test_name, category, created_by, last_updated_by)
         VALUES ($1, 'Pathology', 1, 1) RETURNING test_id",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

fn new_package(name: &str) -> NewPackage {
    NewPackage {
        package_name: name.to_string(),
        description: "Service test package".to_string(),
        is_active: true,
        created_by: 42,
    }
}

fn new_client(contact_number: &str) -> NewClient {
    serde_json::from_value(json!({
        "ClientName": "Service Test Clinic",
        "Address": "1 Test Street",
        "CityID": 1,
        "StateID": 1,
        "Pincode": "560001",
        "ContactPerson1Name": "Asha",
        "ContactPerson1Number": contact_number,
        "ContactPerson1EmailID": "asha@example.com",
        "ContactPerson1Designation": "Manager",
        "BusinessVertical": "Corporate",
        "IsAcitve": true
    }))
    .unwrap()
}

#[tokio::test]
#[ignore]
async fn test_identical_test_set_returns_existing_package() {
    let pool = setup().await;
    let service = PackageService::new(pool.clone());
    let first = insert_test(&pool, "Service Test CBC").await;
    let second = insert_test(&pool, "Service Test Lipid").await;

    let created = service
        .create_with_tests(new_package("Wellness A"), &[second, first, first])
        .await
        .unwrap();
    assert!(!created.is_existing());
    assert_eq!(created.package.test_ids, vec![first, second]);

    let again = service
        .create_with_tests(new_package("Wellness B"), &[first, second])
        .await
        .unwrap();
    assert_eq!(again.ret_val, RET_EXISTING);
    assert_eq!(again.message, MSG_PACKAGE_EXISTS);
    assert_eq!(again.package.package.package_id, created.package.package.package_id);

    service
        .delete(created.package.package.package_id)
        .await
        .unwrap();
}

fn test_cipher() -> LegacyCipher {
    LegacyCipher::new("service-test-key", "service-test-salt").unwrap()
}

fn test_tokens() -> TokenService {
    TokenService::new(
        "service-test-secret",
        Duration::from_secs(3_600),
        Duration::from_secs(3_600),
    )
}

fn login_service(pool: PgPool) -> LoginService {
    let cipher = test_cipher();
    let tokens = test_tokens();
    let domains = DomainResolver::new(&DomainSettings {
        client_domain_url: format!("https://{CLIENT_DOMAIN}"),
        ..DomainSettings::default()
    });
    LoginService::new(pool, Some(Arc::new(cipher)), tokens, domains)
}

#[tokio::test]
#[ignore]
async fn test_forgot_password_key_is_single_use() {
    let pool = setup().await;
    let clients = ClientService::new(pool.clone());
    let logins = login_service(pool.clone());
    let mobile = "9876511111";

    let client = clients.create(new_client(mobile), 42).await.unwrap();
    sqlx::query("INSERT INTO logins (user_id, pwd, user_type) VALUES ($1, 'unset', '2')")
        .bind(client.client_id)
        .execute(&pool)
        .await
        .unwrap();

    assert_eq!(
        logins.create_forgot_password_record(CLIENT_DOMAIN, mobile).await.unwrap(),
        1
    );
    let key = logins
        .latest_forgot_password_key(CLIENT_DOMAIN, mobile)
        .await
        .unwrap()
        .forget_password_key;

    assert!(logins.forgot_password_reset(&key, "first-new").await.unwrap());
    assert!(!logins.forgot_password_reset(&key, "second-new").await.unwrap());

    let err = logins
        .latest_forgot_password_key(CLIENT_DOMAIN, mobile)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));

    sqlx::query("DELETE FROM forgot_passwords WHERE user_id = $1")
        .bind(client.client_id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM logins WHERE user_id = $1")
        .bind(client.client_id)
        .execute(&pool)
        .await
        .unwrap();
    clients.delete(client.client_id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_unknown_test_id_rejected() {
    let pool = setup().await;
    let service = PackageService::new(pool);

    let err = service
        .create_with_tests(new_package("Broken"), &[i32::MAX])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
    assert_eq!(err.message(), format!("Test not found: {}", i32::MAX));
}

#[tokio::test]
#[ignore]
async fn test_mapping_activation_blocked_while_package_inactive() {
    let pool = setup().await;
    let packages = PackageService::new(pool.clone());
    let clients = ClientService::new(pool.clone());

    let package = packages.create(new_package("Blocked Mapping")).await.unwrap();
    let client = clients.create(new_client("9876500000"), 42).await.unwrap();

    let mapping = packages
        .create_client_mapping(package.package_id, client.client_id, 499.0, 42)
        .await
        .unwrap();
    assert!(mapping.is_created());

    let cascade = packages
        .update_status(package.package_id, false, 42)
        .await
        .unwrap();
    assert!(!cascade.package.is_active);

    let blocked = packages
        .update_client_mapping_status(mapping.mapping.package_client_id, true, 42)
        .await
        .unwrap();
    assert_eq!(blocked.ret_val, RET_EXISTING);
    assert_eq!(blocked.message, MSG_MAPPING_BLOCKED);
    assert!(!blocked.mapping.is_active);

    packages.update_status(package.package_id, true, 42).await.unwrap();
    let reactivated = packages
        .update_client_mapping_status(mapping.mapping.package_client_id, true, 42)
        .await
        .unwrap();
    assert!(reactivated.is_created());
    assert!(reactivated.mapping.is_active);

    packages.delete(package.package_id).await.unwrap();
    clients.delete(client.client_id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_mapping_requires_existing_client() {
    let pool = setup().await;
    let packages = PackageService::new(pool);

    let package = packages.create(new_package("Orphan Mapping")).await.unwrap();
    let err = packages
        .create_client_mapping(package.package_id, i64::MAX, 100.0, 42)
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Client not found");

    packages.delete(package.package_id).await.unwrap();
}

fn new_lead(patient_name: &str, contact_number: &str) -> NewLead {
    NewLead {
        client_id: 1,
        patient_id: String::new(),
        patient_name: patient_name.to_string(),
        age: 41,
        gender: "F".to_string(),
        package_id: 1,
        contact_number: contact_number.to_string(),
        emailid: "patient@example.com".to_string(),
        address: "1 Test Street".to_string(),
        city_id: 1,
        state_id: 1,
        pincode: "560001".to_string(),
        lead_status_id: 1,
        created_by: 0,
    }
}

/// Actions for one lead, oldest first
async fn history_actions(pool: &PgPool, lead_id: i64) -> Vec<String> {
    let mut actions: Vec<String> = LeadHistoryRepository::new(pool.clone())
        .find_by_lead_id(lead_id)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.action)
        .collect();
    actions.reverse();
    actions
}

async fn delete_history(pool: &PgPool, lead_id: i64) {
    sqlx::query("DELETE FROM lead_history WHERE lead_id = $1")
        .bind(lead_id)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn test_lead_update_and_delete_keep_history() {
    let pool = setup().await;
    let leads = LeadService::new(pool.clone());

    let created = leads
        .create(new_lead("John Mary Doe", "9876543210"), 42)
        .await
        .unwrap();
    assert_eq!(created.patient_id, "JMD9876543210");

    let renumbered = leads
        .update(
            created.lead_id,
            LeadUpdate {
                contact_number: Some("9123456789".to_string()),
                ..LeadUpdate::default()
            },
            43,
        )
        .await
        .unwrap();
    assert_eq!(renumbered.patient_id, "JMD9123456789");
    assert_eq!(renumbered.last_updated_by, 43);

    let moved = leads
        .update(
            created.lead_id,
            LeadUpdate {
                address: Some("2 New Street".to_string()),
                ..LeadUpdate::default()
            },
            43,
        )
        .await
        .unwrap();
    assert_eq!(moved.patient_id, "JMD9123456789");
    assert_eq!(moved.address, "2 New Street");

    leads.delete(created.lead_id, 44).await.unwrap();
    assert_eq!(
        history_actions(&pool, created.lead_id).await,
        vec!["CREATE", "UPDATE", "UPDATE", "DELETE"]
    );

    let err = leads.delete(created.lead_id, 44).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
    assert_eq!(history_actions(&pool, created.lead_id).await.len(), 4);

    delete_history(&pool, created.lead_id).await;
}

#[tokio::test]
#[ignore]
async fn test_csv_import_keeps_rows_before_failure() {
    let pool = setup().await;
    let leads = LeadService::new(pool.clone());
    let client_id = 8_000_000_000 + i64::from(std::process::id());
    let csv = "PatientName,ContactNumber,Age,Gender,Emailid,Address,CityID,StateID,Pincode\n\
               Asha Rao,9000000001,30,F,asha@example.com,1 Street,1,1,560001\n\
               Ravi Kumar,9000000002,35,M,ravi@example.com,2 Street,1,1,560002\n\
               ,9000000003,40,F,x@example.com,3 Street,1,1,560003\n\
               Meena Iyer,9000000004,45,F,meena@example.com,4 Street,1,1,560004\n";

    let failure = leads
        .import_csv(csv.as_bytes(), client_id, 9, 42)
        .await
        .unwrap_err();
    assert_eq!(failure.inserted, 2);
    assert_eq!(failure.source.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        failure.source.message(),
        "Row 3: PatientName and ContactNumber are required"
    );

    let lead_ids: Vec<i64> =
        sqlx::query_scalar("SELECT lead_id FROM leads WHERE client_id = $1 ORDER BY lead_id")
            .bind(client_id)
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(lead_ids.len(), 2);

    for lead_id in &lead_ids {
        assert_eq!(history_actions(&pool, *lead_id).await, vec!["CSV_IMPORT"]);
        delete_history(&pool, *lead_id).await;
    }
    sqlx::query("DELETE FROM leads WHERE client_id = $1")
        .bind(client_id)
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn test_login_forms_issue_same_claims() {
    let pool = setup().await;
    let clients = ClientService::new(pool.clone());
    let logins = login_service(pool.clone());
    let tokens = test_tokens();
    let mobile = "9876522222";

    let client = clients.create(new_client(mobile), 42).await.unwrap();
    let stored = test_cipher().encrypt("first-secret").unwrap();
    sqlx::query("INSERT INTO logins (user_id, pwd, user_type) VALUES ($1, $2, '2')")
        .bind(client.client_id)
        .bind(&stored)
        .execute(&pool)
        .await
        .unwrap();

    let by_mobile = logins
        .login(LoginRequest {
            domain: Some(CLIENT_DOMAIN.to_string()),
            mobile_number: Some(mobile.to_string()),
            password: "first-secret".to_string(),
            user_id: None,
        })
        .await
        .unwrap();
    let by_user_id = logins
        .login(LoginRequest {
            password: "first-secret".to_string(),
            user_id: Some(client.client_id),
            ..LoginRequest::default()
        })
        .await
        .unwrap();

    let mobile_claims = tokens.validate(&by_mobile.tokens.token).unwrap();
    let legacy_claims = tokens.validate(&by_user_id.tokens.token).unwrap();
    assert_eq!(
        (mobile_claims.user_id, mobile_claims.user_type),
        (legacy_claims.user_id, legacy_claims.user_type)
    );
    assert_eq!((mobile_claims.user_id, mobile_claims.user_type), (client.client_id, 2));

    let err = logins
        .login(LoginRequest {
            password: "wrong-secret".to_string(),
            user_id: Some(client.client_id),
            ..LoginRequest::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(err.message(), "Invalid credentials");

    assert!(!logins
        .change_password(CLIENT_DOMAIN, mobile, "wrong-secret", "second-secret")
        .await
        .unwrap());
    assert!(logins
        .change_password(CLIENT_DOMAIN, mobile, "first-secret", "second-secret")
        .await
        .unwrap());
    logins
        .login(LoginRequest {
            password: "second-secret".to_string(),
            user_id: Some(client.client_id),
            ..LoginRequest::default()
        })
        .await
        .unwrap();

    sqlx::query("DELETE FROM logins WHERE user_id = $1")
        .bind(client.client_id)
        .execute(&pool)
        .await
        .unwrap();
    clients.delete(client.client_id).await.unwrap();
}
