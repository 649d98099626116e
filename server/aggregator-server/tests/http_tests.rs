use aggregator_server::auth::TokenService;
use aggregator_server::middleware::{CONTEXT_ID_HEADER, REQUEST_ID_HEADER, TRACE_ID_HEADER};
use aggregator_server::{create_app, database_config, AppState};
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use config_engine::AppConfig;
use database_layer::DatabasePool;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Router backed by a lazy pool; no test here reaches the database
fn test_app(db_ready: bool) -> (Router, TokenService) {
    let config = AppConfig::from_environment(config::Environment::with_prefix(
        "AGGREGATOR_HTTP_TEST",
    ))
    .expect("default configuration loads");
    let pool = DatabasePool::connect_lazy(&database_config(&config.database))
        .expect("lazy pool builds");
    let state = AppState::new(config, pool.pool().clone(), db_ready);
    let tokens = state.tokens.clone();
    (create_app(state), tokens)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn assert_error_envelope(body: &Value, message: &str) {
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!(message));
    assert!(body["timestamp"].is_string());
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_ping_answers_without_database() {
    for uri in ["/ping", "/api/v1/ping"] {
        let (app, _) = test_app(false);
        let (status, _, body) = send(app, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!({"message": "pong"}));
    }
}

#[tokio::test]
async fn test_database_guard_returns_503() {
    let (app, tokens) = test_app(false);
    let token = tokens.issue_pair(1, 1).unwrap().token;

    let request = Request::builder()
        .uri("/api/v1/leads")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app, request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_error_envelope(&body, "Database unavailable");
}

#[tokio::test]
async fn test_guard_covers_public_routes() {
    let (app, _) = test_app(false);
    let (status, _, body) = send(app, post_json("/api/v1/login", r#"{"userId": 1}"#)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_error_envelope(&body, "Database unavailable");
}

#[tokio::test]
async fn test_missing_authorization_header() {
    let (app, _) = test_app(true);
    let (status, _, body) = send(app, get("/api/v1/packages")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_envelope(&body, "Authorization header is required");
}

#[tokio::test]
async fn test_wrong_authorization_scheme() {
    let (app, _) = test_app(true);
    let request = Request::builder()
        .uri("/api/v1/clients")
        .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_envelope(&body, "Authorization header format must be Bearer {token}");
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let (app, _) = test_app(true);
    let foreign = TokenService::new(
        "some-other-secret",
        std::time::Duration::from_secs(60),
        std::time::Duration::from_secs(60),
    )
    .issue_pair(1, 1)
    .unwrap()
    .token;

    let request = Request::builder()
        .uri("/api/v1/labs")
        .header(AUTHORIZATION, format!("Bearer {foreign}"))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_envelope(&body, "Invalid or expired token");
}

#[tokio::test]
async fn test_invalid_path_parameter() {
    let (app, tokens) = test_app(true);
    let token = tokens.issue_pair(7, 1).unwrap().token;

    let request = Request::builder()
        .uri("/api/v1/leads/not-a-number")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid path parameter"));
}

#[tokio::test]
async fn test_malformed_json_body() {
    let (app, _) = test_app(true);
    let (status, _, body) = send(app, post_json("/api/v1/login", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_login_without_identity() {
    let (app, _) = test_app(true);
    let (status, _, body) = send(app, post_json("/api/v1/login", r#"{"Password": "x"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "Either (domain + mobileNumber) or userId is required");
}

#[tokio::test]
async fn test_login_domain_without_mobile() {
    let (app, _) = test_app(true);
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/login")
        .header(CONTENT_TYPE, "application/json")
        .header("x-domain", "client.example.com")
        .body(Body::from(r#"{"Password": "x"}"#))
        .unwrap();
    let (status, _, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "mobileNumber is required when using X-Domain");
}

#[tokio::test]
async fn test_forgot_password_key_requires_domain() {
    let (app, _) = test_app(true);
    let (status, _, body) = send(
        app,
        post_json(
            "/api/v1/login/forgot-password-key",
            r#"{"mobileNumber": "9876543210"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "Domain header is required");
}

#[tokio::test]
async fn test_correlation_headers_generated() {
    let (app, _) = test_app(false);
    let (_, headers, _) = send(app, get("/ping")).await;

    let context_id = headers.get(CONTEXT_ID_HEADER).unwrap().to_str().unwrap();
    assert_eq!(context_id.len(), 32);
    assert!(headers.get(REQUEST_ID_HEADER).is_some());
    assert!(headers.get(TRACE_ID_HEADER).is_some());
}

#[tokio::test]
async fn test_correlation_headers_echoed_on_errors() {
    let (app, _) = test_app(true);
    let request = Request::builder()
        .uri("/api/v1/employees")
        .header(REQUEST_ID_HEADER, "req-abc")
        .header(TRACE_ID_HEADER, "trace-abc")
        .header(CONTEXT_ID_HEADER, "ctx-abc")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers.get(REQUEST_ID_HEADER).unwrap(), "req-abc");
    assert_eq!(headers.get(TRACE_ID_HEADER).unwrap(), "trace-abc");
    assert_eq!(headers.get(CONTEXT_ID_HEADER).unwrap(), "ctx-abc");
}

fn csv_upload(token: &str, csv: &str) -> Request<Body> {
    let boundary = "aggregator-test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"ClientID\"\r\n\r\n5\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"PackageID\"\r\n\r\n9\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"leads.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = boundary,
    );
    Request::builder()
        .method("POST")
        .uri("/api/v1/leads/bulk-csv")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_csv_import_failure_reports_inserted_count() {
    let (app, tokens) = test_app(true);
    let token = tokens.issue_pair(7, 1).unwrap().token;
    let csv = "PatientName,ContactNumber,Age,Gender,Emailid,Address,CityID,StateID,Pincode\n\
               ,9876543210,30,M,a@example.com,1 Street,1,1,560001";

    let (status, _, body) = send(app, csv_upload(&token, csv)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("Row 1: PatientName and ContactNumber are required")
    );
    assert_eq!(body["insertedCount"], json!(0));
}

#[tokio::test]
async fn test_csv_import_missing_column_reports_zero_inserted() {
    let (app, tokens) = test_app(true);
    let token = tokens.issue_pair(7, 1).unwrap().token;

    let (status, _, body) = send(app, csv_upload(&token, "PatientName,Age\nAsha,30")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Missing required column: ContactNumber"));
    assert_eq!(body["insertedCount"], json!(0));
}

#[tokio::test]
async fn test_csv_import_rejects_non_multipart_body() {
    let (app, tokens) = test_app(true);
    let token = tokens.issue_pair(7, 1).unwrap().token;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/leads/bulk-csv")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, _, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid multipart body"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _) = test_app(true);
    let response = app.oneshot(get("/api/v1/does-not-exist")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
