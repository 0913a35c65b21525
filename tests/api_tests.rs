use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use customer_service::{create_router, init_pool, run_migrations, AppState};

/// Create a test app with in-memory database.
async fn create_test_app() -> axum::Router {
    let pool = init_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    create_router(AppState::new(pool))
}

/// Helper to get response body as string.
async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(body: Body) -> Value {
    serde_json::from_str(&body_string(body).await).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn customer_json(name: &str) -> Value {
    json!({
        "name": name,
        "email": "contact@example.com",
        "phone": "1234567890",
        "address": "1 Main St",
        "companyName": "Acme",
        "industryType": "Retail",
        "customerStatus": "Active",
        "accountManager": "Sam",
        "audit": "2024-01-15T09:00:00Z"
    })
}

async fn create(app: &axum::Router, name: &str) -> Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/customers/createCustomer",
            customer_json(name),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response.into_body()).await
}

// ============================================================================
// Health endpoint tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app().await;

    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["status"], "ok");
}

// ============================================================================
// Create / read tests
// ============================================================================

#[tokio::test]
async fn test_create_customer() {
    let app = create_test_app().await;

    let json = create(&app, "Alice").await;

    assert_eq!(json["customerId"], 1);
    assert_eq!(json["name"], "Alice");
    assert_eq!(json["email"], "contact@example.com");
    assert_eq!(json["phone"], "1234567890");
    assert_eq!(json["companyName"], "Acme");
    assert_eq!(json["industryType"], "Retail");
    assert_eq!(json["customerStatus"], "Active");
    assert_eq!(json["accountManager"], "Sam");
    assert!(json["audit"].as_str().unwrap().starts_with("2024-01-15T09:00:00"));
}

#[tokio::test]
async fn test_create_customer_ignores_supplied_id() {
    let app = create_test_app().await;

    let mut body = customer_json("Alice");
    body["customerId"] = json!(500);
    let response = app
        .oneshot(json_request("POST", "/customers/createCustomer", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["customerId"], 1);
}

#[tokio::test]
async fn test_create_customer_validation_failure() {
    let app = create_test_app().await;

    let mut body = customer_json("A");
    body["phone"] = json!("12345");
    body["email"] = json!("nope");
    let response = app
        .clone()
        .oneshot(json_request("POST", "/customers/createCustomer", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["error"], "validation failed");
    let fields: Vec<&str> = json["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "phone"]);

    // Nothing was stored
    let response = app
        .oneshot(empty_request("GET", "/customers/getAllCustomer"))
        .await
        .unwrap();
    let json = body_json(response.into_body()).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_customer_missing_required_fields() {
    let app = create_test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/customers/createCustomer",
            json!({ "name": "Alice" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["violations"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_create_customer_null_required_field() {
    let app = create_test_app().await;

    let mut body = customer_json("Alice");
    body["name"] = Value::Null;
    body["address"] = Value::Null;
    let response = app
        .oneshot(json_request("POST", "/customers/createCustomer", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["error"], "validation failed");
    let fields: Vec<&str> = json["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "address"]);
}

#[tokio::test]
async fn test_get_all_customers() {
    let app = create_test_app().await;
    create(&app, "Alice").await;
    create(&app, "Bob").await;

    let response = app
        .oneshot(empty_request("GET", "/customers/getAllCustomer"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    let customers = json.as_array().unwrap();
    assert_eq!(customers.len(), 2);
    assert_eq!(customers[0]["name"], "Alice");
    assert_eq!(customers[1]["name"], "Bob");
}

#[tokio::test]
async fn test_get_customer_by_id() {
    let app = create_test_app().await;
    create(&app, "Alice").await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/customers/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["name"], "Alice");

    let response = app
        .oneshot(empty_request("GET", "/customers/2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Update / delete tests
// ============================================================================

#[tokio::test]
async fn test_update_customer() {
    let app = create_test_app().await;
    create(&app, "Alice").await;

    let mut body = customer_json("Alicia");
    body["customerId"] = json!(42);
    body["phone"] = Value::Null;
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/customers/1", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["customerId"], 1);
    assert_eq!(json["name"], "Alicia");
    assert!(json["phone"].is_null());

    let response = app
        .oneshot(empty_request("GET", "/customers/42"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_customer() {
    let app = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/customers/9", customer_json("Ghost")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("GET", "/customers/getAllCustomer"))
        .await
        .unwrap();
    let json = body_json(response.into_body()).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_customer() {
    let app = create_test_app().await;
    create(&app, "Alice").await;

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/customers/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/customers/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("DELETE", "/customers/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_id_in_path() {
    let app = create_test_app().await;

    let response = app
        .oneshot(empty_request("GET", "/customers/abc"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Bulk tests
// ============================================================================

#[tokio::test]
async fn test_bulk_load() {
    let app = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/customers/bulkLoad",
            json!([customer_json("Alice"), customer_json("Bob")]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    let saved = json.as_array().unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0]["customerId"], 1);
    assert_eq!(saved[1]["customerId"], 2);
}

#[tokio::test]
async fn test_bulk_load_with_invalid_entry_stores_nothing() {
    let app = create_test_app().await;

    let mut bad = customer_json("Bob");
    bad["phone"] = json!("12345");
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/customers/bulkLoad",
            json!([customer_json("Alice"), bad]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["violations"][0]["field"], "[1].phone");

    let response = app
        .oneshot(empty_request("GET", "/customers/getAllCustomer"))
        .await
        .unwrap();
    let json = body_json(response.into_body()).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_update_echoes_input() {
    let app = create_test_app().await;
    create(&app, "Alice").await;

    let mut known = customer_json("Alice Updated");
    known["customerId"] = json!(1);
    known["customerStatus"] = json!("Inactive");
    let mut unknown = customer_json("Nobody");
    unknown["customerId"] = json!(99);
    let request_body = json!([known, unknown]);

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/customers/bulkUpdate", request_body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    let echoed = json.as_array().unwrap();
    assert_eq!(echoed.len(), 2);
    assert_eq!(echoed[0]["customerId"], 1);
    assert_eq!(echoed[0]["name"], "Alice Updated");
    assert_eq!(echoed[1]["customerId"], 99);
    assert_eq!(echoed[1]["name"], "Nobody");

    // Only the known record was written
    let response = app
        .clone()
        .oneshot(empty_request("GET", "/customers/1"))
        .await
        .unwrap();
    let json = body_json(response.into_body()).await;
    assert_eq!(json["name"], "Alice Updated");
    assert_eq!(json["customerStatus"], "Inactive");

    let response = app
        .oneshot(empty_request("GET", "/customers/99"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
