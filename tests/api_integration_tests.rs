//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for each route against in-process
//! stores.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use catalog_sync::{api::create_router, AppState};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::in_memory(Duration::from_secs(1)))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn create_category(app: &Router, name: &str) -> Value {
    let (status, json) = send(app, "POST", "/categories", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

async fn create_user(app: &Router, name: &str, email: &str) -> Value {
    let body = json!({ "name": name, "email": email });
    let (status, json) = send(app, "POST", "/users", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

async fn create_product(app: &Router, body: Value) -> Value {
    let (status, json) = send(app, "POST", "/products", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", json);
    json
}

// == Category Endpoint Tests ==

#[tokio::test]
async fn test_create_and_list_categories() {
    let app = create_test_app();

    let created = create_category(&app, "Furniture").await;
    assert_eq!(created["name"], "Furniture");
    assert!(created["id"].as_str().is_some());

    let (status, json) = send(&app, "GET", "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_category_patch_is_rejected_without_mutation() {
    let app = create_test_app();
    let category = create_category(&app, "Furniture").await;
    let uri = format!("/categories/{}", category["id"].as_str().unwrap());

    let (status, json) = send(&app, "PATCH", &uri, Some(json!({ "name": "ab" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().is_some());

    let (_, json) = send(&app, "GET", &uri, None).await;
    assert_eq!(json["name"], "Furniture");
}

#[tokio::test]
async fn test_delete_category_in_use_conflicts() {
    let app = create_test_app();
    let category = create_category(&app, "Furniture").await;
    create_product(
        &app,
        json!({
            "name": "Oak table",
            "description": "Solid oak dining table",
            "value": "350.00",
            "categoryId": category["id"],
        }),
    )
    .await;

    let uri = format!("/categories/{}", category["id"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_category_reads_include_products() {
    let app = create_test_app();
    let category = create_category(&app, "Lighting").await;
    create_category(&app, "Garden").await;
    let user = create_user(&app, "Alice Smith", "alice@example.com").await;
    let product = create_product(
        &app,
        json!({
            "name": "Desk lamp",
            "description": "Warm white light",
            "value": 19.99,
            "categoryId": category["id"],
            "userId": user["id"],
        }),
    )
    .await;

    let uri = format!("/categories/{}", category["id"].as_str().unwrap());
    let (status, detail) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let products = detail["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], product["id"]);
    assert_eq!(products[0]["value"], 19.99);
    assert_eq!(products[0]["user"]["email"], "alice@example.com");

    let (_, listings) = send(&app, "GET", "/categories", None).await;
    for listing in listings.as_array().unwrap() {
        let products = listing["products"].as_array().unwrap();
        if listing["id"] == category["id"] {
            assert_eq!(products.len(), 1);
            assert!(products[0].get("user").is_none());
        } else {
            assert!(products.is_empty());
        }
    }
}

// == Product Endpoint Tests ==

#[tokio::test]
async fn test_create_product_loads_relations() {
    let app = create_test_app();
    let category = create_category(&app, "Furniture").await;
    let user = create_user(&app, "Alice Smith", "alice@example.com").await;

    let product = create_product(
        &app,
        json!({
            "name": "Oak table",
            "description": "Solid oak dining table",
            "value": "350.00",
            "categoryId": category["id"],
            "userId": user["id"],
        }),
    )
    .await;

    assert_eq!(product["category"]["name"], "Furniture");
    assert_eq!(product["user"]["email"], "alice@example.com");
    assert_eq!(product["value"], 350.0);
    assert!(product["createdAt"].as_str().is_some());
}

#[tokio::test]
async fn test_create_product_with_unknown_category() {
    let app = create_test_app();

    let body = json!({
        "name": "Oak table",
        "description": "Solid oak dining table",
        "value": "350.00",
        "categoryId": "nonexistent",
    });
    let (status, json) = send(&app, "POST", "/products", Some(body)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("nonexistent"));

    let (_, list) = send(&app, "GET", "/products", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_product_with_bad_value() {
    let app = create_test_app();
    let category = create_category(&app, "Furniture").await;

    let body = json!({
        "name": "Oak table",
        "description": "Solid oak dining table",
        "value": "-1",
        "categoryId": category["id"],
    });
    let (status, _) = send(&app, "POST", "/products", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_list_reflects_update() {
    let app = create_test_app();
    let category = create_category(&app, "Furniture").await;
    let product = create_product(
        &app,
        json!({
            "name": "Oak table",
            "description": "Solid oak dining table",
            "value": "350.00",
            "categoryId": category["id"],
        }),
    )
    .await;

    // warm the cache
    send(&app, "GET", "/products", None).await;

    let uri = format!("/products/{}", product["id"].as_str().unwrap());
    let (status, updated) = send(&app, "PATCH", &uri, Some(json!({ "value": 299.99 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["value"], 299.99);
    assert_eq!(updated["name"], "Oak table");

    let (_, list) = send(&app, "GET", "/products", None).await;
    assert_eq!(list[0]["value"], 299.99);
}

#[tokio::test]
async fn test_search_endpoint() {
    let app = create_test_app();
    let category = create_category(&app, "Furniture").await;
    for (name, description) in [
        ("Oak table", "Solid oak dining table"),
        ("Pine shelf", "Wall mounted shelf"),
        ("Desk chair", "Ergonomic chair in OAK veneer"),
    ] {
        create_product(
            &app,
            json!({
                "name": name,
                "description": description,
                "value": "10.00",
                "categoryId": category["id"],
            }),
        )
        .await;
    }

    let (status, json) = send(&app, "GET", "/products/search?q=oak", None).await;
    assert_eq!(status, StatusCode::OK);
    let mut names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Desk chair", "Oak table"]);

    let (_, json) = send(&app, "GET", "/products/search?q=sofa", None).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_product_endpoint() {
    let app = create_test_app();
    let category = create_category(&app, "Furniture").await;
    let product = create_product(
        &app,
        json!({
            "name": "Oak table",
            "description": "Solid oak dining table",
            "value": "350.00",
            "categoryId": category["id"],
        }),
    )
    .await;
    let uri = format!("/products/{}", product["id"].as_str().unwrap());

    let (status, json) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["deleted"], true);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, json) = send(&app, "GET", "/products/search?q=oak", None).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_endpoint_not_found() {
    let app = create_test_app();

    for uri in ["/products/nope", "/users/nope", "/categories/nope"] {
        let (status, json) = send(&app, "DELETE", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(json["error"].as_str().unwrap().contains("'nope'"));
    }
}

// == User Endpoint Tests ==

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = create_test_app();
    let first = create_user(&app, "Alice Smith", "alice@example.com").await;

    let body = json!({ "name": "Alice Other", "email": "ALICE@example.com" });
    let (status, json) = send(&app, "POST", "/users", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("not available"));

    let (_, users) = send(&app, "GET", "/users", None).await;
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], first["id"]);
    assert_eq!(users[0]["name"], "Alice Smith");
}

#[tokio::test]
async fn test_user_round_trip_embeds_products_without_owner() {
    let app = create_test_app();
    let category = create_category(&app, "Furniture").await;
    let user = create_user(&app, "Alice Smith", "alice@example.com").await;
    create_product(
        &app,
        json!({
            "name": "Oak table",
            "description": "Solid oak dining table",
            "value": "350.00",
            "categoryId": category["id"],
            "userId": user["id"],
        }),
    )
    .await;

    let uri = format!("/users/{}", user["id"].as_str().unwrap());
    let (status, json) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let products = json["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Oak table");
    assert_eq!(products[0]["category"]["name"], "Furniture");
    assert!(products[0].get("user").is_none());
}

#[tokio::test]
async fn test_user_list_sees_new_product() {
    let app = create_test_app();
    let category = create_category(&app, "Furniture").await;
    let user = create_user(&app, "Alice Smith", "alice@example.com").await;

    let (_, users) = send(&app, "GET", "/users", None).await;
    assert!(users[0]["products"].as_array().unwrap().is_empty());

    create_product(
        &app,
        json!({
            "name": "Oak table",
            "description": "Solid oak dining table",
            "value": "350.00",
            "categoryId": category["id"],
            "userId": user["id"],
        }),
    )
    .await;

    let (_, users) = send(&app, "GET", "/users", None).await;
    assert_eq!(users[0]["products"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let app = create_test_app();

    let body = json!({ "name": "Alice Smith", "email": "not-an-email" });
    let (status, _) = send(&app, "POST", "/users", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Operational Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    send(&app, "GET", "/products", None).await;
    send(&app, "GET", "/products", None).await;

    let (status, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cache"]["hits"], 1);
    assert_eq!(json["cache"]["misses"], 1);
    assert_eq!(json["hitRate"], 0.5);
    assert_eq!(json["staleness"]["cacheFailures"], 0);
    assert_eq!(json["staleness"]["indexFailures"], 0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/categories")
                .header("content-type", "application/json")
                .body(Body::from("not valid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
