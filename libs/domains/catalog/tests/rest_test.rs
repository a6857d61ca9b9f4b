//! JSON API handler tests

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::Value;

async fn json(response: axum::http::Response<axum::body::Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_list_products_upper_cases_names() {
    let app = TestApp::new().await;
    app.products.insert(product("Apple iPod", 46.89, electronico()));
    app.products.insert(product("Bianchi Bicicleta", 70.89, deporte()));

    let response = app.get("/api/productos").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["nombre"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["APPLE IPOD", "BIANCHI BICICLETA"]);

    // Stored names are left untouched
    assert_eq!(app.products.all()[0].name, "Apple iPod");
}

#[tokio::test]
async fn test_list_products_empty_catalog() {
    let app = TestApp::new().await;

    let body = json(app.get("/api/productos").await).await;
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_get_product_by_id() {
    let app = TestApp::new().await;
    let ipod = product("Apple iPod", 46.89, electronico());
    app.products.insert(ipod.clone());

    let response = app.get(&format!("/api/productos/{}", ipod.id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["_id"], ipod.id.as_str());
    assert_eq!(body["nombre"], "Apple iPod");
    assert_eq!(body["precio"], 46.89);
    assert_eq!(body["categoria"]["nombre"], "Electrónico");
    assert!(body.get("foto").is_none());
}

#[tokio::test]
async fn test_get_unknown_product_is_empty_ok() {
    let app = TestApp::new().await;

    let response = app.get("/api/productos/doesnotexist").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_store_failure_uses_error_envelope() {
    let app = TestApp::new().await;
    app.products.fail(true);

    let response = app.get("/api/productos").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json(response).await;
    assert_eq!(body["error"], "DATABASE_ERROR");
    assert!(!body["message"].as_str().unwrap().contains("injected"));
}
