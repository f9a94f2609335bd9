//! Full page rendering, response headers and CMS degradation.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use food_en_k_core::entity::Location;
use food_en_k_integration_tests::{CmsMode, TestApp};
use food_en_k_storefront::cms::Query;
use food_en_k_storefront::services::locations::fetch_location;

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_is_always_ok() {
    let mut app = TestApp::with_cms(CmsMode::Failing).await;
    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_readiness_follows_cms() {
    let mut healthy = TestApp::new().await;
    assert_eq!(healthy.get("/health/ready").await.status, StatusCode::OK);

    let mut failing = TestApp::with_cms(CmsMode::Failing).await;
    assert_eq!(
        failing.get("/health/ready").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_home_page_renders_layout() {
    let mut app = TestApp::new().await;
    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<html lang=\"fr\""));
    assert!(response.body.contains("aria-current=\"page\""));
    assert!(response.body.contains("Ferme du Bois Joli"));
    assert!(response.body.contains("application/ld+json"));
    assert!(response.body.contains("/pages/mentions-legales"));
}

#[tokio::test]
async fn test_home_page_survives_failing_cms() {
    let mut app = TestApp::with_cms(CmsMode::Failing).await;
    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Food en K"));
}

#[tokio::test]
async fn test_menu_lists_products() {
    let mut app = TestApp::new().await;
    let response = app.get("/menus").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Le Breizh"));
    assert!(response.body.contains("Le Veggie"));
    assert!(response.body.contains("/menus/products/le-breizh"));
}

#[tokio::test]
async fn test_menu_search_filters_products() {
    let mut app = TestApp::new().await;
    let response = app.get("/menus?q=veggie").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Le Veggie"));
    assert!(!response.body.contains("/menus/products/le-breizh"));
}

#[tokio::test]
async fn test_menu_ignores_malformed_filters() {
    let mut app = TestApp::new().await;
    let response = app.get("/menus?max_price=cheap&page=abc&category=x").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_product_page() {
    let mut app = TestApp::new().await;
    let response = app.get("/menus/products/le-breizh").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Le Breizh"));
    assert!(response.body.contains("Cheddar"));
    assert!(response.body.contains("12,50"));
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let mut app = TestApp::new().await;
    let response = app.get("/menus/products/nope").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_events_page() {
    let mut app = TestApp::new().await;
    let response = app.get("/events").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_locations_nearby_search() {
    let mut app = TestApp::new().await;

    let all = app.get("/locations").await;
    assert_eq!(all.status, StatusCode::OK);
    assert!(all.body.contains("B-Com"));
    assert!(all.body.contains("Port de Brest"));

    // Rennes: B-Com is close, Brest is not
    let nearby = app.get("/locations?lat=48.1173&lon=-1.6778").await;
    assert_eq!(nearby.status, StatusCode::OK);
    assert!(nearby.body.contains("B-Com"));
    assert!(!nearby.body.contains("Port de Brest"));
}

#[tokio::test]
async fn test_location_page() {
    let mut app = TestApp::new().await;

    let list = app.get("/locations").await;
    assert!(list.body.contains("href=\"/locations/loc-bcom\""));

    let response = app.get("/locations/loc-bcom").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("B-Com"));
    assert!(response.body.contains("1219 Avenue des Champs Blancs, 35510"));
    assert!(response.body.contains("11:30 - 14:00"));

    let missing = app.get("/locations/loc-nowhere").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_fetch_location_by_document_id() {
    let app = TestApp::new().await;
    let api = app.content_api();

    let location = fetch_location(&api, "loc-brest").await.unwrap();
    assert_eq!(location.name, "Port de Brest");
    assert_eq!(location.postal_code, "29200");

    assert!(fetch_location(&api, "loc-nowhere").await.is_none());
    let response = api
        .fetch_entity::<Location>("locations", "loc-nowhere", &Query::new())
        .await;
    assert!(response.error.is_some());
}

#[tokio::test]
async fn test_fetch_location_when_cms_fails() {
    let app = TestApp::with_cms(CmsMode::Failing).await;
    assert!(fetch_location(&app.content_api(), "loc-bcom").await.is_none());
}

#[tokio::test]
async fn test_markdown_pages() {
    let mut app = TestApp::new().await;

    let page = app.get("/pages/mentions-legales").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Mentions légales"));
    assert!(page.body.contains("contact@food-en-k.com"));
    assert!(!page.body.contains("{{ contact_email }}"));

    let missing = app.get("/pages/nope").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Headers
// =============================================================================

#[tokio::test]
async fn test_security_headers_and_nonce() {
    let mut app = TestApp::new().await;
    let response = app.get("/").await;

    let csp = response.header("content-security-policy").unwrap();
    let nonce = csp
        .split("'nonce-")
        .nth(1)
        .and_then(|rest| rest.split('\'').next())
        .unwrap();
    assert!(!nonce.is_empty());
    assert!(response.body.contains(&format!("nonce=\"{nonce}\"")));
    assert!(csp.contains("form-action 'self' sms: tel:"));

    assert_eq!(response.header("x-frame-options"), Some("DENY"));
    assert!(response.header("x-request-id").is_some());
}

#[tokio::test]
async fn test_request_ids_are_unique() {
    let mut app = TestApp::new().await;
    let first = app.get("/health").await;
    let second = app.get("/health").await;

    assert!(first.header("x-request-id").is_some());
    assert_ne!(first.header("x-request-id"), second.header("x-request-id"));
}
