//! Contact, newsletter, preferences and alert dismissal.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use food_en_k_integration_tests::{CmsMode, TestApp};

const MESSAGE: &str = "Bonjour, faites-vous des burgers sans gluten le vendredi midi ?";

#[tokio::test]
async fn test_contact_form_renders() {
    let mut app = TestApp::new().await;
    let response = app.get("/contact").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("name=\"request_type\""));
    assert!(response.body.contains("value=\"event\""));
}

#[tokio::test]
async fn test_contact_missing_fields() {
    let mut app = TestApp::new().await;
    let response = app
        .post_form("/contact", &[("name", ""), ("email", ""), ("request_type", "info")])
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Veuillez remplir tous les champs obligatoires"));
    assert!(response.body.contains("aria-invalid=\"true\""));
    assert!(response.body.contains("id=\"name-error\""));
    assert!(app.cms.posts().is_empty());
}

#[tokio::test]
async fn test_contact_submission_is_stored() {
    let mut app = TestApp::new().await;
    let response = app
        .post_form(
            "/contact",
            &[
                ("name", "Anne Le Gall"),
                ("email", "anne@example.fr"),
                ("request_type", "info"),
                ("message", MESSAGE),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/contact"));

    let posts = app.cms.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "contact-requests");
    assert_eq!(posts[0].1["email"], "anne@example.fr");

    let page = app.get("/contact").await;
    assert!(page.body.contains("Message envoyé"));
}

#[tokio::test]
async fn test_contact_keeps_input_when_cms_fails() {
    let mut app = TestApp::with_cms(CmsMode::Failing).await;
    let response = app
        .post_form(
            "/contact",
            &[
                ("name", "Anne Le Gall"),
                ("email", "anne@example.fr"),
                ("request_type", "info"),
                ("message", MESSAGE),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("value=\"Anne Le Gall\""));
    assert!(response.body.contains("Une erreur est survenue"));
}

#[tokio::test]
async fn test_newsletter_with_htmx() {
    let mut app = TestApp::new().await;
    let response = app
        .htmx_post("/newsletter", &[("email", "anne@example.fr")])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("newsletter-result--success"));
    assert_eq!(app.cms.posts()[0].0, "newsletter-subscriptions");
}

#[tokio::test]
async fn test_newsletter_invalid_email() {
    let mut app = TestApp::new().await;
    let response = app.htmx_post("/newsletter", &[("email", "anne@")]).await;

    assert!(response.body.contains("newsletter-result--error"));
    assert!(response.body.contains("Veuillez saisir une adresse email valide"));
    assert!(app.cms.posts().is_empty());
}

#[tokio::test]
async fn test_newsletter_is_rate_limited() {
    let mut app = TestApp::new().await;
    for _ in 0..5 {
        let response = app.htmx_post("/newsletter", &[("email", "anne@")]).await;
        assert_eq!(response.status, StatusCode::OK);
    }
    let limited = app.htmx_post("/newsletter", &[("email", "anne@")]).await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_preferences_round_trip() {
    let mut app = TestApp::new().await;
    assert!(app.get("/").await.body.contains("data-theme=\"auto\""));

    let response = app
        .post_form("/preferences", &[("theme", "dark"), ("language", "fr")])
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/preferences"));

    let page = app.get("/preferences").await;
    assert!(page.body.contains("data-theme=\"dark\""));
    assert!(page.body.contains("Préférences enregistrées"));
}

#[tokio::test]
async fn test_dismiss_alert() {
    let mut app = TestApp::new().await;
    let alert = "alert-location-change-june-2025";
    assert!(app.get("/").await.body.contains(alert));

    let response = app
        .post_form("/alerts/location-change-june-2025/dismiss", &[])
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let home = app.get("/").await;
    assert!(!home.body.contains(alert));
    assert!(home.body.contains("alert-private-events-june-2025"));
}
