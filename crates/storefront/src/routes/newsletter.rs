//! Newsletter subscription route handler.
//!
//! The footer form posts here. htmx swaps the form for the result
//! fragment; without JS the visitor is sent back where they came from and
//! the outcome shows as a toast.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header::REFERER},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::HxRequest;
use crate::services::newsletter::{SubscribeOutcome, subscribe as subscribe_email};
use crate::services::notifications::{Notification, Notifications};
use crate::state::AppState;

/// Newsletter subscription form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub email: String,
}

/// Result fragment (replaces the form via htmx).
#[derive(Template, WebTemplate)]
#[template(path = "partials/newsletter_result.html")]
pub struct SubscribeResultTemplate {
    pub success: bool,
    pub message: &'static str,
    pub email: String,
}

/// Same-site path to return to, from the `Referer` header.
///
/// Browsers read `//host` and `/\host` as another origin, so both fall back
/// to `/`.
pub(crate) fn back_path(headers: &HeaderMap, base_url: &str) -> String {
    headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|referer| {
            let base = base_url.trim_end_matches('/');
            referer
                .strip_prefix(base)
                .or_else(|| referer.starts_with('/').then_some(referer))
        })
        .filter(|path| {
            path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
        })
        .map_or_else(|| "/".to_string(), ToString::to_string)
}

/// Subscribe to the newsletter.
#[instrument(skip(state, session, headers, form))]
pub async fn subscribe(
    State(state): State<AppState>,
    session: Session,
    HxRequest(htmx): HxRequest,
    headers: HeaderMap,
    Form(form): Form<SubscribeForm>,
) -> Response {
    let notifications = Notifications::new(session.clone());
    let api = state.api(&session);
    let outcome = subscribe_email(&api, &notifications, &form.email).await;

    if htmx {
        // The fragment carries the message; drop the toast queued for the
        // next full page.
        if outcome.is_success() {
            notifications.clear().await;
        }
        return SubscribeResultTemplate {
            success: outcome.is_success(),
            message: outcome.message(),
            email: form.email.trim().to_string(),
        }
        .into_response();
    }

    if outcome == SubscribeOutcome::InvalidEmail {
        notifications
            .push(Notification::error("Inscription impossible", outcome.message()))
            .await;
    }
    Redirect::to(&back_path(&headers, &state.config().base_url)).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_referer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_back_path_same_site() {
        let headers = with_referer("https://food-en-k.com/menus?category=1");
        assert_eq!(
            back_path(&headers, "https://food-en-k.com"),
            "/menus?category=1"
        );
    }

    #[test]
    fn test_back_path_rejects_other_sites() {
        let headers = with_referer("https://evil.example/phish");
        assert_eq!(back_path(&headers, "https://food-en-k.com"), "/");
        let headers = with_referer("https://food-en-k.com//evil.example");
        assert_eq!(back_path(&headers, "https://food-en-k.com"), "/");
        assert_eq!(back_path(&HeaderMap::new(), "https://food-en-k.com"), "/");
    }

    #[test]
    fn test_back_path_rejects_backslash_host() {
        let headers = with_referer("https://food-en-k.com/\\evil.example/phish");
        assert_eq!(back_path(&headers, "https://food-en-k.com"), "/");
        let headers = with_referer("/\\evil.example");
        assert_eq!(back_path(&headers, "https://food-en-k.com"), "/");
        let headers = with_referer("/menus\\x");
        assert_eq!(back_path(&headers, "https://food-en-k.com"), "/menus\\x");
    }
}
