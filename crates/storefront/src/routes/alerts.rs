//! Dismissing site alerts and toasts.
//!
//! Both answer htmx with an empty body (the element swaps itself out) and
//! plain form posts with a redirect back.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::HxRequest;
use super::newsletter::back_path;
use crate::error::Result;
use crate::services::alerts::AlertStore;
use crate::services::notifications::Notifications;
use crate::state::AppState;

fn dismissed_response(state: &AppState, htmx: bool, headers: &HeaderMap) -> Response {
    if htmx {
        StatusCode::OK.into_response()
    } else {
        Redirect::to(&back_path(headers, &state.config().base_url)).into_response()
    }
}

/// Hide an alert for the rest of the session.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
#[instrument(skip(state, session, headers))]
pub async fn dismiss_alert(
    State(state): State<AppState>,
    session: Session,
    HxRequest(htmx): HxRequest,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response> {
    if !AlertStore::new(session).dismiss(&id).await? {
        tracing::debug!("Alert is not dismissible");
    }
    Ok(dismissed_response(&state, htmx, &headers))
}

/// Drop a queued notification.
#[instrument(skip(state, session, headers))]
pub async fn dismiss_notification(
    State(state): State<AppState>,
    session: Session,
    HxRequest(htmx): HxRequest,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    Notifications::new(session).remove(&id).await;
    dismissed_response(&state, htmx, &headers)
}
