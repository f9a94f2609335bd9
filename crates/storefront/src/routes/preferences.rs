//! Visitor preferences page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::PageContext;
use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::services::notifications::{Notification, Notifications};
use crate::services::preferences::{PreferenceStore, Preferences, PreferencesUpdate, Theme};
use crate::services::seo::SeoData;
use crate::state::AppState;

/// A theme radio button.
pub struct ThemeChoice {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

const fn theme_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "Clair",
        Theme::Dark => "Sombre",
        Theme::Auto => "Automatique",
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "preferences.html")]
pub struct PreferencesTemplate {
    pub ctx: PageContext,
    pub preferences: Preferences,
    pub themes: Vec<ThemeChoice>,
}

/// Display the preferences form.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let preferences = PreferenceStore::new(session.clone()).load().await;
    let seo_data = SeoData::titled("Préférences");
    let ctx = PageContext::load(&state, &session, nonce, "/preferences", &seo_data).await;

    PreferencesTemplate {
        themes: Theme::ALL
            .into_iter()
            .map(|theme| ThemeChoice {
                value: theme.as_str(),
                label: theme_label(theme),
                checked: theme == preferences.theme,
            })
            .collect(),
        ctx,
        preferences,
    }
}

/// Save preferences and return to the form.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<PreferencesUpdate>) -> Result<Response> {
    let preferences = PreferenceStore::new(session.clone()).update(&form).await?;
    tracing::debug!(theme = preferences.theme.as_str(), "Preferences saved");

    Notifications::new(session)
        .push(Notification::success(
            "Préférences enregistrées",
            "Vos préférences ont été mises à jour.",
        ))
        .await;
    Ok(Redirect::to("/preferences").into_response())
}
