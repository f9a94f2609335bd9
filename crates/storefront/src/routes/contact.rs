//! Contact form route handlers.
//!
//! The form posts back to itself. A refused form is rendered again with
//! the visitor's input and per-field errors; an accepted one redirects so a
//! reload does not send it twice.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use food_en_k_core::entity::HeroContent;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::PageContext;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::CspNonce;
use crate::services::contact::{self, Budget, ContactForm, EventType, RequestType};
use crate::services::hero::{HeroPage, fetch_heroes};
use crate::services::notifications::Notifications;
use crate::services::seo::SeoData;
use crate::services::validation::ValidationErrors;
use crate::state::AppState;

/// An `<option>` of a select.
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn options<T: Copy>(
    all: &[T],
    current: &str,
    value: fn(T) -> &'static str,
    label: fn(T) -> &'static str,
) -> Vec<SelectOption> {
    all.iter()
        .map(|&item| SelectOption {
            value: value(item),
            label: label(item),
            selected: value(item) == current,
        })
        .collect()
}

#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub ctx: PageContext,
    pub hero: HeroContent,
    pub form: ContactForm,
    pub errors: ValidationErrors,
    pub message: Option<String>,
    pub request_types: Vec<SelectOption>,
    pub event_types: Vec<SelectOption>,
    pub budgets: Vec<SelectOption>,
    pub is_event: bool,
    pub has_allergies: bool,
}

async fn render(
    state: &AppState,
    session: &Session,
    nonce: String,
    form: ContactForm,
    errors: ValidationErrors,
    message: Option<String>,
) -> ContactTemplate {
    let api = state.api(session);
    let heroes = fetch_heroes(&api, &state.config().contact.phone).await;
    let seo_data = SeoData::page("contact", SeoData::default());
    let ctx = PageContext::load(state, session, nonce, "/contact", &seo_data).await;

    ContactTemplate {
        ctx,
        hero: heroes.page(HeroPage::Contact),
        request_types: options(
            &RequestType::ALL,
            &form.request_type,
            RequestType::as_str,
            RequestType::label,
        ),
        event_types: options(
            &EventType::ALL,
            &form.event_type,
            EventType::as_str,
            EventType::label,
        ),
        budgets: options(&Budget::ALL, &form.budget, Budget::as_str, Budget::label),
        is_event: form.request_type == RequestType::Event.as_str(),
        has_allergies: form.has_allergies.is_some(),
        form,
        errors,
        message,
    }
}

/// Display the contact form.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    render(
        &state,
        &session,
        nonce,
        ContactForm::default(),
        ValidationErrors::default(),
        None,
    )
    .await
}

/// Validate and store a contact request.
#[instrument(skip(state, session, nonce, form), fields(request_type = %form.request_type))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
    Form(form): Form<ContactForm>,
) -> Response {
    let today = chrono::Local::now().date_naive();

    let request = match form.validate(today) {
        Ok(request) => request,
        Err(rejection) => {
            tracing::debug!(fields = rejection.errors.len(), "Contact form refused");
            let page = render(
                &state,
                &session,
                nonce,
                form,
                rejection.errors,
                Some(rejection.message),
            )
            .await;
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    add_breadcrumb(
        "contact",
        "Contact form submitted",
        Some(&[("request_type", request.request_type.as_str())]),
    );

    let api = state.api(&session);
    let notifications = Notifications::new(session.clone());
    if contact::submit(&api, &notifications, &request).await {
        tracing::info!("Contact request stored");
        Redirect::to("/contact").into_response()
    } else {
        render(
            &state,
            &session,
            nonce,
            form,
            ValidationErrors::default(),
            Some("Une erreur est survenue lors de l'envoi. Veuillez réessayer.".to_string()),
        )
        .await
        .into_response()
    }
}
