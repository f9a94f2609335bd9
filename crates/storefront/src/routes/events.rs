//! Events page: catering offers and covered departments.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use food_en_k_core::entity::{Coverage, HeroContent};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::PageContext;
use crate::filters;
use crate::middleware::CspNonce;
use crate::services::events::{fetch_events_content, guest_range, service_icon};
use crate::services::formatting::format_price;
use crate::services::hero::{HeroPage, fetch_heroes};
use crate::services::seo::SeoData;
use crate::state::AppState;

/// An offer card.
pub struct ServiceView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub features: Vec<String>,
    pub guests: String,
    pub price: Option<String>,
    pub duration: Option<u32>,
}

#[derive(Template, WebTemplate)]
#[template(path = "events.html")]
pub struct EventsTemplate {
    pub ctx: PageContext,
    pub hero: HeroContent,
    pub services: Vec<ServiceView>,
    pub coverage: Vec<Coverage>,
}

/// Display the events page.
#[instrument(skip(state, session, nonce))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let api = state.api(&session);
    let (heroes, content) = tokio::join!(
        fetch_heroes(&api, &state.config().contact.phone),
        fetch_events_content(&api),
    );

    let services = content
        .services
        .iter()
        .map(|s| ServiceView {
            id: s.meta.document_id.clone(),
            title: s.title.clone(),
            description: s.description.clone(),
            icon: service_icon(s).to_string(),
            features: s.features.clone(),
            guests: guest_range(s),
            price: s.price.map(format_price),
            duration: s.duration,
        })
        .collect();

    let seo_data = SeoData::page("events", SeoData::default());
    let ctx = PageContext::load(&state, &session, nonce, "/events", &seo_data).await;

    EventsTemplate {
        ctx,
        hero: heroes.page(HeroPage::Event),
        services,
        coverage: content.coverage,
    }
}
