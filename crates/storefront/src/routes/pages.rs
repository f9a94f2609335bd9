//! Static content page route handlers.
//!
//! Serves the markdown pages (legal notice, privacy policy, terms of sale).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::NaiveDate;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::PageContext;
use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::services::seo::{OgType, SeoData};
use crate::state::AppState;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub ctx: PageContext,
    pub title: String,
    pub description: String,
    pub updated_at: Option<NaiveDate>,
    pub content_html: String,
}

/// Display a content page by slug.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let page = state.content().require_page(&slug)?.clone();

    let mut seo_data = SeoData::titled(page.meta.title.clone());
    if let Some(description) = &page.meta.description {
        seo_data = seo_data.with_description(description.clone());
    }
    seo_data.og_type = OgType::Article;

    let path = format!("/pages/{}", page.slug);
    let ctx = PageContext::load(&state, &session, nonce, &path, &seo_data).await;

    Ok(ContentPageTemplate {
        ctx,
        title: page.meta.title,
        description: page.meta.description.unwrap_or_default(),
        updated_at: page.meta.updated_at,
        content_html: page.content_html,
    })
}
