//! Locations page, with an optional nearby search, and one page per spot.
//!
//! The visitor's position arrives as `?lat=..&lon=..`, filled in by the
//! "Autour de moi" button or typed by hand.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use food_en_k_core::entity::Location;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::{ImageView, PageContext};
use crate::cms::media::{self, Breakpoint, Layout};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CspNonce;
use crate::services::locations::{
    DEFAULT_MAX_DISTANCE_KM, fetch_location, fetch_locations, format_address,
    format_opening_hours, nearby,
};
use crate::services::seo::SeoData;
use crate::state::AppState;

/// Visitor position.
#[derive(Debug, Default, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl NearbyQuery {
    /// Both coordinates, when in range.
    fn position(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon))
                if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) =>
            {
                Some((lat, lon))
            }
            _ => None,
        }
    }
}

/// A location card.
pub struct LocationView {
    pub href: String,
    pub name: String,
    pub address: String,
    pub hours: String,
    pub day: Option<String>,
    pub distance: Option<String>,
    pub maps_href: String,
    pub image: Option<ImageView>,
}

impl LocationView {
    fn new(location: Location, distance: Option<String>, cms_base: &str) -> Self {
        Self {
            href: format!("/locations/{}", location.meta.document_id),
            address: format_address(&location),
            hours: format_opening_hours(&location),
            day: location.day.clone().filter(|d| !d.is_empty()),
            distance,
            maps_href: format!(
                "https://www.google.com/maps/search/?api=1&query={},{}",
                location.latitude, location.longitude
            ),
            image: location.image.as_ref().map(|m| {
                let props = media::image_props(
                    cms_base,
                    m,
                    &location.name,
                    Layout::Card,
                    Breakpoint::Small,
                );
                ImageView {
                    src: props.src,
                    alt: props.alt,
                    sizes: props.sizes,
                }
            }),
            name: location.name,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "locations.html")]
pub struct LocationsTemplate {
    pub ctx: PageContext,
    pub locations: Vec<LocationView>,
    pub searched: bool,
    pub max_distance_km: f64,
}

#[derive(Template, WebTemplate)]
#[template(path = "location.html")]
pub struct LocationTemplate {
    pub ctx: PageContext,
    pub location: LocationView,
}

/// Display locations, closest first when a position is given.
#[instrument(skip(state, session, nonce))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
    Query(query): Query<NearbyQuery>,
) -> impl IntoResponse {
    let api = state.api(&session);
    let cms_base = state.cms().base_url().to_string();
    let all = fetch_locations(&api).await;

    let with_distance: Vec<_> = match query.position() {
        Some((lat, lon)) => nearby(&all, lat, lon, DEFAULT_MAX_DISTANCE_KM)
            .into_iter()
            .map(|l| {
                let label = l.distance_label();
                (l.location, Some(label))
            })
            .collect(),
        None => all.into_iter().map(|l| (l, None)).collect(),
    };

    let locations = with_distance
        .into_iter()
        .map(|(location, distance)| LocationView::new(location, distance, &cms_base))
        .collect();

    let seo_data = SeoData::page("locations", SeoData::default());
    let ctx = PageContext::load(&state, &session, nonce, "/locations", &seo_data).await;

    LocationsTemplate {
        ctx,
        locations,
        searched: query.position().is_some(),
        max_distance_km: DEFAULT_MAX_DISTANCE_KM,
    }
}

/// Display one location by document id.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if the CMS has no such location.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let api = state.api(&session);
    let location = fetch_location(&api, &id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("location {id}")))?;

    let seo_data = SeoData::titled(location.name.clone());
    let path = format!("/locations/{id}");
    let location = LocationView::new(location, None, state.cms().base_url());
    let ctx = PageContext::load(&state, &session, nonce, &path, &seo_data).await;

    Ok(LocationTemplate { ctx, location })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_requires_both_coordinates() {
        let query = NearbyQuery {
            lat: Some(48.5),
            lon: None,
        };
        assert!(query.position().is_none());
    }

    #[test]
    fn test_position_rejects_out_of_range() {
        let query = NearbyQuery {
            lat: Some(120.0),
            lon: Some(-2.7),
        };
        assert!(query.position().is_none());

        let query = NearbyQuery {
            lat: Some(48.51),
            lon: Some(-2.76),
        };
        assert_eq!(query.position(), Some((48.51, -2.76)));
    }
}
