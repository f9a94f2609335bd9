//! Data shared by every full page: meta tags, header, alerts, toasts, footer.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use food_en_k_core::entity::{Alert, Product};
use food_en_k_core::format_french_phone;
use serde_json::Value;
use tower_sessions::Session;

use crate::cms::media::{self, Breakpoint, Layout};
use crate::services::alerts::AlertStore;
use crate::services::cart_store::CartStore;
use crate::services::footer::{Footer, fetch_footer};
use crate::services::menu::{product_badge, product_features};
use crate::services::notifications::{Notification, Notifications};
use crate::services::preferences::PreferenceStore;
use crate::services::seo::{self, PageMeta, SeoData};
use crate::state::AppState;

/// `true` when the request was sent by htmx (`HX-Request: true`).
#[derive(Debug, Clone, Copy)]
pub struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .headers
                .get("hx-request")
                .is_some_and(|v| v.as_bytes() == b"true"),
        ))
    }
}

/// Main navigation, `(label, href)`.
pub const NAV_LINKS: [(&str, &str); 5] = [
    ("Accueil", "/"),
    ("Menus", "/menus"),
    ("Emplacements", "/locations"),
    ("Événements", "/events"),
    ("Contact", "/contact"),
];

/// A header navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub current: bool,
}

/// Whether `href` is the section of `path`.
fn is_current(path: &str, href: &str) -> bool {
    if href == "/" {
        path == "/"
    } else {
        path.starts_with(href)
    }
}

/// Layout data for one page.
pub struct PageContext {
    pub nonce: String,
    pub path: String,
    pub nav: Vec<NavLink>,
    pub meta: PageMeta,
    /// JSON-LD blocks, already escaped for `<script>`.
    pub structured_data: Vec<String>,
    pub notifications: Vec<Notification>,
    pub alerts: Vec<Alert>,
    pub footer: Footer,
    pub cart_count: u32,
    pub cart_open: bool,
    pub theme: &'static str,
    pub gtm_id: Option<String>,
    pub phone_display: String,
    pub phone_href: String,
    pub email: String,
}

impl PageContext {
    /// Gather layout data. Notifications are drained here, so this must run
    /// after the handler's own CMS calls.
    pub async fn load(
        state: &AppState,
        session: &Session,
        nonce: String,
        path: &str,
        seo: &SeoData,
    ) -> Self {
        let config = state.config();
        let api = state.api(session);
        let cart = CartStore::new(session.clone());

        let footer = fetch_footer(&api, &config.contact, state.content()).await;
        let alerts = AlertStore::new(session.clone()).active().await;
        let preferences = PreferenceStore::new(session.clone()).load().await;
        let cart_count = cart.load().await.item_count();
        let cart_open = cart.is_open().await;
        let notifications = Notifications::new(session.clone()).take().await;

        Self {
            nonce,
            path: path.to_string(),
            nav: NAV_LINKS
                .iter()
                .map(|&(label, href)| NavLink {
                    label,
                    href,
                    current: is_current(path, href),
                })
                .collect(),
            meta: PageMeta::resolve(seo, &config.base_url, path),
            structured_data: Vec::new(),
            notifications,
            alerts,
            footer,
            cart_count,
            cart_open,
            theme: preferences.theme.as_str(),
            gtm_id: config.gtm_id.clone(),
            phone_display: format_french_phone(&config.contact.phone),
            phone_href: format!("tel:{}", config.contact.phone.replace(' ', "")),
            email: config.contact.email.clone(),
        }
    }

    #[must_use]
    pub const fn cart_is_empty(&self) -> bool {
        self.cart_count == 0
    }

    /// Attach a JSON-LD block.
    #[must_use]
    pub fn with_schema(mut self, schema: &Value) -> Self {
        self.structured_data.push(seo::to_script_json(schema));
        self
    }

    #[must_use]
    pub fn is_current(&self, href: &str) -> bool {
        is_current(&self.path, href)
    }
}

/// Image ready for an `<img>` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub src: String,
    pub alt: String,
    pub sizes: &'static str,
}

/// Product card data.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: String,
    pub image: Option<ImageView>,
    pub badge_label: Option<&'static str>,
    pub badge_color: &'static str,
    pub features: Vec<String>,
    pub available: bool,
    pub preparation_time: Option<u32>,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, cms_base: &str, layout: Layout) -> Self {
        let badge = product_badge(product);
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.unit_price().display(),
            image: product.primary_image().map(|m| {
                let props = media::image_props(
                    cms_base,
                    m,
                    &product.name,
                    layout,
                    Breakpoint::for_width(layout.width()),
                );
                ImageView {
                    src: props.src,
                    alt: props.alt,
                    sizes: props.sizes,
                }
            }),
            badge_label: badge.map(|b| b.label),
            badge_color: badge.map_or("info", |b| b.color.as_str()),
            features: product_features(product),
            available: !product.is_unavailable(),
            preparation_time: product.preparation_time,
        }
    }
}
