//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page
//! GET  /health                    - Liveness
//! GET  /health/ready              - Readiness (CMS, session database)
//!
//! # Content
//! GET  /menus                     - Menu with filters (query string)
//! GET  /menus/products/{slug}     - Product detail
//! GET  /events                    - Event catering offers
//! GET  /locations                 - Locations, ?lat=&lon= for nearby
//! GET  /locations/{id}            - One location by document id
//! GET  /pages/{slug}              - Markdown pages (legal notice, terms)
//!
//! # Forms (rate limited)
//! GET  /contact                   - Contact form
//! POST /contact                   - Submit contact form
//! POST /newsletter                - Subscribe (fragment for HTMX)
//!
//! # Cart (HTMX fragments, redirects without JS)
//! GET  /cart                      - Cart page and order form
//! GET  /cart/count                - Cart count badge (fragment)
//! POST /cart/add                  - Add product (triggers cart-updated)
//! POST /cart/update               - Set quantity (returns cart_items fragment)
//! POST /cart/remove               - Remove line
//! POST /cart/clear                - Empty the cart
//! POST /cart/note                 - Set a line note
//! POST /cart/toggle               - Open/close the drawer
//! POST /cart/order                - Copy, SMS or call order action
//!
//! # Visitor state
//! POST /alerts/{id}/dismiss       - Hide an alert
//! POST /notifications/{id}/dismiss - Drop a toast
//! GET  /preferences               - Preferences form
//! POST /preferences               - Save preferences
//! ```

pub mod alerts;
pub mod cart;
pub mod contact;
pub mod events;
pub mod health;
pub mod home;
pub mod layout;
pub mod locations;
pub mod menus;
pub mod newsletter;
pub mod pages;
pub mod preferences;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{cart_rate_limiter, form_rate_limiter};
use crate::state::AppState;

/// Create the menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menus::index))
        .route("/products/{slug}", get(menus::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    let mutations = Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/note", post(cart::note))
        .route("/toggle", post(cart::toggle))
        .route("/order", post(cart::order))
        .route_layer(cart_rate_limiter());

    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .merge(mutations)
}

/// Create the form routes router (contact, newsletter).
pub fn form_routes() -> Router<AppState> {
    let posts = Router::new()
        .route("/contact", post(contact::submit))
        .route("/newsletter", post(newsletter::subscribe))
        .route_layer(form_rate_limiter());

    Router::new()
        .route("/contact", get(contact::show))
        .merge(posts)
}

/// Create the visitor state routes router.
pub fn visitor_routes() -> Router<AppState> {
    let posts = Router::new()
        .route("/alerts/{id}/dismiss", post(alerts::dismiss_alert))
        .route(
            "/notifications/{id}/dismiss",
            post(alerts::dismiss_notification),
        )
        .route("/preferences", post(preferences::update))
        .route_layer(cart_rate_limiter());

    Router::new()
        .route("/preferences", get(preferences::show))
        .merge(posts)
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/events", get(events::index))
        .route("/locations", get(locations::index))
        .route("/locations/{id}", get(locations::show))
        .route("/pages/{slug}", get(pages::show))
        .nest("/menus", menu_routes())
        .nest("/cart", cart_routes())
        .merge(form_routes())
        .merge(visitor_routes())
}
