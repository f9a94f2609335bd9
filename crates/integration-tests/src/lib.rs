//! Integration tests for the Food en K storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p food-en-k-integration-tests
//! ```
//!
//! No external service is needed: [`FakeCms`] serves Strapi-shaped JSON
//! on an ephemeral port, and [`TestApp`] drives the storefront router in
//! process with `tower::ServiceExt::oneshot` and a memory session store.
//!
//! # Test Categories
//!
//! - `pages` - Full page rendering, headers, CMS degradation
//! - `cart` - Cart mutations, HTMX fragments and order actions
//! - `forms` - Contact, newsletter, preferences, alert dismissal

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path as UrlPath, RawQuery, State};
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use food_en_k_storefront::cms::ContentApi;
use food_en_k_storefront::config::test_config;
use food_en_k_storefront::content::{ContentStore, Placeholders};
use food_en_k_storefront::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};
use url::Url;

/// Client address sent in `x-forwarded-for`, used as the rate limit key.
pub const CLIENT_IP: &str = "203.0.113.7";

// =============================================================================
// Fake CMS
// =============================================================================

/// How the fake CMS answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmsMode {
    /// Serve the fixtures.
    Healthy,
    /// Answer every request with HTTP 500.
    Failing,
}

#[derive(Clone)]
struct CmsState {
    mode: CmsMode,
    posts: Arc<Mutex<Vec<(String, Value)>>>,
}

/// A Strapi stand-in listening on `127.0.0.1`.
pub struct FakeCms {
    pub url: Url,
    posts: Arc<Mutex<Vec<(String, Value)>>>,
}

impl FakeCms {
    /// Start a fake CMS on an ephemeral port.
    pub async fn start(mode: CmsMode) -> Self {
        let posts = Arc::new(Mutex::new(Vec::new()));
        let state = CmsState {
            mode,
            posts: Arc::clone(&posts),
        };

        let router = Router::new()
            .route("/_health", get(health))
            .route("/api/{collection}", get(collection).post(create))
            .route("/api/{collection}/{id}", get(entry))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            url: Url::parse(&format!("http://{addr}")).unwrap(),
            posts,
        }
    }

    /// Entries created so far, as `(collection, data)`.
    #[must_use]
    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().unwrap().clone()
    }
}

async fn health(State(state): State<CmsState>) -> Response {
    match state.mode {
        CmsMode::Healthy => Json(json!({ "status": "ok" })).into_response(),
        CmsMode::Failing => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn collection(
    State(state): State<CmsState>,
    UrlPath(collection): UrlPath<String>,
    RawQuery(query): RawQuery,
) -> Response {
    if state.mode == CmsMode::Failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }

    let query = query.unwrap_or_default();
    let data = match collection.as_str() {
        "products" => filter_by_slug(products(), &query),
        "categories" => categories(),
        "locations" => locations(),
        "local-partners" => partners(),
        "menus" | "event-services" | "coverage-areas" | "hero-contents" | "infos" => {
            Vec::new()
        }
        // Single types fall back to built-in copy
        _ => return StatusCode::NOT_FOUND.into_response(),
    };

    let total = data.len();
    Json(json!({
        "data": data,
        "meta": { "pagination": { "page": 1, "pageSize": 25, "pageCount": 1, "total": total } }
    }))
    .into_response()
}

async fn entry(
    State(state): State<CmsState>,
    UrlPath((collection, id)): UrlPath<(String, String)>,
) -> Response {
    if state.mode == CmsMode::Failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }

    let items = match collection.as_str() {
        "products" => products(),
        "categories" => categories(),
        "locations" => locations(),
        "local-partners" => partners(),
        _ => Vec::new(),
    };
    match items.into_iter().find(|item| item["documentId"] == id) {
        Some(item) => Json(json!({ "data": item, "meta": {} })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "data": null,
                "error": { "status": 404, "name": "NotFoundError", "message": "Not Found" }
            })),
        )
            .into_response(),
    }
}

async fn create(
    State(state): State<CmsState>,
    UrlPath(collection): UrlPath<String>,
    Json(body): Json<Value>,
) -> Response {
    if state.mode == CmsMode::Failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }

    let data = body.get("data").cloned().unwrap_or(Value::Null);
    state
        .posts
        .lock()
        .unwrap()
        .push((collection, data.clone()));

    let mut entry = data;
    if let Value::Object(map) = &mut entry {
        map.insert("id".to_string(), json!(1));
        map.insert("documentId".to_string(), json!("created-1"));
    }
    Json(json!({ "data": entry })).into_response()
}

/// Apply `filters[slug][$eq]=...` when present.
fn filter_by_slug(items: Vec<Value>, query: &str) -> Vec<Value> {
    let Some(slug) = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("filters[slug][$eq]="))
    else {
        return items;
    };
    items
        .into_iter()
        .filter(|item| item["slug"] == slug)
        .collect()
}

fn products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "documentId": "prod-breizh",
            "publishedAt": "2025-06-01T10:00:00.000Z",
            "createdAt": "2025-06-01T10:00:00.000Z",
            "name": "Le Breizh",
            "description": "Steak haché, galette de sarrasin, andouille",
            "price": 12.5,
            "available": true,
            "slug": "le-breizh",
            "isPopular": true,
            "images": [],
            "ingredients": [
                { "id": 1, "name": "Andouille", "isAllergen": false },
                { "id": 2, "name": "Cheddar", "isAllergen": true }
            ],
            "category": { "id": 1, "name": "Burgers", "slug": "burgers" }
        }),
        json!({
            "id": 2,
            "documentId": "prod-veggie",
            "publishedAt": "2025-06-01T10:00:00.000Z",
            "createdAt": "2025-05-20T10:00:00.000Z",
            "name": "Le Veggie",
            "description": "Galette de légumes, chèvre",
            "price": 11,
            "available": true,
            "slug": "le-veggie",
            "isVegetarian": true,
            "images": [],
            "ingredients": [],
            "category": { "id": 1, "name": "Burgers", "slug": "burgers" }
        }),
        json!({
            "id": 3,
            "documentId": "prod-frites",
            "publishedAt": "2025-06-01T10:00:00.000Z",
            "createdAt": "2025-05-01T10:00:00.000Z",
            "name": "Frites maison",
            "price": 3.5,
            "available": false,
            "slug": "frites-maison",
            "images": [],
            "ingredients": [],
            "category": { "id": 2, "name": "Accompagnements", "slug": "accompagnements" }
        }),
    ]
}

fn categories() -> Vec<Value> {
    vec![
        json!({ "id": 1, "documentId": "cat-burgers", "name": "Burgers", "slug": "burgers" }),
        json!({ "id": 2, "documentId": "cat-sides", "name": "Accompagnements", "slug": "accompagnements" }),
    ]
}

fn locations() -> Vec<Value> {
    vec![
        json!({
            "id": 4,
            "documentId": "loc-bcom",
            "name": "B-Com",
            "address": "1219 Avenue des Champs Blancs",
            "city": "Cesson-Sévigné",
            "postal_code": "35510",
            "latitude": 48.1236,
            "longitude": -1.6262,
            "start_time": "11:30:00.000",
            "end_time": "14:00:00.000",
            "day": "Vendredi",
            "isActive": true
        }),
        json!({
            "id": 5,
            "documentId": "loc-brest",
            "name": "Port de Brest",
            "address": "Quai Malbert",
            "city": "Brest",
            "postal_code": "29200",
            "latitude": 48.3813,
            "longitude": -4.4947,
            "isActive": true
        }),
    ]
}

fn partners() -> Vec<Value> {
    vec![json!({
        "id": 7,
        "documentId": "partner-ferme",
        "name": "Ferme du Bois Joli",
        "description": "Viande bovine élevée en plein air",
        "address": "Betton",
        "specialty": "Boucherie",
        "partnerSince": "2021",
        "isExclusive": true
    })]
}

// =============================================================================
// Storefront under test
// =============================================================================

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// `Location` header, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// A response header as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The storefront router with a fake CMS and a cookie jar of one session.
pub struct TestApp {
    pub cms: FakeCms,
    state: AppState,
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Storefront over a healthy fake CMS.
    pub async fn new() -> Self {
        Self::with_cms(CmsMode::Healthy).await
    }

    /// Storefront over a fake CMS in `mode`.
    pub async fn with_cms(mode: CmsMode) -> Self {
        let cms = FakeCms::start(mode).await;
        let config = test_config(cms.url.clone());

        let content_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/content");
        let content =
            ContentStore::load(&content_dir, &Placeholders::from_config(&config)).unwrap();

        let state = AppState::new(config, content, None);
        let router = food_en_k_storefront::app(state.clone(), MemoryStore::default());

        Self {
            cms,
            state,
            router,
            cookie: None,
        }
    }

    /// Content API over a fresh session, for calling services directly.
    #[must_use]
    pub fn content_api(&self) -> ContentApi {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        self.state.api(&session)
    }

    async fn send(&mut self, mut builder: axum::http::request::Builder, body: Body) -> TestResponse {
        builder = builder.header("x-forwarded-for", CLIENT_IP);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.trim().to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// `GET path`.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Request::builder().uri(path), Body::empty()).await
    }

    /// `GET path` as htmx.
    pub async fn htmx_get(&mut self, path: &str) -> TestResponse {
        self.send(
            Request::builder().uri(path).header("hx-request", "true"),
            Body::empty(),
        )
        .await
    }

    /// `POST path` with a urlencoded form, as a plain browser.
    pub async fn post_form(&mut self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        self.post(path, form, false).await
    }

    /// `POST path` with a urlencoded form, as htmx.
    pub async fn htmx_post(&mut self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        self.post(path, form, true).await
    }

    async fn post(&mut self, path: &str, form: &[(&str, &str)], htmx: bool) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::REFERER, "http://localhost:3000/menus");
        if htmx {
            builder = builder.header("hx-request", "true");
        }
        self.send(builder, Body::from(encode_form(form))).await
    }
}

fn encode_form(form: &[(&str, &str)]) -> String {
    form.iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                url::form_urlencoded::byte_serialize(key.as_bytes()).collect::<String>(),
                url::form_urlencoded::byte_serialize(value.as_bytes()).collect::<String>()
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
