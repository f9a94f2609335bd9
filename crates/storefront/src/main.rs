//! Food en K storefront - public site of the food truck.
//!
//! This binary serves the site on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework with HTMX for interactivity
//! - Askama templates for server-side rendering
//! - Strapi CMS for menus, locations, partners and page copy
//! - Session cart, ordered by SMS or phone call
//! - Optional `PostgreSQL` for session storage (memory store otherwise)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use food_en_k_storefront::config::StorefrontConfig;
use food_en_k_storefront::content::{ContentStore, Placeholders};
use food_en_k_storefront::state::AppState;
use food_en_k_storefront::{CONTENT_DIR, app, db};
use sentry::integrations::tracing as sentry_tracing;
use sqlx::PgPool;
use tower_sessions::{ExpiredDeletion, MemoryStore};
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired sessions are purged from `PostgreSQL`.
const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Connect to the session database, if one is configured.
///
/// A database that cannot be reached is logged and the site falls back to
/// in-memory sessions.
async fn connect_pool(config: &StorefrontConfig) -> Option<PgPool> {
    let url = config.database_url.as_ref()?;
    match db::create_pool(url).await {
        Ok(pool) => {
            tracing::info!("Session database pool created");
            Some(pool)
        }
        Err(e) => {
            tracing::warn!("Session database unavailable, using memory sessions: {e}");
            None
        }
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // JSON logs on Fly.io, human-readable text locally
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "food_en_k_storefront=info,tower_http=debug".into());
    let json_logs = std::env::var_os("FLY_APP_NAME").is_some();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let placeholders = Placeholders::from_config(&config);
    let content = ContentStore::load(Path::new(CONTENT_DIR), &placeholders)
        .expect("Failed to load content pages");
    tracing::info!(pages = content.len(), "Content pages loaded");

    // NOTE: the sessions table is NOT created on startup.
    // Run it explicitly via: fek migrate sessions
    let pool = connect_pool(&config).await;
    let addr = config.socket_addr();
    let state = AppState::new(config, content, pool);

    let router = if let Some(store) = state.pool().cloned().map(PostgresStore::new) {
        tokio::task::spawn(
            store
                .clone()
                .continuously_delete_expired(SESSION_CLEANUP_INTERVAL),
        );
        app(state, store)
    } else {
        tracing::info!("No session database configured, using memory sessions");
        app(state, MemoryStore::default())
    };

    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Rate limiting falls back to the peer address when no proxy header is set
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
