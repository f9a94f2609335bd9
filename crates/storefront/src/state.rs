//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use tower_sessions::Session;

use crate::cms::{CmsClient, ContentApi};
use crate::config::StorefrontConfig;
use crate::content::ContentStore;
use crate::services::notifications::Notifications;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the CMS client, markdown pages and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cms: CmsClient,
    content: ContentStore,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// `pool` is only present when sessions are stored in `PostgreSQL`.
    #[must_use]
    pub fn new(config: StorefrontConfig, content: ContentStore, pool: Option<PgPool>) -> Self {
        let cms = CmsClient::new(&config.cms);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                cms,
                content,
                pool,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Raw CMS client, for callers that handle errors themselves.
    #[must_use]
    pub fn cms(&self) -> &CmsClient {
        &self.inner.cms
    }

    /// Markdown pages.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Content API reporting failures to the visitor owning `session`.
    #[must_use]
    pub fn api(&self, session: &Session) -> ContentApi {
        ContentApi::new(self.inner.cms.clone())
            .with_notifications(Notifications::new(session.clone()))
    }
}
