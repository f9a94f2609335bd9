//! Session-backed notification queue.
//!
//! Notifications raised while handling a request are stored in the session
//! and rendered (then drained) by the next page that is shown.

use food_en_k_core::Severity;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::warn;
use uuid::Uuid;

use crate::models::session_keys;

/// Default display time in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Maximum queued notifications; the oldest are dropped first.
const MAX_QUEUED: usize = 10;

/// A message shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: Severity,
    pub title: String,
    pub description: Option<String>,
    /// Display time in milliseconds, 0 keeps it until dismissed.
    pub timeout_ms: u64,
}

impl Notification {
    #[must_use]
    pub fn new(kind: Severity, title: impl Into<String>) -> Self {
        Self {
            id: format!("notif-{}", Uuid::new_v4().simple()),
            kind,
            title: title.into(),
            description: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Success, title).with_description(description)
    }

    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Error, title).with_description(description)
    }

    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Info, title).with_description(description)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Icon name for the notification kind.
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        self.kind.icon()
    }
}

/// Notification queue of the current visitor.
#[derive(Clone)]
pub struct Notifications {
    session: Session,
}

impl Notifications {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    async fn load(&self) -> Vec<Notification> {
        match self
            .session
            .get::<Vec<Notification>>(session_keys::NOTIFICATIONS)
            .await
        {
            Ok(list) => list.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to read notifications from session: {e}");
                Vec::new()
            }
        }
    }

    async fn store(&self, list: &[Notification]) {
        if let Err(e) = self
            .session
            .insert(session_keys::NOTIFICATIONS, list)
            .await
        {
            warn!("Failed to write notifications to session: {e}");
        }
    }

    /// Queue a notification and return its id.
    pub async fn push(&self, notification: Notification) -> String {
        let id = notification.id.clone();
        let mut list = self.load().await;
        list.push(notification);
        if list.len() > MAX_QUEUED {
            let excess = list.len() - MAX_QUEUED;
            list.drain(..excess);
        }
        self.store(&list).await;
        id
    }

    /// Queue an error notification titled "Erreur".
    pub async fn set_error(&self, message: impl Into<String>) -> String {
        self.push(Notification::error("Erreur", message)).await
    }

    /// Queued notifications, left in place.
    pub async fn list(&self) -> Vec<Notification> {
        self.load().await
    }

    pub async fn has_notifications(&self) -> bool {
        !self.load().await.is_empty()
    }

    /// Remove a notification by id. Returns whether it was queued.
    pub async fn remove(&self, id: &str) -> bool {
        let mut list = self.load().await;
        let before = list.len();
        list.retain(|n| n.id != id);
        let removed = list.len() != before;
        if removed {
            self.store(&list).await;
        }
        removed
    }

    pub async fn clear(&self) {
        self.store(&[]).await;
    }

    /// Drain the queue for rendering.
    pub async fn take(&self) -> Vec<Notification> {
        let list = self.load().await;
        if !list.is_empty() {
            self.store(&[]).await;
        }
        list
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn notifications() -> Notifications {
        let store = Arc::new(MemoryStore::default());
        Notifications::new(Session::new(None, store, None))
    }

    #[test]
    fn test_defaults() {
        let n = Notification::new(Severity::Warning, "Attention");
        assert!(n.id.starts_with("notif-"));
        assert_eq!(n.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(n.description.is_none());
        assert_eq!(n.icon(), "i-lucide-alert-triangle");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Notification::info("a", "b");
        let b = Notification::info("a", "b");
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_push_and_take() {
        let queue = notifications();
        queue.push(Notification::success("Succès", "ok")).await;
        queue.set_error("boom").await;

        assert!(queue.has_notifications().await);
        let taken = queue.take().await;
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].title, "Succès");
        assert_eq!(taken[1].kind, Severity::Error);
        assert_eq!(taken[1].description.as_deref(), Some("boom"));

        assert!(queue.take().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove() {
        let queue = notifications();
        let id = queue.push(Notification::info("Info", "x")).await;
        queue.push(Notification::info("Other", "y")).await;

        assert!(queue.remove(&id).await);
        assert!(!queue.remove(&id).await);
        let left = queue.list().await;
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].title, "Other");
    }

    #[tokio::test]
    async fn test_clear() {
        let queue = notifications();
        queue.push(Notification::info("Info", "x")).await;
        queue.clear().await;
        assert!(!queue.has_notifications().await);
    }

    #[tokio::test]
    async fn test_queue_is_bounded() {
        let queue = notifications();
        for i in 0..15 {
            queue.push(Notification::info(format!("n{i}"), "x")).await;
        }
        let list = queue.list().await;
        assert_eq!(list.len(), MAX_QUEUED);
        assert_eq!(list[0].title, "n5");
    }
}
