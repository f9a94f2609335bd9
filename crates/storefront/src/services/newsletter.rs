//! Newsletter sign-up stored in the CMS.

use serde_json::{Value, json};
use tracing::instrument;

use super::notifications::{Notification, Notifications};
use crate::cms::ContentApi;
use food_en_k_core::Email;

/// CMS collection receiving sign-ups.
pub const NEWSLETTER_COLLECTION: &str = "newsletter-subscriptions";

/// Outcome of a sign-up attempt, rendered by the footer form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed,
    InvalidEmail,
    Failed,
}

impl SubscribeOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Subscribed)
    }

    /// Inline message shown under the form.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Subscribed => "Merci de vous être inscrit à notre newsletter.",
            Self::InvalidEmail => "Veuillez saisir une adresse email valide",
            Self::Failed => "Une erreur est survenue. Veuillez réessayer.",
        }
    }
}

/// Register `email` for the newsletter.
#[instrument(skip(api, notifications))]
pub async fn subscribe(api: &ContentApi, notifications: &Notifications, email: &str) -> SubscribeOutcome {
    let Ok(email) = Email::parse(email) else {
        return SubscribeOutcome::InvalidEmail;
    };

    let payload = json!({
        "email": email.as_str(),
        "source": "footer",
    });

    let response = api
        .clone()
        .quiet_success()
        .create_entity::<Value>(NEWSLETTER_COLLECTION, &payload)
        .await;

    if response.is_ok() {
        tracing::info!(domain = %email.domain(), "Newsletter subscription");
        notifications
            .push(Notification::success(
                "Inscription réussie !",
                SubscribeOutcome::Subscribed.message(),
            ))
            .await;
        SubscribeOutcome::Subscribed
    } else {
        notifications
            .push(Notification::error("Erreur", SubscribeOutcome::Failed.message()))
            .await;
        SubscribeOutcome::Failed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cms::CmsClient;
    use crate::config::CmsConfig;
    use std::sync::Arc;
    use std::time::Duration;
    use tower_sessions::{MemoryStore, Session};
    use url::Url;

    fn unreachable_api() -> ContentApi {
        let config = CmsConfig {
            retry_attempts: 1,
            retry_base_delay: Duration::from_millis(1),
            ..CmsConfig::new(Url::parse("http://127.0.0.1:9").unwrap())
        };
        ContentApi::new(CmsClient::new(&config))
    }

    fn notifications() -> Notifications {
        Notifications::new(Session::new(None, Arc::new(MemoryStore::default()), None))
    }

    #[tokio::test]
    async fn test_invalid_email_makes_no_request() {
        let notifications = notifications();
        let outcome = subscribe(&unreachable_api(), &notifications, "pas-un-email").await;
        assert_eq!(outcome, SubscribeOutcome::InvalidEmail);
        assert!(!notifications.has_notifications().await);
    }

    #[tokio::test]
    async fn test_backend_failure_notifies() {
        let notifications = notifications();
        let outcome = subscribe(&unreachable_api(), &notifications, "jeanne@example.fr").await;
        assert_eq!(outcome, SubscribeOutcome::Failed);

        let titles: Vec<String> = notifications
            .list()
            .await
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert!(titles.contains(&"Erreur".to_string()));
    }

    #[test]
    fn test_outcome_messages() {
        assert!(SubscribeOutcome::Subscribed.is_success());
        assert!(!SubscribeOutcome::Failed.is_success());
        assert_eq!(
            SubscribeOutcome::InvalidEmail.message(),
            "Veuillez saisir une adresse email valide"
        );
    }
}
