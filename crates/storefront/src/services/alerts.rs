//! Site-wide alerts configured in code.
//!
//! Dismissed alert ids are remembered in the visitor's session.

use std::collections::BTreeSet;

use food_en_k_core::Severity;
use food_en_k_core::entity::Alert;
use tower_sessions::Session;
use tracing::warn;

use crate::models::session_keys;

/// Alerts currently configured.
#[must_use]
pub fn static_alerts() -> Vec<Alert> {
    vec![
        Alert {
            id: "location-change-june-2025".to_string(),
            kind: Severity::Warning,
            title: "Changement d'emplacement".to_string(),
            message: "L'emplacement du mercredi soir est dorénavant fermé. Nouvel emplacement : à partir du Vendredi Midi 20 Juin : Cesson Sevigné, entreprise B-Com (1219 Avenue des Champs Blancs)".to_string(),
            is_active: true,
            priority: 1,
            dismissible: true,
        },
        Alert {
            id: "private-events-june-2025".to_string(),
            kind: Severity::Info,
            title: "Food Truck privatisé en entreprise".to_string(),
            message: "JUIN : vendredi 13 (Midi) / Lundi 16 (midi) / Jeudi 19 (midi et soir), jeudi 26 (midi), Vendredi 27 (soir/ Kermesse). JUILLET : 3 et 4".to_string(),
            is_active: true,
            priority: 2,
            dismissible: true,
        },
    ]
}

/// Active alerts not in `dismissed`, lowest priority first.
#[must_use]
pub fn active_alerts(alerts: &[Alert], dismissed: &BTreeSet<String>) -> Vec<Alert> {
    let mut active: Vec<Alert> = alerts
        .iter()
        .filter(|a| a.is_active && !dismissed.contains(&a.id))
        .cloned()
        .collect();
    active.sort_by_key(|a| a.priority);
    active
}

/// Dismissed alerts of the current visitor.
#[derive(Clone)]
pub struct AlertStore {
    session: Session,
}

impl AlertStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn dismissed(&self) -> BTreeSet<String> {
        match self
            .session
            .get::<BTreeSet<String>>(session_keys::DISMISSED_ALERTS)
            .await
        {
            Ok(ids) => ids.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to read dismissed alerts: {e}");
                BTreeSet::new()
            }
        }
    }

    /// Alerts to show this visitor.
    pub async fn active(&self) -> Vec<Alert> {
        active_alerts(&static_alerts(), &self.dismissed().await)
    }

    /// Hide an alert for the rest of the session.
    ///
    /// Alerts marked non-dismissible are left alone. Returns whether the
    /// alert is now hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn dismiss(&self, id: &str) -> Result<bool, tower_sessions::session::Error> {
        let dismissible = static_alerts()
            .iter()
            .any(|a| a.id == id && a.dismissible);
        if !dismissible {
            return Ok(false);
        }

        let mut dismissed = self.dismissed().await;
        if dismissed.insert(id.to_string()) {
            self.session
                .insert(session_keys::DISMISSED_ALERTS, &dismissed)
                .await?;
        }
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn store() -> AlertStore {
        AlertStore::new(Session::new(None, Arc::new(MemoryStore::default()), None))
    }

    #[test]
    fn test_sorted_by_priority() {
        let mut alerts = static_alerts();
        alerts.reverse();
        let active = active_alerts(&alerts, &BTreeSet::new());
        assert_eq!(active[0].id, "location-change-june-2025");
        assert_eq!(active[1].priority, 2);
    }

    #[test]
    fn test_inactive_hidden() {
        let mut alerts = static_alerts();
        alerts[0].is_active = false;
        assert_eq!(active_alerts(&alerts, &BTreeSet::new()).len(), 1);
    }

    #[tokio::test]
    async fn test_dismiss_persists_in_session() {
        let store = store();
        assert_eq!(store.active().await.len(), 2);

        assert!(store.dismiss("private-events-june-2025").await.unwrap());
        let active = store.active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "location-change-june-2025");

        // dismissing twice is harmless
        assert!(store.dismiss("private-events-june-2025").await.unwrap());
        assert_eq!(store.dismissed().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_alert_not_recorded() {
        let store = store();
        assert!(!store.dismiss("nope").await.unwrap());
        assert!(store.dismissed().await.is_empty());
    }
}
