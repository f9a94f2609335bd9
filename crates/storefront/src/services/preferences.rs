//! Visitor preferences kept in the session.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::warn;

use crate::models::session_keys;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl Theme {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }

    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::Auto];
}

/// Stored preferences. Fields missing from the stored document take
/// their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub language: String,
    pub newsletter: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Auto,
            language: "fr".to_string(),
            newsletter: false,
        }
    }
}

/// Partial update, as posted by the preferences form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesUpdate {
    pub theme: Option<String>,
    pub language: Option<String>,
    /// Checkbox: present when checked.
    pub newsletter: Option<String>,
}

impl Preferences {
    /// Apply `update`, ignoring values that do not parse.
    #[must_use]
    pub fn merged(mut self, update: &PreferencesUpdate) -> Self {
        if let Some(theme) = update.theme.as_deref().and_then(Theme::parse) {
            self.theme = theme;
        }
        if let Some(language) = update
            .language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty() && l.len() <= 8)
        {
            self.language = language.to_string();
        }
        self.newsletter = update
            .newsletter
            .as_deref()
            .is_some_and(|v| matches!(v, "on" | "true" | "1"));
        self
    }
}

/// Preferences of the current visitor.
#[derive(Clone)]
pub struct PreferenceStore {
    session: Session,
}

impl PreferenceStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn load(&self) -> Preferences {
        match self.session.get::<Preferences>(session_keys::PREFERENCES).await {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to parse stored preferences: {e}");
                Preferences::default()
            }
        }
    }

    /// Merge `update` over the stored preferences and persist the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn update(
        &self,
        update: &PreferencesUpdate,
    ) -> Result<Preferences, tower_sessions::session::Error> {
        let preferences = self.load().await.merged(update);
        self.session
            .insert(session_keys::PREFERENCES, &preferences)
            .await?;
        Ok(preferences)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    #[test]
    fn test_partial_document_merges_over_defaults() {
        let prefs: Preferences = serde_json::from_value(json!({ "theme": "dark" })).unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.language, "fr");
        assert!(!prefs.newsletter);
    }

    #[test]
    fn test_merged_ignores_bad_values() {
        let update = PreferencesUpdate {
            theme: Some("sepia".into()),
            language: Some("  ".into()),
            newsletter: Some("on".into()),
        };
        let prefs = Preferences::default().merged(&update);
        assert_eq!(prefs.theme, Theme::Auto);
        assert_eq!(prefs.language, "fr");
        assert!(prefs.newsletter);
    }

    #[tokio::test]
    async fn test_update_persists() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let store = PreferenceStore::new(session.clone());
        assert_eq!(store.load().await, Preferences::default());

        let update = PreferencesUpdate {
            theme: Some("light".into()),
            language: Some("en".into()),
            newsletter: None,
        };
        store.update(&update).await.unwrap();

        let reloaded = PreferenceStore::new(session).load().await;
        assert_eq!(reloaded.theme, Theme::Light);
        assert_eq!(reloaded.language, "en");
    }

    #[tokio::test]
    async fn test_corrupt_preferences_fall_back() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        session
            .insert(session_keys::PREFERENCES, json!({ "theme": 42 }))
            .await
            .unwrap();
        assert_eq!(PreferenceStore::new(session).load().await, Preferences::default());
    }
}
