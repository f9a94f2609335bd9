//! Info banners managed in the CMS.

use food_en_k_core::Severity;
use food_en_k_core::entity::Info;
use tracing::instrument;

use crate::cms::{ContentApi, Query};

/// Active info banners, in CMS order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoBanners {
    pub infos: Vec<Info>,
}

impl InfoBanners {
    /// Keep only active entries.
    #[must_use]
    pub fn from_entries(entries: Vec<Info>) -> Self {
        Self {
            infos: entries.into_iter().filter(|i| i.is_active).collect(),
        }
    }

    /// The banner shown at the top of the page.
    #[must_use]
    pub fn primary(&self) -> Option<&Info> {
        self.infos.first()
    }

    #[must_use]
    pub fn show_banner(&self) -> bool {
        !self.infos.is_empty()
    }

    /// Color of the primary banner, `info` when there is none.
    #[must_use]
    pub fn color(&self) -> Severity {
        self.primary().map(|i| i.kind).unwrap_or_default()
    }

    #[must_use]
    pub fn icon(&self) -> &'static str {
        self.color().icon()
    }
}

#[instrument(skip(api))]
pub async fn fetch_infos(api: &ContentApi) -> InfoBanners {
    let entries = api
        .fetch_entities::<Info>("infos", &Query::new())
        .await
        .into_data();
    InfoBanners::from_entries(entries)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_active_and_primary_first() {
        let entries: Vec<Info> = serde_json::from_value(json!([
            { "id": 1, "title": "Ancien", "message": "…", "type": "info", "isActive": false },
            { "id": 2, "title": "Fermeture", "message": "Fermé lundi", "type": "warning", "isActive": true },
            { "id": 3, "title": "Nouveau", "message": "Menu d'été", "type": "success", "isActive": true }
        ]))
        .unwrap();
        let banners = InfoBanners::from_entries(entries);

        assert!(banners.show_banner());
        assert_eq!(banners.infos.len(), 2);
        assert_eq!(banners.primary().unwrap().title, "Fermeture");
        assert_eq!(banners.color(), Severity::Warning);
        assert_eq!(banners.icon(), "i-lucide-alert-triangle");
    }

    #[test]
    fn test_empty_defaults_to_info() {
        let banners = InfoBanners::default();
        assert!(!banners.show_banner());
        assert_eq!(banners.color(), Severity::Info);
        assert_eq!(banners.icon(), "i-lucide-info");
    }
}
