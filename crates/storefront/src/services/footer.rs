//! Footer content and settings.
//!
//! Both are CMS single types. A missing or failing single type is not worth
//! a toast: the built-in footer is used silently.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::cms::{ContentApi, Query};
use crate::config::ContactConfig;
use crate::content::ContentStore;
use food_en_k_core::format_french_phone;

/// A footer link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterLink {
    pub label: String,
    pub to: String,
}

impl FooterLink {
    fn new(label: &str, to: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterContact {
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// `footer-content` single type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterContent {
    pub company_name: String,
    pub description: String,
    pub contact_info: FooterContact,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub legal_links: Vec<FooterLink>,
    #[serde(default)]
    pub navigation_links: Vec<FooterLink>,
}

/// `footer-setting` single type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterSettings {
    pub show_newsletter: bool,
    pub show_social_links: bool,
    pub newsletter_description: String,
}

impl Default for FooterSettings {
    fn default() -> Self {
        Self {
            show_newsletter: true,
            show_social_links: true,
            newsletter_description: "Inscrivez-vous à notre newsletter pour recevoir nos dernières actualités et offres spéciales.".to_string(),
        }
    }
}

/// Everything the footer template needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub content: FooterContent,
    pub settings: FooterSettings,
}

impl Footer {
    /// Built-in footer.
    #[must_use]
    pub fn fallback(contact: &ContactConfig, pages: &ContentStore) -> Self {
        Self {
            content: default_content(contact, pages),
            settings: FooterSettings::default(),
        }
    }

    #[must_use]
    pub fn show_social_links(&self) -> bool {
        self.settings.show_social_links && !self.content.social_links.is_empty()
    }
}

/// Load the footer, using built-in values for whatever the CMS lacks.
#[instrument(skip_all)]
pub async fn fetch_footer(api: &ContentApi, contact: &ContactConfig, pages: &ContentStore) -> Footer {
    let client = api.client();
    let content_query = Query::new().populate_all();
    let settings_query = Query::new();
    let (content, settings) = tokio::join!(
        client.find_single::<FooterContent>("footer-content", &content_query),
        client.find_single::<FooterSettings>("footer-setting", &settings_query),
    );

    let content = content.unwrap_or_else(|e| {
        debug!(error = %e, "Footer content unavailable, using built-in");
        default_content(contact, pages)
    });
    let settings = settings.unwrap_or_else(|e| {
        debug!(error = %e, "Footer settings unavailable, using defaults");
        FooterSettings::default()
    });

    Footer { content, settings }
}

fn social(platform: &str, url: &str) -> SocialLink {
    SocialLink {
        platform: platform.to_string(),
        url: url.to_string(),
        icon: format!("i-simple-icons-{}", platform.to_lowercase()),
    }
}

/// Built-in footer content, contact details taken from configuration.
#[must_use]
pub fn default_content(contact: &ContactConfig, pages: &ContentStore) -> FooterContent {
    FooterContent {
        company_name: contact.restaurant_name.clone(),
        description: "Découvrez notre cuisine de rue authentique avec des ingrédients frais et locaux. Suivez notre food truck pour une expérience gastronomique unique !".to_string(),
        contact_info: FooterContact {
            phone: format_french_phone(&contact.phone),
            email: contact.email.clone(),
            address: "Bretagne, Côtes-d'Armor".to_string(),
        },
        social_links: vec![
            social("Facebook", "https://facebook.com"),
            social("Instagram", "https://instagram.com"),
        ],
        legal_links: pages
            .footer_pages()
            .into_iter()
            .map(|page| FooterLink::new(&page.meta.title, format!("/pages/{}", page.slug)))
            .collect(),
        navigation_links: vec![
            FooterLink::new("Accueil", "/"),
            FooterLink::new("Menus", "/menus"),
            FooterLink::new("Emplacements", "/locations"),
            FooterLink::new("Événements", "/events"),
            FooterLink::new("Contact", "/contact"),
        ],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cms::CmsClient;
    use crate::config::CmsConfig;
    use serde_json::json;
    use std::time::Duration;
    use url::Url;

    fn contact() -> ContactConfig {
        ContactConfig {
            email: "contact@food-en-k.com".to_string(),
            phone: "0624316790".to_string(),
            restaurant_name: "Food en K".to_string(),
            ..ContactConfig::default()
        }
    }

    #[test]
    fn test_fallback_uses_config() {
        let footer = Footer::fallback(&contact(), &ContentStore::default());
        assert_eq!(footer.content.company_name, "Food en K");
        assert_eq!(footer.content.contact_info.phone, "06 24 31 67 90");
        assert_eq!(footer.content.navigation_links[2].to, "/locations");
        assert!(footer.content.legal_links.is_empty());
        assert!(footer.settings.show_newsletter);
        assert_eq!(footer.content.social_links[1].icon, "i-simple-icons-instagram");
    }

    #[test]
    fn test_settings_from_cms_json() {
        let settings: FooterSettings = serde_json::from_value(json!({
            "showNewsletter": false,
            "showSocialLinks": true,
            "newsletterDescription": "Restez informés"
        }))
        .unwrap();
        assert!(!settings.show_newsletter);

        let footer = Footer {
            content: FooterContent {
                social_links: Vec::new(),
                ..default_content(&contact(), &ContentStore::default())
            },
            settings,
        };
        assert!(!footer.show_social_links());
    }

    #[tokio::test]
    async fn test_unreachable_cms_falls_back_quietly() {
        let mut config = CmsConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        config.retry_base_delay = Duration::from_millis(1);
        let api = ContentApi::new(CmsClient::new(&config));

        let footer = fetch_footer(&api, &contact(), &ContentStore::default()).await;
        assert_eq!(footer, Footer::fallback(&contact(), &ContentStore::default()));
    }
}
