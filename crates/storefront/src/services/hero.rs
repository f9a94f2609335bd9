//! Hero sections: CMS content per page with built-in defaults.

use std::collections::BTreeMap;

use food_en_k_core::entity::{HeroBadge, HeroContent, HeroLink};
use tracing::instrument;

use crate::cms::{ContentApi, Query};

/// Pages with a hero section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroPage {
    Home,
    Event,
    Menu,
    Contact,
}

impl HeroPage {
    /// Value of the CMS `page` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Event => "event",
            Self::Menu => "menu",
            Self::Contact => "contact",
        }
    }

    pub const ALL: [Self; 4] = [Self::Home, Self::Event, Self::Menu, Self::Contact];
}

/// Hero content loaded from the CMS, with defaults for missing pages.
#[derive(Debug, Clone)]
pub struct Heroes {
    cms: Vec<HeroContent>,
    defaults: BTreeMap<&'static str, HeroContent>,
}

impl Heroes {
    /// `phone` is the number behind the "call us" buttons.
    #[must_use]
    pub fn new(cms: Vec<HeroContent>, phone: &str) -> Self {
        Self {
            cms,
            defaults: default_heroes(phone),
        }
    }

    /// Hero for `page`: CMS entry, else the page default, else the home default.
    #[must_use]
    pub fn get(&self, page: &str) -> HeroContent {
        if let Some(content) = self.cms.iter().find(|c| c.page == page) {
            return content.clone();
        }
        self.defaults
            .get(page)
            .or_else(|| self.defaults.get(HeroPage::Home.as_str()))
            .cloned()
            .unwrap_or_else(home_hero)
    }

    #[must_use]
    pub fn page(&self, page: HeroPage) -> HeroContent {
        self.get(page.as_str())
    }

    /// Every hero by page, CMS entries overriding defaults.
    #[must_use]
    pub fn all_heroes(&self) -> BTreeMap<String, HeroContent> {
        let mut all: BTreeMap<String, HeroContent> = self
            .defaults
            .iter()
            .map(|(page, content)| ((*page).to_string(), content.clone()))
            .collect();
        for content in &self.cms {
            all.insert(content.page.clone(), content.clone());
        }
        all
    }
}

/// Load hero entries from the CMS.
#[instrument(skip(api))]
pub async fn fetch_heroes(api: &ContentApi, phone: &str) -> Heroes {
    let query = Query::new().populate_fields(["links"]);
    let cms = api
        .fetch_entities::<HeroContent>("hero-contents", &query)
        .await
        .into_data();
    Heroes::new(cms, phone)
}

fn link(label: &str, to: &str) -> HeroLink {
    HeroLink {
        label: label.to_string(),
        to: to.to_string(),
        size: Some("xl".to_string()),
        ..HeroLink::default()
    }
}

fn primary(mut link: HeroLink, trailing_icon: &str) -> HeroLink {
    link.trailing_icon = Some(trailing_icon.to_string());
    link.color = Some("primary".to_string());
    link
}

fn ghost(mut link: HeroLink, icon: &str) -> HeroLink {
    link.icon = Some(icon.to_string());
    link.variant = Some("ghost".to_string());
    link
}

fn badge(text: &str, icon: &str) -> Option<HeroBadge> {
    Some(HeroBadge {
        text: text.to_string(),
        icon: icon.to_string(),
    })
}

fn home_hero() -> HeroContent {
    HeroContent {
        page: "home".to_string(),
        title: "Food en K - Burgers artisanaux & Traiteur événementiel".to_string(),
        description: "Découvrez nos burgers faits maison et notre service traiteur pour tous vos événements. Commandez en ligne ou contactez-nous pour une expérience gourmande et conviviale !".to_string(),
        badge: None,
        links: vec![
            primary(link("Voir nos burgers", "/menus"), "i-lucide-utensils"),
            ghost(link("Nous contacter", "/contact"), "i-lucide-phone"),
        ],
    }
}

/// Built-in heroes keyed by page.
#[must_use]
pub fn default_heroes(phone: &str) -> BTreeMap<&'static str, HeroContent> {
    let tel = format!("tel:{}", phone.replace(' ', ""));

    let event = HeroContent {
        page: "event".to_string(),
        title: "Votre Food Truck pour tous vos événements".to_string(),
        description: "De 50 à 500 personnes, Food en K se déplace partout en Bretagne pour faire de votre événement un moment inoubliable ! Burgers artisanaux, service personnalisé et ambiance conviviale garantie.".to_string(),
        badge: badge("Service traiteur mobile", "i-lucide-truck"),
        links: vec![
            primary(link("Demander un devis", "/contact"), "i-lucide-calculator"),
            ghost(link("Nous appeler", &tel), "i-lucide-phone"),
        ],
    };

    let menu = HeroContent {
        page: "menu".to_string(),
        title: "Notre carte - Burgers artisanaux".to_string(),
        description: "Découvrez nos créations gourmandes préparées avec des produits locaux et de saison. Chaque burger raconte une histoire, celle de notre terroir breton.".to_string(),
        badge: badge("Produits locaux", "i-lucide-leaf"),
        links: vec![
            primary(link("Commander maintenant", &tel), "i-lucide-phone"),
            ghost(link("Organiser un événement", "/events"), "i-lucide-calendar"),
        ],
    };

    let contact = HeroContent {
        page: "contact".to_string(),
        title: "Contactez Food en K".to_string(),
        description: "Une question, une commande ou un projet d'événement ? Nous sommes là pour vous accompagner et créer ensemble un moment gourmand inoubliable.".to_string(),
        badge: badge("Réponse rapide", "i-lucide-clock"),
        links: vec![
            primary(link("Appeler maintenant", &tel), "i-lucide-phone"),
            ghost(link("Voir nos menus", "/menus"), "i-lucide-utensils"),
        ],
    };

    BTreeMap::from([
        ("home", home_hero()),
        ("event", event),
        ("menu", menu),
        ("contact", contact),
    ])
}
