//! Catering offers and the departments the truck covers.
//!
//! Both lists come from the CMS; when it returns nothing the built-in
//! offers below are shown so the events page is never empty.

use food_en_k_core::entity::{Coverage, EntityMeta, EventService};
use food_en_k_core::{CoverageId, EventServiceId};
use tracing::instrument;

use crate::cms::{ContentApi, Query};

/// Offers and coverage shown on the events page.
#[derive(Debug, Clone, PartialEq)]
pub struct EventsContent {
    pub services: Vec<EventService>,
    pub coverage: Vec<Coverage>,
}

impl EventsContent {
    /// Offer matching a document id, or whose title contains `slug`.
    #[must_use]
    pub fn service_by_slug(&self, slug: &str) -> Option<&EventService> {
        let needle = slug.to_lowercase();
        self.services.iter().find(|s| {
            s.meta.document_id == slug || s.title.to_lowercase().contains(&needle)
        })
    }

    /// Coverage entry for a department, case-insensitive.
    #[must_use]
    pub fn coverage_by_department(&self, department: &str) -> Option<&Coverage> {
        self.coverage
            .iter()
            .find(|c| c.department.to_lowercase() == department.to_lowercase())
    }
}

/// Load offers and coverage, falling back to the built-in lists.
#[instrument(skip(api))]
pub async fn fetch_events_content(api: &ContentApi) -> EventsContent {
    let query = Query::new();
    let (services, coverage) = tokio::join!(
        api.fetch_entities::<EventService>("event-services", &query),
        api.fetch_entities::<Coverage>("coverage-areas", &query),
    );

    let services = services.into_data();
    let coverage = coverage.into_data();

    EventsContent {
        services: if services.is_empty() {
            default_services()
        } else {
            services
        },
        coverage: if coverage.is_empty() {
            default_coverage()
        } else {
            coverage
        },
    }
}

/// Icon of an offer: its own, else by document id, else a calendar.
#[must_use]
pub fn service_icon(service: &EventService) -> &str {
    if !service.icon.is_empty() {
        return &service.icon;
    }
    match service.meta.document_id.as_str() {
        "professionnel" | "professional-events" => "i-lucide-briefcase",
        "privé" | "private-events" => "i-lucide-heart",
        "associatif" | "association-events" => "i-lucide-users",
        _ => "i-lucide-calendar",
    }
}

/// Guest range label, e.g. `20 - 500 personnes`.
#[must_use]
pub fn guest_range(service: &EventService) -> String {
    let min = service.min_guests.filter(|n| *n > 0);
    let max = service.max_guests.filter(|n| *n > 0);
    match (min, max) {
        (Some(min), Some(max)) => format!("{min} - {max} personnes"),
        (Some(min), None) => format!("À partir de {min} personnes"),
        (None, Some(max)) => format!("Jusqu'à {max} personnes"),
        (None, None) => "Selon vos besoins".to_string(),
    }
}

fn service(
    id: i64,
    slug: &str,
    title: &str,
    description: &str,
    icon: &str,
    features: [&str; 4],
    guests: (u32, u32),
) -> EventService {
    EventService {
        id: EventServiceId::new(id),
        meta: EntityMeta::fallback(slug),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        features: features.iter().map(ToString::to_string).collect(),
        min_guests: Some(guests.0),
        max_guests: Some(guests.1),
        price: None,
        duration: None,
    }
}

/// Built-in catering offers.
#[must_use]
pub fn default_services() -> Vec<EventService> {
    vec![
        service(
            1,
            "professional-events",
            "Événements Professionnels",
            "Impressionnez vos collaborateurs et clients",
            "i-lucide-briefcase",
            [
                "Team Building & Séminaires",
                "Inaugurations & Portes Ouvertes",
                "Événements d'entreprise",
                "Pause déjeuner sur site",
            ],
            (20, 500),
        ),
        service(
            2,
            "private-events",
            "Événements Privés",
            "Célébrez vos moments précieux",
            "i-lucide-heart",
            [
                "Mariages & Réceptions",
                "Anniversaires & Fêtes familiales",
                "Communions & Baptêmes",
                "Fêtes entre amis",
            ],
            (10, 200),
        ),
        service(
            3,
            "association-events",
            "Événements Associatifs",
            "Rassemblez votre communauté",
            "i-lucide-users",
            [
                "Festivals & Marchés",
                "Tournois & Compétitions",
                "Assemblées générales",
                "Événements caritatifs",
            ],
            (50, 1000),
        ),
    ]
}

fn coverage(id: i64, slug: &str, department: &str, description: &str, color: &str, cities: &[&str]) -> Coverage {
    Coverage {
        id: CoverageId::new(id),
        meta: EntityMeta::fallback(slug),
        department: department.to_string(),
        description: description.to_string(),
        color: color.to_string(),
        cities: cities.iter().map(ToString::to_string).collect(),
    }
}

/// Built-in coverage areas.
#[must_use]
pub fn default_coverage() -> Vec<Coverage> {
    vec![
        coverage(
            1,
            "ille-et-vilaine",
            "Ille-et-Vilaine",
            "Tout le département couvert, de Rennes à Saint-Malo en passant par Vitré et Fougères.",
            "primary-500",
            &["Rennes", "Saint-Malo", "Vitré", "Fougères"],
        ),
        coverage(
            2,
            "cotes-d-armor",
            "Côtes-d'Armor",
            "De Dinan à Lannion, en passant par Saint-Brieuc et nos environs de Merdrignac.",
            "blue-500",
            &["Dinan", "Lannion", "Saint-Brieuc", "Merdrignac"],
        ),
        coverage(
            3,
            "morbihan",
            "Morbihan",
            "Vannes, Lorient, Pontivy et toutes les communes environnantes.",
            "green-500",
            &["Vannes", "Lorient", "Pontivy"],
        ),
    ]
}
