//! Local producers supplying the truck.

use food_en_k_core::PartnerId;
use food_en_k_core::entity::{ContactInfo, EntityMeta, LocalPartner};
use tracing::instrument;

use crate::cms::{ContentApi, Query};

/// Partners, exclusive ones split out for the highlighted card.
#[derive(Debug, Clone, PartialEq)]
pub struct Partners {
    pub all: Vec<LocalPartner>,
}

impl Partners {
    #[must_use]
    pub fn exclusive(&self) -> Vec<&LocalPartner> {
        self.all.iter().filter(|p| p.is_exclusive).collect()
    }

    #[must_use]
    pub fn regular(&self) -> Vec<&LocalPartner> {
        self.all.iter().filter(|p| !p.is_exclusive).collect()
    }

    /// Partner by document id, or whose name contains `slug`.
    #[must_use]
    pub fn by_slug(&self, slug: &str) -> Option<&LocalPartner> {
        let needle = slug.to_lowercase();
        self.all
            .iter()
            .find(|p| p.meta.document_id == slug || p.name.to_lowercase().contains(&needle))
    }

    #[must_use]
    pub fn by_specialty(&self, specialty: &str) -> Vec<&LocalPartner> {
        let needle = specialty.to_lowercase();
        self.all
            .iter()
            .filter(|p| p.specialty.to_lowercase().contains(&needle))
            .collect()
    }
}

/// Load partners, falling back to the built-in list.
#[instrument(skip(api))]
pub async fn fetch_partners(api: &ContentApi) -> Partners {
    let query = Query::new().populate_fields(["logo"]);
    let partners = api
        .fetch_entities::<LocalPartner>("local-partners", &query)
        .await
        .into_data();

    Partners {
        all: if partners.is_empty() {
            default_partners()
        } else {
            partners
        },
    }
}

fn years_since(partner_since: &str, current_year: i32) -> Option<i32> {
    partner_since
        .trim()
        .parse::<i32>()
        .ok()
        .map(|year| current_year - year)
}

/// `Nouveau partenaire`, `Partenaire depuis 1 an`, `Partenaire depuis N ans`.
#[must_use]
pub fn partner_since_label(partner_since: &str, current_year: i32) -> String {
    match years_since(partner_since, current_year) {
        Some(years) if years <= 0 => "Nouveau partenaire".to_string(),
        Some(1) => "Partenaire depuis 1 an".to_string(),
        Some(years) => format!("Partenaire depuis {years} ans"),
        None => format!("Partenaire depuis {}", partner_since.trim()),
    }
}

/// Badge color: exclusive partners stand out, long-standing ones are green.
#[must_use]
pub fn badge_color(partner: &LocalPartner, current_year: i32) -> &'static str {
    if partner.is_exclusive {
        "warning"
    } else if years_since(&partner.partner_since, current_year).is_some_and(|y| y >= 3) {
        "success"
    } else {
        "primary"
    }
}

const SPECIALTY_ICONS: [(&str, &str); 6] = [
    ("pain", "i-lucide-wheat"),
    ("boulangerie", "i-lucide-wheat"),
    ("viande", "i-lucide-beef"),
    ("légume", "i-lucide-carrot"),
    ("fromage", "i-lucide-milk"),
    ("bio", "i-lucide-leaf"),
];

/// Icon for a specialty, by keyword.
#[must_use]
pub fn icon(specialty: &str) -> &'static str {
    let lower = specialty.to_lowercase();
    SPECIALTY_ICONS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map_or("i-lucide-store", |(_, icon)| *icon)
}

#[allow(clippy::too_many_arguments)]
fn partner(
    id: i64,
    slug: &str,
    name: &str,
    description: &str,
    address: &str,
    specialty: &str,
    since: &str,
    exclusive: bool,
    contact: ContactInfo,
) -> LocalPartner {
    LocalPartner {
        id: PartnerId::new(id),
        meta: EntityMeta::fallback(slug),
        name: name.to_string(),
        description: description.to_string(),
        address: address.to_string(),
        specialty: specialty.to_string(),
        partner_since: since.to_string(),
        logo: None,
        is_exclusive: exclusive,
        contact_info: Some(contact),
    }
}

/// Built-in partner list.
#[must_use]
pub fn default_partners() -> Vec<LocalPartner> {
    vec![
        partner(
            1,
            "boulangerie-1863",
            "Boulangerie 1863",
            "Nos pains burger sont confectionnés selon notre recette maison exclusive",
            "Merdrignac, Côtes-d'Armor",
            "Pains artisanaux et viennoiseries",
            "2020",
            true,
            ContactInfo {
                phone: Some("02 96 28 XX XX".into()),
                email: None,
                website: Some("https://boulangerie1863.fr".into()),
            },
        ),
        partner(
            2,
            "ferme-du-beau-pre",
            "Ferme du Beau Pré",
            "Élevage de vaches bretonnes pour une viande d'exception",
            "Plélan-le-Petit, Côtes-d'Armor",
            "Viande bovine française",
            "2019",
            false,
            ContactInfo {
                phone: Some("02 96 27 XX XX".into()),
                ..ContactInfo::default()
            },
        ),
        partner(
            3,
            "maraicher-bio-local",
            "Maraîcher Bio Local",
            "Légumes frais et de saison cultivés sans pesticides",
            "Région de Merdrignac",
            "Légumes biologiques",
            "2021",
            false,
            ContactInfo {
                email: Some("contact@maraicherbio.fr".into()),
                ..ContactInfo::default()
            },
        ),
        partner(
            4,
            "fromagerie-bretonne",
            "Fromagerie Bretonne",
            "Fromages artisanaux au lait de vaches bretonnes",
            "Loudéac, Côtes-d'Armor",
            "Fromages artisanaux",
            "2020",
            false,
            ContactInfo {
                phone: Some("02 96 XX XX XX".into()),
                email: None,
                website: Some("https://fromagerie-bretonne.fr".into()),
            },
        ),
    ]
}
