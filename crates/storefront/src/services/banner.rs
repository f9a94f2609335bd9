//! Permanent announcement banner shown above the menu.

use food_en_k_core::Severity;

/// One line of the banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerItem {
    pub key: &'static str,
    pub description: &'static str,
}

/// The banner. It cannot be dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub icon: &'static str,
    pub title: &'static str,
    pub color: Severity,
    pub items: Vec<BannerItem>,
}

impl Banner {
    #[must_use]
    pub fn item(&self, key: &str) -> Option<&BannerItem> {
        self.items.iter().find(|i| i.key == key)
    }
}

#[must_use]
pub fn static_banner() -> Banner {
    Banner {
        icon: "i-lucide-megaphone",
        title: "Informations importantes - Food Truck",
        color: Severity::Warning,
        items: vec![
            BannerItem {
                key: "closed",
                description: "L'emplacement du mercredi soir est dorénavant fermé.",
            },
            BannerItem {
                key: "new-location",
                description: "À partir du Vendredi Midi 20 Juin : Cesson Sevigné, entreprise B-Com (1219 Avenue des Champs Blancs)",
            },
            BannerItem {
                key: "privatizations",
                description: "JUIN : vendredi 13 (Midi), Lundi 16 (midi), Jeudi 19 (midi et soir), jeudi 26 (midi), Vendredi 27 (soir / Kermesse) • JUILLET : 3 et 4",
            },
        ],
    }
}
