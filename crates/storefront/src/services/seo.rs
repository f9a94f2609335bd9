//! Page metadata: title, description, canonical URL, social cards and
//! schema.org structured data.

use food_en_k_core::entity::Product;
use serde_json::{Value, json};

use crate::cms::media::resolve_url;
use crate::config::StorefrontConfig;
use crate::services::menu::Breadcrumb;

pub const SITE_NAME: &str = "Food en K";

const DEFAULT_TITLE: &str = "Food en K - Food Truck Burger";
const DEFAULT_DESCRIPTION: &str = "Découvrez Food en K, le food truck spécialisé dans les burgers artisanaux et les produits locaux. Réservez votre événement et savourez nos créations uniques.";
const DEFAULT_IMAGE: &str = "/img/og-default.jpg";
const TWITTER_HANDLE: &str = "@foodenk";

/// Open Graph object type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OgType {
    #[default]
    Website,
    Article,
}

impl OgType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Article => "article",
        }
    }
}

/// What a page says about itself. Unset fields take site defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    /// Site-relative path or absolute URL.
    pub image: Option<String>,
    pub canonical: Option<String>,
    pub og_type: OgType,
}

impl SeoData {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    fn keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(ToString::to_string).collect();
        self
    }

    /// Defaults for the main pages; `None` for anything else.
    #[must_use]
    pub fn for_page(page: &str) -> Option<Self> {
        let seo = match page {
            "home" => Self::titled("Accueil")
                .with_description("Food en K - Le food truck spécialisé dans les burgers artisanaux et les produits locaux. Découvrez nos créations uniques et réservez votre événement.")
                .keywords(&["food truck", "burger artisanal", "produits locaux", "événement", "restauration mobile"]),
            "menus" => Self::titled("Nos Menus")
                .with_description("Découvrez nos burgers artisanaux, nos accompagnements et nos boissons. Des produits frais et locaux pour une expérience gustative unique.")
                .keywords(&["menu", "burger", "artisanal", "produits locaux", "restauration"]),
            "contact" => Self::titled("Contact")
                .with_description("Contactez Food en K pour réserver votre événement ou obtenir des informations. Nous sommes à votre disposition pour vos projets.")
                .keywords(&["contact", "réservation", "événement", "food truck", "devis"]),
            "locations" => Self::titled("Nos Emplacements")
                .with_description("Découvrez où nous trouver ! Consultez notre planning et nos emplacements pour ne pas manquer Food en K.")
                .keywords(&["emplacement", "planning", "food truck", "localisation", "horaires"]),
            "events" => Self::titled("Événements")
                .with_description("Food en K pour vos événements privés et professionnels. Mariages, anniversaires, séminaires... Nous nous adaptons à vos besoins.")
                .keywords(&["événement", "mariage", "anniversaire", "séminaire", "entreprise", "food truck"]),
            _ => return None,
        };
        Some(seo)
    }

    /// Page defaults with `custom` fields laid over them.
    #[must_use]
    pub fn page(page: &str, custom: Self) -> Self {
        let base = Self::for_page(page).unwrap_or_default();
        Self {
            title: custom.title.or(base.title),
            description: custom.description.or(base.description),
            keywords: if custom.keywords.is_empty() {
                base.keywords
            } else {
                custom.keywords
            },
            image: custom.image.or(base.image),
            canonical: custom.canonical.or(base.canonical),
            og_type: custom.og_type,
        }
    }
}

/// Resolved meta tags, ready for the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub image: String,
    pub canonical: String,
    pub og_type: &'static str,
    pub site_name: &'static str,
    pub locale: &'static str,
    pub twitter_card: &'static str,
    pub twitter_site: &'static str,
}

impl PageMeta {
    /// Resolve `data` for the page at `path` on `site_url`.
    #[must_use]
    pub fn resolve(data: &SeoData, site_url: &str, path: &str) -> Self {
        let title = data
            .title
            .as_ref()
            .map_or_else(|| DEFAULT_TITLE.to_string(), |t| format!("{t} | {SITE_NAME}"));
        let image = resolve_url(site_url, data.image.as_deref().unwrap_or(DEFAULT_IMAGE));
        let canonical = data
            .canonical
            .clone()
            .unwrap_or_else(|| format!("{site_url}{path}"));

        Self {
            title,
            description: data
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            keywords: data.keywords.join(", "),
            image,
            canonical,
            og_type: data.og_type.as_str(),
            site_name: SITE_NAME,
            locale: "fr_FR",
            twitter_card: "summary_large_image",
            twitter_site: TWITTER_HANDLE,
        }
    }
}

/// Serialize JSON-LD for an inline `<script>` block.
#[must_use]
pub fn to_script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

/// `BreadcrumbList` with absolute item URLs.
#[must_use]
pub fn breadcrumb_schema(items: &[Breadcrumb], site_url: &str) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .zip(1u32..)
        .map(|(item, position)| {
            json!({
                "@type": "ListItem",
                "position": position,
                "name": item.label,
                "item": format!("{site_url}{}", item.to),
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": elements,
    })
}

/// `LocalBusiness` description of the truck.
#[must_use]
pub fn local_business_schema(config: &StorefrontConfig) -> Value {
    let site_url = &config.base_url;
    json!({
        "@context": "https://schema.org",
        "@type": "LocalBusiness",
        "name": SITE_NAME,
        "description": "Food truck spécialisé dans les burgers artisanaux et les produits locaux",
        "url": site_url,
        "telephone": config.contact.phone,
        "email": config.contact.email,
        "image": format!("{site_url}/img/logo.png"),
        "logo": format!("{site_url}/img/logo.png"),
        "address": {
            "@type": "PostalAddress",
            "addressCountry": "FR",
            "addressLocality": "France",
        },
        "geo": {
            "@type": "GeoCoordinates",
            "latitude": 48.8566,
            "longitude": 2.3522,
        },
        "openingHours": ["Mo-Fr 11:00-14:00", "Mo-Fr 18:00-22:00", "Sa-Su 12:00-22:00"],
        "servesCuisine": "Burger, Fast Food, Cuisine Locale",
        "priceRange": "€€",
        "currenciesAccepted": "EUR",
        "paymentAccepted": "Cash, Credit Card",
    })
}

/// A named group of products for the `Menu` schema.
pub struct MenuSection<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub products: Vec<&'a Product>,
}

/// `Menu` with one section per category.
#[must_use]
pub fn menu_schema(sections: &[MenuSection<'_>]) -> Value {
    let sections: Vec<Value> = sections
        .iter()
        .map(|section| {
            let items: Vec<Value> = section
                .products
                .iter()
                .map(|product| {
                    json!({
                        "@type": "MenuItem",
                        "name": product.name,
                        "description": product.description,
                        "image": product.primary_image().map(|m| m.url.clone()),
                        "offers": {
                            "@type": "Offer",
                            "price": product.price,
                            "priceCurrency": "EUR",
                        },
                    })
                })
                .collect();
            json!({
                "@type": "MenuSection",
                "name": section.name,
                "description": section.description,
                "hasMenuItem": items,
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "Menu",
        "name": "Menu Food en K",
        "description": "Nos burgers artisanaux et accompagnements",
        "hasMenuSection": sections,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use url::Url;

    const SITE: &str = "https://food-en-k.com";

    #[test]
    fn test_default_meta() {
        let meta = PageMeta::resolve(&SeoData::default(), SITE, "/pages/cgv");
        assert_eq!(meta.title, "Food en K - Food Truck Burger");
        assert_eq!(meta.image, "https://food-en-k.com/img/og-default.jpg");
        assert_eq!(meta.canonical, "https://food-en-k.com/pages/cgv");
        assert_eq!(meta.og_type, "website");
        assert_eq!(meta.twitter_site, "@foodenk");
        assert!(meta.keywords.is_empty());
    }

    #[test]
    fn test_page_defaults_and_overrides() {
        let meta = PageMeta::resolve(&SeoData::for_page("menus").unwrap(), SITE, "/menus");
        assert_eq!(meta.title, "Nos Menus | Food en K");
        assert!(meta.keywords.starts_with("menu, burger"));

        let custom = SeoData::page("menus", SeoData::titled("Cheese Burger").with_image("/img/cheese.jpg"));
        let meta = PageMeta::resolve(&custom, SITE, "/menus/products/cheese");
        assert_eq!(meta.title, "Cheese Burger | Food en K");
        assert_eq!(meta.image, "https://food-en-k.com/img/cheese.jpg");
        assert!(meta.description.starts_with("Découvrez nos burgers"));

        assert!(SeoData::for_page("blog").is_none());
    }

    #[test]
    fn test_breadcrumb_schema() {
        let items = vec![Breadcrumb::new("Accueil", "/"), Breadcrumb::new("Menus", "/menus")];
        let schema = breadcrumb_schema(&items, SITE);
        assert_eq!(schema["@type"], "BreadcrumbList");
        assert_eq!(schema["itemListElement"][1]["position"], 2);
        assert_eq!(schema["itemListElement"][1]["item"], "https://food-en-k.com/menus");
    }

    #[test]
    fn test_local_business_schema() {
        let config = crate::config::test_config(Url::parse("http://localhost:1337").unwrap());
        let schema = local_business_schema(&config);
        assert_eq!(schema["@type"], "LocalBusiness");
        assert_eq!(schema["priceRange"], "€€");
        assert_eq!(schema["openingHours"].as_array().unwrap().len(), 3);
        assert_eq!(schema["telephone"], config.contact.phone);
    }

    #[test]
    fn test_script_json_escapes_closing_tags() {
        let value = json!({ "name": "</script><script>alert(1)" });
        assert!(!to_script_json(&value).contains("</script>"));
    }
}
