//! Records mirroring the content backend schema.
//!
//! Every collection type served by the CMS carries the same bookkeeping
//! fields (`documentId`, timestamps), grouped here in [`EntityMeta`] and
//! flattened into each record. Timestamps are optional so that built-in
//! fallback content can be constructed in code.
//!
//! Optional relations and arrays are frequently `null` or missing when the
//! request did not `populate` them; they deserialize to empty vectors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{
    CategoryId, CoverageId, EventServiceId, IngredientId, InfoId, LocationId, MediaId, MenuId,
    PartnerId, Price, ProductId, Severity,
};

/// Treat `null` as the type's default (empty vec, empty string).
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Bookkeeping fields shared by all CMS collection entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMeta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub document_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl EntityMeta {
    /// Meta for an entry built in code, identified by a stable document id.
    #[must_use]
    pub fn fallback(document_id: &str) -> Self {
        Self {
            document_id: document_id.to_owned(),
            ..Self::default()
        }
    }

    /// Whether the entry has been published.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}

// =============================================================================
// Media
// =============================================================================

/// One resized rendition of an uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFormat {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Renditions generated by the CMS upload plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaFormats {
    #[serde(default)]
    pub thumbnail: Option<MediaFormat>,
    #[serde(default)]
    pub small: Option<MediaFormat>,
    #[serde(default)]
    pub medium: Option<MediaFormat>,
    #[serde(default)]
    pub large: Option<MediaFormat>,
}

/// An uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: MediaId,
    pub url: String,
    #[serde(default)]
    pub alternative_text: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub formats: Option<MediaFormats>,
}

impl Media {
    /// Alt text, falling back to the file name.
    #[must_use]
    pub fn alt(&self) -> &str {
        self.alternative_text
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("")
    }
}

// =============================================================================
// Menu content
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<Media>,
}

impl Category {
    /// Reference form embedded in products.
    #[must_use]
    pub fn to_ref(&self) -> CategoryRef {
        CategoryRef {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// The category fields populated on a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// An ingredient of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    #[serde(default)]
    pub is_allergen: Option<bool>,
}

impl Ingredient {
    #[must_use]
    pub fn is_allergen(&self) -> bool {
        self.is_allergen.unwrap_or(false)
    }
}

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub available: Option<bool>,
    pub slug: String,
    #[serde(default)]
    pub is_vegetarian: Option<bool>,
    #[serde(default)]
    pub is_vegan: Option<bool>,
    #[serde(default)]
    pub is_gluten_free: Option<bool>,
    #[serde(default)]
    pub is_new: Option<bool>,
    #[serde(default)]
    pub is_popular: Option<bool>,
    /// Minutes.
    #[serde(default)]
    pub preparation_time: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Media>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

impl Product {
    /// Unit price in euros.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::eur(self.price)
    }

    /// Only an explicit `false` marks a product unavailable.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.available == Some(false)
    }

    #[must_use]
    pub fn is_vegetarian(&self) -> bool {
        self.is_vegetarian.unwrap_or(false)
    }

    #[must_use]
    pub fn is_vegan(&self) -> bool {
        self.is_vegan.unwrap_or(false)
    }

    #[must_use]
    pub fn is_gluten_free(&self) -> bool {
        self.is_gluten_free.unwrap_or(false)
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        self.is_new.unwrap_or(false)
    }

    #[must_use]
    pub fn is_popular(&self) -> bool {
        self.is_popular.unwrap_or(false)
    }

    /// First image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&Media> {
        self.images.first().filter(|m| !m.url.is_empty())
    }
}

/// A named set of products, e.g. the lunch menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: MenuId,
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub image: Option<Media>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<Product>,
}

// =============================================================================
// Events & partners
// =============================================================================

/// A catering offer for private or professional events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventService {
    pub id: EventServiceId,
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(default)]
    pub min_guests: Option<u32>,
    #[serde(default)]
    pub max_guests: Option<u32>,
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Hours.
    #[serde(default)]
    pub duration: Option<u32>,
}

/// A department the truck travels to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub id: CoverageId,
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub department: String,
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cities: Vec<String>,
}

/// How to reach a partner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// A local producer supplying the truck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalPartner {
    pub id: PartnerId,
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub description: String,
    pub address: String,
    pub specialty: String,
    /// Year the partnership started, as entered in the CMS.
    pub partner_since: String,
    #[serde(default)]
    pub logo: Option<Media>,
    #[serde(default)]
    pub is_exclusive: bool,
    #[serde(default)]
    pub contact_info: Option<ContactInfo>,
}

// =============================================================================
// Page furniture
// =============================================================================

/// Small label shown above a hero title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroBadge {
    pub text: String,
    pub icon: String,
}

/// Call-to-action button in a hero section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroLink {
    pub label: String,
    pub to: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub trailing_icon: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

/// Hero section content for one page (`home`, `event`, `menu`, `contact`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub page: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub badge: Option<HeroBadge>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<HeroLink>,
}

/// Info banner managed in the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub id: InfoId,
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: Severity,
    #[serde(default)]
    pub is_active: bool,
}

/// A place and time slot where the truck parks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
    #[serde(default)]
    pub image: Option<Media>,
}

/// Site-wide alert configured in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Severity,
    pub title: String,
    pub message: String,
    pub is_active: bool,
    /// Lower shows first.
    pub priority: i32,
    pub dismissible: bool,
}

/// Photo in the home page gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: u32,
    pub url: String,
    pub alt: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_from_cms_json() {
        let product: Product = serde_json::from_value(json!({
            "id": 12,
            "documentId": "abc123",
            "createdAt": "2025-06-01T10:00:00.000Z",
            "updatedAt": "2025-06-02T10:00:00.000Z",
            "publishedAt": "2025-06-02T10:00:00.000Z",
            "name": "Le Breizh",
            "description": null,
            "price": 12.5,
            "available": true,
            "slug": "le-breizh",
            "isVegetarian": null,
            "images": null,
            "ingredients": [{ "id": 1, "name": "Cheddar", "isAllergen": true }],
            "category": { "id": 3, "name": "Burgers", "slug": "burgers" }
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::new(12));
        assert_eq!(product.meta.document_id, "abc123");
        assert!(product.meta.is_published());
        assert_eq!(product.unit_price().compact(), "12,50€");
        assert!(!product.is_vegetarian());
        assert!(product.images.is_empty());
        assert!(product.ingredients[0].is_allergen());
        assert_eq!(product.category.unwrap().slug, "burgers");
    }

    #[test]
    fn test_product_availability_defaults_to_available() {
        let product: Product = serde_json::from_value(json!({
            "id": 1, "name": "Frites", "price": 3, "slug": "frites"
        }))
        .unwrap();
        assert!(!product.is_unavailable());
        assert!(!product.meta.is_published());
    }

    #[test]
    fn test_location_mixed_case_fields() {
        let location: Location = serde_json::from_value(json!({
            "id": 4,
            "documentId": "b-com",
            "name": "B-Com",
            "address": "1219 Avenue des Champs Blancs",
            "city": "Cesson-Sévigné",
            "postal_code": "35510",
            "latitude": 48.12,
            "longitude": -1.6,
            "start_time": "11:30:00.000",
            "end_time": "14:00:00.000",
            "isActive": true
        }))
        .unwrap();
        assert!(location.is_active);
        assert_eq!(location.postal_code, "35510");
    }

    #[test]
    fn test_info_type_field() {
        let info: Info = serde_json::from_value(json!({
            "id": 1, "title": "Fermeture", "message": "Fermé lundi",
            "type": "warning", "isActive": true
        }))
        .unwrap();
        assert_eq!(info.kind, Severity::Warning);
    }

    #[test]
    fn test_media_alt_falls_back_to_name() {
        let media: Media = serde_json::from_value(json!({
            "id": 9, "url": "/uploads/burger.jpg", "name": "burger.jpg"
        }))
        .unwrap();
        assert_eq!(media.alt(), "burger.jpg");
    }
}
