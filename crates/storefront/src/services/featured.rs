//! "Burger du moment": the featured product on the home page.

use food_en_k_core::entity::Product;
use serde::Serialize;
use tracing::instrument;

use crate::cms::{ContentApi, FilterOp, PopulateNode, Query};

/// Category holding the featured burger.
pub const FEATURED_CATEGORY: &str = "bg-moment";

/// Ingredients shown when the CMS lists none.
pub const DEFAULT_INGREDIENTS: [&str; 6] = [
    "Buns artisanal",
    "Salade fraîche",
    "Oignons frits",
    "Cheddar premium",
    "Steak VBF",
    "Sauce secrète",
];

const MAX_INGREDIENTS: usize = 6;

/// Newest available product of the featured category.
#[instrument(skip(api))]
pub async fn fetch_featured(api: &ContentApi) -> Option<Product> {
    let query = Query::new()
        .published()
        .filter("available", FilterOp::Eq, true)
        .filter("category.slug", FilterOp::Eq, FEATURED_CATEGORY)
        .populate_tree(vec![
            PopulateNode::new("category"),
            PopulateNode::new("ingredients"),
            PopulateNode::new("images"),
        ])
        .sort(["createdAt:desc"])
        .offset(0, 1);

    api.fetch_entities::<Product>("products", &query)
        .await
        .into_data()
        .into_iter()
        .next()
}

/// Non-allergen ingredient names, at most six.
#[must_use]
pub fn ingredients_list(product: &Product) -> Vec<String> {
    if product.ingredients.is_empty() {
        return DEFAULT_INGREDIENTS.iter().map(ToString::to_string).collect();
    }
    product
        .ingredients
        .iter()
        .filter(|i| !i.is_allergen())
        .take(MAX_INGREDIENTS)
        .map(|i| i.name.clone())
        .collect()
}

/// Raw URL of the first image.
#[must_use]
pub fn product_image(product: &Product) -> Option<&str> {
    product.primary_image().map(|m| m.url.as_str())
}

/// Badge on the featured card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeaturedBadge {
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

#[must_use]
pub fn featured_badges(product: &Product) -> Vec<FeaturedBadge> {
    let mut badges = vec![FeaturedBadge {
        label: "Signature du Chef",
        color: "warning",
        icon: "i-lucide-flame",
    }];

    let diet = if product.is_vegan() {
        Some("Vegan")
    } else if product.is_vegetarian() {
        Some("Végétarien")
    } else {
        None
    };
    if let Some(label) = diet {
        badges.push(FeaturedBadge {
            label,
            color: "green",
            icon: "i-lucide-leaf",
        });
    }
    badges
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn burger(extra: serde_json::Value) -> Product {
        let mut value = json!({ "id": 7, "name": "Le Montagnard", "price": 14.9, "slug": "le-montagnard" });
        if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_default_ingredients() {
        assert_eq!(ingredients_list(&burger(json!({}))), DEFAULT_INGREDIENTS);
    }

    #[test]
    fn test_ingredients_skip_allergens_and_cap() {
        let ingredients: Vec<_> = (1..=9)
            .map(|i| json!({ "id": i, "name": format!("I{i}"), "isAllergen": i == 2 }))
            .collect();
        let list = ingredients_list(&burger(json!({ "ingredients": ingredients })));
        assert_eq!(list, vec!["I1", "I3", "I4", "I5", "I6", "I7"]);
    }

    #[test]
    fn test_badges() {
        let plain = featured_badges(&burger(json!({})));
        assert_eq!(plain.len(), 1);
        assert_eq!(plain[0].label, "Signature du Chef");

        let vegan = featured_badges(&burger(json!({ "isVegan": true, "isVegetarian": true })));
        assert_eq!(vegan[1].label, "Vegan");

        let veggie = featured_badges(&burger(json!({ "isVegetarian": true })));
        assert_eq!(veggie[1].label, "Végétarien");
    }

    #[test]
    fn test_product_image() {
        assert_eq!(product_image(&burger(json!({}))), None);
        let with_image = burger(json!({ "images": [{ "id": 1, "url": "/uploads/montagnard.jpg" }] }));
        assert_eq!(product_image(&with_image), Some("/uploads/montagnard.jpg"));
    }
}
