//! Menu browsing: CMS fetches plus filtering, sorting and pagination.
//!
//! The filter state travels in the query string (`/menus?q=...&category=3`),
//! so [`MenuFilters`] is deserialized straight from it.

use std::cmp::Ordering;

use food_en_k_core::entity::{Category, Menu, Product};
use food_en_k_core::{CategoryId, MenuId, Severity};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;

use crate::cms::{ContentApi, PopulateNode, Query};

/// Products per page.
pub const ITEMS_PER_PAGE: usize = 12;

/// Price slider maximum; at this value the price filter is off.
pub const PRICE_LIMIT: u32 = 20;

/// Longest search query kept.
pub const MAX_SEARCH_LENGTH: usize = 100;

const DEFAULT_SORT: &str = "name-asc";

// =============================================================================
// Fetching
// =============================================================================

fn product_relations() -> Vec<PopulateNode> {
    vec![
        PopulateNode::new("category"),
        PopulateNode::new("ingredients"),
        PopulateNode::new("images"),
    ]
}

/// Published menus with their products, active menus first.
#[instrument(skip(api))]
pub async fn fetch_menus(api: &ContentApi) -> Vec<Menu> {
    let products = product_relations()
        .into_iter()
        .fold(PopulateNode::new("products"), PopulateNode::with);
    let query = Query::new()
        .published()
        .populate_tree(vec![products])
        .sort(["isActive:desc", "createdAt:desc"]);

    api.fetch_entities("menus", &query).await.into_data()
}

/// Published categories.
#[instrument(skip(api))]
pub async fn fetch_categories(api: &ContentApi) -> Vec<Category> {
    let query = Query::new().published().sort(["name:asc"]);
    api.fetch_entities("categories", &query).await.into_data()
}

/// Published products, newest first, optionally limited to one category.
#[instrument(skip(api))]
pub async fn fetch_products(api: &ContentApi, category_slug: Option<&str>) -> Vec<Product> {
    let mut query = Query::new().published();
    if let Some(slug) = category_slug.filter(|s| !s.is_empty()) {
        query = query.filter("category.slug", crate::cms::FilterOp::Eq, slug);
    }
    let query = query
        .populate_tree(product_relations())
        .sort(["createdAt:desc"]);

    api.fetch_entities("products", &query).await.into_data()
}

/// A published product by slug.
#[instrument(skip(api))]
pub async fn fetch_product(api: &ContentApi, slug: &str) -> Option<Product> {
    let query = Query::new()
        .published()
        .filter("slug", crate::cms::FilterOp::Eq, slug)
        .populate_tree(product_relations())
        .offset(0, 1);

    api.fetch_entities::<Product>("products", &query)
        .await
        .into_data()
        .into_iter()
        .next()
}

// =============================================================================
// Filters
// =============================================================================

/// Checkbox values: present and not "false"/"0"/"off".
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.is_some_and(|v| !matches!(v.trim(), "" | "false" | "0" | "off")))
}

/// Empty or unparsable values become `None`.
fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.trim().parse().ok()))
}

/// Visitor-selected filters for the menu page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MenuFilters {
    #[serde(rename = "q")]
    pub search: String,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub category: Option<CategoryId>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub max_price: Option<u32>,
    #[serde(deserialize_with = "deserialize_flag")]
    pub vegetarian: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub vegan: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub gluten_free: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub available: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_new: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub popular: bool,
    pub sort: String,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub page: Option<usize>,
}

impl Default for MenuFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            max_price: None,
            vegetarian: false,
            vegan: false,
            gluten_free: false,
            available: false,
            is_new: false,
            popular: false,
            sort: DEFAULT_SORT.to_string(),
            page: None,
        }
    }
}

impl MenuFilters {
    /// Price ceiling in euros, `None` when the slider is at its maximum.
    #[must_use]
    pub fn price_ceiling(&self) -> Option<u32> {
        self.max_price.filter(|p| *p < PRICE_LIMIT)
    }

    /// Slider position for the template.
    #[must_use]
    pub fn max_price_value(&self) -> u32 {
        self.max_price.unwrap_or(PRICE_LIMIT).min(PRICE_LIMIT)
    }

    /// Requested page, 1-based.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Search text after [`sanitize_search_query`].
    #[must_use]
    pub fn search_query(&self) -> String {
        sanitize_search_query(&self.search)
    }

    /// Filters with the category changed and the page reset, for links.
    #[must_use]
    pub fn with_category(&self, category: Option<CategoryId>) -> Self {
        Self {
            category,
            page: None,
            ..self.clone()
        }
    }

    /// Same filters on another page.
    #[must_use]
    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }

    /// Query string reproducing these filters, without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        let search = self.search_query();
        if !search.is_empty() {
            pairs.push(("q", search));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(price) = self.price_ceiling() {
            pairs.push(("max_price", price.to_string()));
        }
        for (key, on) in [
            ("vegetarian", self.vegetarian),
            ("vegan", self.vegan),
            ("gluten_free", self.gluten_free),
            ("available", self.available),
            ("is_new", self.is_new),
            ("popular", self.popular),
        ] {
            if on {
                pairs.push((key, "on".to_string()));
            }
        }
        if self.sort != DEFAULT_SORT && !self.sort.is_empty() {
            pairs.push(("sort", self.sort.clone()));
        }
        if let Some(page) = self.page.filter(|p| *p > 1) {
            pairs.push(("page", page.to_string()));
        }

        pairs
            .into_iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(&v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Trim and cap a search query.
#[must_use]
pub fn sanitize_search_query(query: &str) -> String {
    query.trim().chars().take(MAX_SEARCH_LENGTH).collect()
}

/// Number of filters differing from the defaults, for the filter badge.
#[must_use]
pub fn active_filters_count(filters: &MenuFilters) -> usize {
    [
        !filters.search_query().is_empty(),
        filters.price_ceiling().is_some(),
        filters.vegetarian,
        filters.vegan,
        filters.available,
        filters.category.is_some(),
    ]
    .into_iter()
    .filter(|active| *active)
    .count()
}

fn matches_search(product: &Product, query: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(query);
    contains(&product.name)
        || product.description.as_deref().is_some_and(contains)
        || product.category.as_ref().is_some_and(|c| contains(&c.name))
        || product.ingredients.iter().any(|i| contains(&i.name))
}

/// Apply every filter and the requested sort.
#[must_use]
pub fn filter_products(products: &[Product], filters: &MenuFilters) -> Vec<Product> {
    let query = filters.search_query().to_lowercase();
    let ceiling = filters.price_ceiling().map(Decimal::from);

    let mut filtered: Vec<Product> = products
        .iter()
        .filter(|p| {
            filters
                .category
                .is_none_or(|id| p.category.as_ref().is_some_and(|c| c.id == id))
        })
        .filter(|p| query.is_empty() || matches_search(p, &query))
        .filter(|p| ceiling.is_none_or(|max| p.price <= max))
        .filter(|p| !filters.vegetarian || p.is_vegetarian())
        .filter(|p| !filters.vegan || p.is_vegan())
        .filter(|p| !filters.gluten_free || p.is_gluten_free())
        .filter(|p| !filters.available || !p.is_unavailable())
        .filter(|p| !filters.is_new || p.is_new())
        .filter(|p| !filters.popular || p.is_popular())
        .cloned()
        .collect();

    if let Some(sort) = SortOrder::parse(&filters.sort) {
        filtered.sort_by(|a, b| sort.compare(a, b));
    }
    filtered
}

// =============================================================================
// Sorting
// =============================================================================

/// Sortable product field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Price,
    CreatedAt,
    PreparationTime,
}

/// A `field-order` sort such as `price-desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl SortOrder {
    /// Parse `field-asc` / `field-desc`. Unknown fields disable sorting.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (field, order) = value.trim().rsplit_once('-')?;
        let field = match field {
            "name" => SortField::Name,
            "price" => SortField::Price,
            "createdAt" | "created_at" => SortField::CreatedAt,
            "preparationTime" | "preparation_time" => SortField::PreparationTime,
            _ => return None,
        };
        let descending = match order {
            "asc" => false,
            "desc" => true,
            _ => return None,
        };
        Some(Self { field, descending })
    }

    /// Missing values sort last whatever the direction.
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
            match (a, b) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) if descending => b.cmp(&a),
                (Some(a), Some(b)) => a.cmp(&b),
            }
        }

        match self.field {
            SortField::Name => nulls_last(
                Some(a.name.to_lowercase()),
                Some(b.name.to_lowercase()),
                self.descending,
            ),
            SortField::Price => nulls_last(Some(a.price), Some(b.price), self.descending),
            SortField::CreatedAt => {
                nulls_last(a.meta.created_at, b.meta.created_at, self.descending)
            }
            SortField::PreparationTime => {
                nulls_last(a.preparation_time, b.preparation_time, self.descending)
            }
        }
    }
}

/// Sort choices offered on the menu page.
pub const SORT_OPTIONS: [(&str, &str); 6] = [
    ("name-asc", "Nom (A-Z)"),
    ("name-desc", "Nom (Z-A)"),
    ("price-asc", "Prix croissant"),
    ("price-desc", "Prix décroissant"),
    ("createdAt-desc", "Nouveautés"),
    ("preparationTime-asc", "Préparation la plus rapide"),
];

// =============================================================================
// Pagination
// =============================================================================

/// Items of the 1-based `page`.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize) -> &[T] {
    let start = page.max(1).saturating_sub(1).saturating_mul(ITEMS_PER_PAGE);
    let end = start.saturating_add(ITEMS_PER_PAGE).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

/// Number of pages for `count` items.
#[must_use]
pub const fn total_pages(count: usize) -> usize {
    count.div_ceil(ITEMS_PER_PAGE)
}

// =============================================================================
// Presentation helpers
// =============================================================================

/// A breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub to: String,
}

impl Breadcrumb {
    #[must_use]
    pub fn new(label: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            to: to.into(),
        }
    }
}

/// Accueil / Menu, plus the selected category.
#[must_use]
pub fn breadcrumbs(categories: &[Category], selected: Option<CategoryId>) -> Vec<Breadcrumb> {
    let mut links = vec![Breadcrumb::new("Accueil", "/"), Breadcrumb::new("Menu", "/menus")];
    if let Some(category) = selected.and_then(|id| categories.iter().find(|c| c.id == id)) {
        links.push(Breadcrumb::new(
            category.name.clone(),
            format!("/menus?category={}", category.id),
        ));
    }
    links
}

/// Categories that still have products after filtering.
#[must_use]
pub fn categories_with_products<'a>(
    categories: &'a [Category],
    filtered: &[Product],
) -> Vec<&'a Category> {
    categories
        .iter()
        .filter(|c| {
            filtered
                .iter()
                .any(|p| p.category.as_ref().is_some_and(|pc| pc.id == c.id))
        })
        .collect()
}

#[must_use]
pub fn product_count_by_category(products: &[Product], category: CategoryId) -> usize {
    products
        .iter()
        .filter(|p| p.category.as_ref().is_some_and(|c| c.id == category))
        .count()
}

/// Feature lines shown on a product card.
#[must_use]
pub fn product_features(product: &Product) -> Vec<String> {
    let mut features = Vec::new();

    if let Some(category) = &product.category {
        features.push(category.name.clone());
    }

    if product.ingredients.is_empty() {
        features.push("✨ Recette artisanale".to_string());
        features.push("👨‍🍳 Préparé avec soin".to_string());
    } else {
        let allergens: Vec<&str> = product
            .ingredients
            .iter()
            .filter(|i| i.is_allergen())
            .map(|i| i.name.as_str())
            .collect();
        if !allergens.is_empty() {
            features.push(format!("⚠️ Allergènes: {}", allergens.join(", ")));
        }

        let main: Vec<&str> = product
            .ingredients
            .iter()
            .filter(|i| !i.is_allergen())
            .take(10)
            .map(|i| i.name.as_str())
            .collect();
        if !main.is_empty() {
            features.push(main.join(", "));
        }
    }

    if features.len() < 2 {
        features.push("🥘 Plat signature".to_string());
    }
    features
}

/// Badge on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProductBadge {
    pub label: &'static str,
    pub color: Severity,
}

#[must_use]
pub fn product_badge(product: &Product) -> Option<ProductBadge> {
    if product.is_unavailable() {
        Some(ProductBadge {
            label: "Indisponible",
            color: Severity::Error,
        })
    } else if product.is_vegan() {
        Some(ProductBadge {
            label: "Vegan",
            color: Severity::Success,
        })
    } else if product.is_vegetarian() {
        Some(ProductBadge {
            label: "Végétarien",
            color: Severity::Success,
        })
    } else {
        None
    }
}

/// The active menu, or the first one.
#[must_use]
pub fn find_active_menu(menus: &[Menu]) -> Option<&Menu> {
    menus.iter().find(|m| m.is_active).or_else(|| menus.first())
}

/// Option of the menu selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuOption {
    pub label: String,
    pub value: MenuId,
}

#[must_use]
pub fn menu_options(menus: &[Menu]) -> Vec<MenuOption> {
    menus
        .iter()
        .map(|m| MenuOption {
            label: m.name.clone(),
            value: m.id,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(id: i64, name: &str, price: &str, category: i64) -> Product {
        let category_name = if category == 1 { "Burgers" } else { "Desserts" };
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "price": price.parse::<f64>().unwrap(),
            "slug": name.to_lowercase(),
            "available": true,
            "category": { "id": category, "name": category_name, "slug": "c" }
        }))
        .unwrap()
    }

    fn catalog() -> Vec<Product> {
        let mut veggie = product(1, "Le Potager", "11.5", 1);
        veggie.is_vegetarian = Some(true);
        veggie.description = Some("Galette de légumes".to_string());
        let mut breizh = product(2, "le Breizh", "13", 1);
        breizh.ingredients = serde_json::from_value(json!([
            { "id": 1, "name": "Andouille", "isAllergen": false },
            { "id": 2, "name": "Moutarde", "isAllergen": true }
        ]))
        .unwrap();
        let mut tiramisu = product(3, "Tiramisu", "5", 2);
        tiramisu.available = Some(false);
        vec![veggie, breizh, tiramisu]
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_filters_from_query_string() {
        let filters: MenuFilters = serde_urlencoded_like(
            "q=breizh&category=&max_price=15&vegetarian=on&page=2",
        );
        assert_eq!(filters.search, "breizh");
        assert_eq!(filters.category, None);
        assert_eq!(filters.price_ceiling(), Some(15));
        assert!(filters.vegetarian);
        assert!(!filters.vegan);
        assert_eq!(filters.current_page(), 2);
        assert_eq!(filters.sort, "name-asc");
    }

    /// Decode through the same path axum's `Query` uses.
    fn serde_urlencoded_like(qs: &str) -> MenuFilters {
        let uri: axum::http::Uri = format!("/menus?{qs}").parse().unwrap();
        axum::extract::Query::<MenuFilters>::try_from_uri(&uri)
            .unwrap()
            .0
    }

    #[test]
    fn test_default_sort_is_case_insensitive_name() {
        let filtered = filter_products(&catalog(), &MenuFilters::default());
        assert_eq!(names(&filtered), vec!["le Breizh", "Le Potager", "Tiramisu"]);
    }

    #[test]
    fn test_search_matches_ingredients_and_description() {
        let filters = MenuFilters {
            search: "  ANDOUILLE ".into(),
            ..MenuFilters::default()
        };
        assert_eq!(names(&filter_products(&catalog(), &filters)), vec!["le Breizh"]);

        let filters = MenuFilters {
            search: "légumes".into(),
            ..MenuFilters::default()
        };
        assert_eq!(names(&filter_products(&catalog(), &filters)), vec!["Le Potager"]);

        let filters = MenuFilters {
            search: "dessert".into(),
            ..MenuFilters::default()
        };
        assert_eq!(names(&filter_products(&catalog(), &filters)), vec!["Tiramisu"]);
    }

    #[test]
    fn test_category_price_and_flags() {
        let filters = MenuFilters {
            category: Some(CategoryId::new(1)),
            max_price: Some(12),
            ..MenuFilters::default()
        };
        assert_eq!(names(&filter_products(&catalog(), &filters)), vec!["Le Potager"]);

        let filters = MenuFilters {
            max_price: Some(20),
            available: true,
            ..MenuFilters::default()
        };
        assert_eq!(filter_products(&catalog(), &filters).len(), 2);

        let filters = MenuFilters {
            vegetarian: true,
            ..MenuFilters::default()
        };
        assert_eq!(names(&filter_products(&catalog(), &filters)), vec!["Le Potager"]);
    }

    #[test]
    fn test_sort_price_desc_and_nulls_last() {
        let filters = MenuFilters {
            sort: "price-desc".into(),
            ..MenuFilters::default()
        };
        assert_eq!(
            names(&filter_products(&catalog(), &filters)),
            vec!["le Breizh", "Le Potager", "Tiramisu"]
        );

        let mut products = catalog();
        products[0].preparation_time = Some(12);
        products[2].preparation_time = Some(4);
        for descending in [false, true] {
            let sort = if descending { "preparationTime-desc" } else { "preparationTime-asc" };
            let filters = MenuFilters {
                sort: sort.into(),
                ..MenuFilters::default()
            };
            let sorted = filter_products(&products, &filters);
            assert_eq!(sorted[2].name, "le Breizh");
        }
    }

    #[test]
    fn test_unknown_sort_keeps_order() {
        assert_eq!(SortOrder::parse("rating-asc"), None);
        assert_eq!(SortOrder::parse("name"), None);
        let filters = MenuFilters {
            sort: "rating-asc".into(),
            ..MenuFilters::default()
        };
        assert_eq!(
            names(&filter_products(&catalog(), &filters)),
            vec!["Le Potager", "le Breizh", "Tiramisu"]
        );
    }

    #[test]
    fn test_pagination() {
        let items: Vec<u32> = (0..30).collect();
        assert_eq!(paginate(&items, 1).len(), 12);
        assert_eq!(paginate(&items, 3), &[24, 25, 26, 27, 28, 29]);
        assert!(paginate(&items, 4).is_empty());
        assert_eq!(paginate(&items, 0)[0], 0);
        assert_eq!(total_pages(30), 3);
        assert_eq!(total_pages(0), 0);
    }

    #[test]
    fn test_active_filters_count() {
        assert_eq!(active_filters_count(&MenuFilters::default()), 0);
        let filters = MenuFilters {
            search: "  ".into(),
            max_price: Some(20),
            vegan: true,
            category: Some(CategoryId::new(2)),
            ..MenuFilters::default()
        };
        assert_eq!(active_filters_count(&filters), 2);
    }

    #[test]
    fn test_query_string_round_trip_of_links() {
        let filters = MenuFilters {
            search: "bœuf épicé".into(),
            vegan: true,
            sort: "price-asc".into(),
            ..MenuFilters::default()
        };
        let qs = filters.with_page(2).to_query_string();
        assert_eq!(qs, "q=b%C5%93uf%20%C3%A9pic%C3%A9&vegan=on&sort=price-asc&page=2");
        assert_eq!(serde_urlencoded_like(&qs).with_page(2), filters.with_page(2));
    }

    #[test]
    fn test_breadcrumbs() {
        let categories: Vec<Category> = serde_json::from_value(json!([
            { "id": 1, "name": "Burgers", "slug": "burgers" }
        ]))
        .unwrap();
        let links = breadcrumbs(&categories, Some(CategoryId::new(1)));
        assert_eq!(links.len(), 3);
        assert_eq!(links[2].to, "/menus?category=1");
        assert_eq!(breadcrumbs(&categories, Some(CategoryId::new(9))).len(), 2);
    }

    #[test]
    fn test_product_features() {
        let products = catalog();
        assert_eq!(
            product_features(&products[1]),
            vec!["Burgers", "⚠️ Allergènes: Moutarde", "Andouille"]
        );
        assert_eq!(
            product_features(&products[0]),
            vec!["Burgers", "✨ Recette artisanale", "👨‍🍳 Préparé avec soin"]
        );

        let mut plain = products[1].clone();
        plain.category = None;
        plain.ingredients.truncate(1);
        assert_eq!(product_features(&plain), vec!["Andouille", "🥘 Plat signature"]);
    }

    #[test]
    fn test_product_badge() {
        let products = catalog();
        assert_eq!(product_badge(&products[0]).unwrap().label, "Végétarien");
        assert_eq!(product_badge(&products[1]), None);
        assert_eq!(product_badge(&products[2]).unwrap().color, Severity::Error);
    }

    #[test]
    fn test_categories_and_counts() {
        let categories: Vec<Category> = serde_json::from_value(json!([
            { "id": 1, "name": "Burgers", "slug": "burgers" },
            { "id": 2, "name": "Desserts", "slug": "desserts" }
        ]))
        .unwrap();
        let products = catalog();
        assert_eq!(product_count_by_category(&products, CategoryId::new(1)), 2);

        let filters = MenuFilters {
            category: Some(CategoryId::new(2)),
            ..MenuFilters::default()
        };
        let filtered = filter_products(&products, &filters);
        let with_products = categories_with_products(&categories, &filtered);
        assert_eq!(with_products.len(), 1);
        assert_eq!(with_products[0].name, "Desserts");
    }

    #[test]
    fn test_active_menu_and_options() {
        let menus: Vec<Menu> = serde_json::from_value(json!([
            { "id": 1, "name": "Hiver", "isActive": false },
            { "id": 2, "name": "Été", "isActive": true }
        ]))
        .unwrap();
        assert_eq!(find_active_menu(&menus).unwrap().name, "Été");
        assert_eq!(find_active_menu(&menus[..1]).unwrap().name, "Hiver");
        assert!(find_active_menu(&[]).is_none());
        assert_eq!(menu_options(&menus)[1].value, MenuId::new(2));
    }

    #[test]
    fn test_sanitize_search_query() {
        assert_eq!(sanitize_search_query("  frites "), "frites");
        assert_eq!(sanitize_search_query(&"é".repeat(150)).chars().count(), 100);
    }
}
