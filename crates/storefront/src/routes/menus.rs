//! Menu browsing and product detail route handlers.
//!
//! Filters live in the query string so every filtered view is a plain,
//! shareable URL. The filter form submits with GET and works without JS.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use food_en_k_core::entity::{HeroContent, Product};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::{ImageView, PageContext, ProductCard};
use crate::cms::media::{self, Breakpoint, Layout};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CspNonce;
use crate::services::hero::{HeroPage, fetch_heroes};
use crate::services::menu::{
    self, Breadcrumb, MenuFilters, PRICE_LIMIT, SORT_OPTIONS, fetch_categories, fetch_menus,
    fetch_product, fetch_products, filter_products,
};
use crate::services::seo::{self, MenuSection, OgType, SeoData};
use crate::state::AppState;

/// Category entry in the filter sidebar.
pub struct CategoryLink {
    pub name: String,
    pub href: String,
    pub count: usize,
    pub active: bool,
}

/// Option of the sort select.
pub struct SortChoice {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Heading for the active menu.
pub struct MenuHeading {
    pub name: String,
    pub description: String,
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menus/index.html")]
pub struct MenuIndexTemplate {
    pub ctx: PageContext,
    pub hero: HeroContent,
    pub menu: Option<MenuHeading>,
    pub filters: MenuFilters,
    pub search: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub categories: Vec<CategoryLink>,
    pub all_categories_href: String,
    pub sort_options: Vec<SortChoice>,
    pub price_limit: u32,
    pub max_price: u32,
    pub active_filters: usize,
    pub products: Vec<ProductCard>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

fn menus_href(filters: &MenuFilters) -> String {
    let query = filters.to_query_string();
    if query.is_empty() {
        "/menus".to_string()
    } else {
        format!("/menus?{query}")
    }
}

/// `Menu` structured data, one section per category present in `products`.
fn menu_sections<'a>(products: &'a [Product]) -> Vec<MenuSection<'a>> {
    let mut sections: Vec<MenuSection<'a>> = Vec::new();
    for product in products {
        let name = product.category.as_ref().map_or("Autres", |c| c.name.as_str());
        match sections.iter_mut().find(|s| s.name == name) {
            Some(section) => section.products.push(product),
            None => sections.push(MenuSection {
                name,
                description: None,
                products: vec![product],
            }),
        }
    }
    sections
}

/// Display the menu with the visitor's filters.
#[instrument(skip(state, session, nonce))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
    Query(filters): Query<MenuFilters>,
) -> impl IntoResponse {
    let api = state.api(&session);
    let config = state.config();
    let cms_base = state.cms().base_url().to_string();

    let (heroes, menus, categories, products) = tokio::join!(
        fetch_heroes(&api, &config.contact.phone),
        fetch_menus(&api),
        fetch_categories(&api),
        fetch_products(&api, None),
    );

    let filtered = filter_products(&products, &filters);
    let total = filtered.len();
    let total_pages = menu::total_pages(total);
    let page = filters.current_page().min(total_pages.max(1));

    let cards = menu::paginate(&filtered, page)
        .iter()
        .map(|p| ProductCard::new(p, &cms_base, Layout::Card))
        .collect();

    let category_links = categories
        .iter()
        .map(|c| CategoryLink {
            name: c.name.clone(),
            href: menus_href(&filters.with_category(Some(c.id))),
            count: menu::product_count_by_category(&products, c.id),
            active: filters.category == Some(c.id),
        })
        .collect();

    let sort_options = SORT_OPTIONS
        .iter()
        .map(|&(value, label)| SortChoice {
            value,
            label,
            selected: filters.sort == value,
        })
        .collect();

    let breadcrumbs = menu::breadcrumbs(&categories, filters.category);
    let seo_data = SeoData::page("menus", SeoData::default());
    let ctx = PageContext::load(&state, &session, nonce, "/menus", &seo_data)
        .await
        .with_schema(&seo::breadcrumb_schema(&breadcrumbs, &config.base_url))
        .with_schema(&seo::menu_schema(&menu_sections(&filtered)));

    MenuIndexTemplate {
        ctx,
        hero: heroes.page(HeroPage::Menu),
        menu: menu::find_active_menu(&menus).map(|m| MenuHeading {
            name: m.name.clone(),
            description: m.description.clone(),
        }),
        search: filters.search_query(),
        breadcrumbs,
        categories: category_links,
        all_categories_href: menus_href(&filters.with_category(None)),
        sort_options,
        price_limit: PRICE_LIMIT,
        max_price: filters.max_price_value(),
        active_filters: menu::active_filters_count(&filters),
        products: cards,
        total,
        page,
        total_pages,
        prev_href: (page > 1).then(|| menus_href(&filters.with_page(page - 1))),
        next_href: (page < total_pages).then(|| menus_href(&filters.with_page(page + 1))),
        filters,
    }
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "menus/product.html")]
pub struct ProductTemplate {
    pub ctx: PageContext,
    pub product: ProductCard,
    pub gallery: Vec<ImageView>,
    pub ingredients: Vec<String>,
    pub allergens: Vec<String>,
    pub breadcrumbs: Vec<Breadcrumb>,
}

/// Display one product.
///
/// # Errors
///
/// Returns 404 when no product has this slug.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let api = state.api(&session);
    let cms_base = state.cms().base_url().to_string();

    let product = fetch_product(&api, &slug)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let mut breadcrumbs = vec![Breadcrumb::new("Accueil", "/"), Breadcrumb::new("Menu", "/menus")];
    if let Some(category) = &product.category {
        breadcrumbs.push(Breadcrumb::new(
            category.name.clone(),
            format!("/menus?category={}", category.id),
        ));
    }
    breadcrumbs.push(Breadcrumb::new(
        product.name.clone(),
        format!("/menus/products/{}", product.slug),
    ));

    let gallery = product
        .images
        .iter()
        .skip(1)
        .filter(|m| !m.url.is_empty())
        .map(|m| {
            let props = media::image_props(
                &cms_base,
                m,
                &product.name,
                Layout::Gallery,
                Breakpoint::for_width(Layout::Gallery.width()),
            );
            ImageView {
                src: props.src,
                alt: props.alt,
                sizes: props.sizes,
            }
        })
        .collect();

    let (allergens, ingredients): (Vec<_>, Vec<_>) =
        product.ingredients.iter().partition(|i| i.is_allergen());

    let mut seo_data = SeoData::titled(product.name.clone());
    if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
        seo_data = seo_data.with_description(description);
    }
    if let Some(image) = product.primary_image() {
        seo_data = seo_data.with_image(media::resolve_url(&cms_base, &image.url));
    }
    seo_data.og_type = OgType::Article;

    let path = format!("/menus/products/{}", product.slug);
    let ctx = PageContext::load(&state, &session, nonce, &path, &seo_data)
        .await
        .with_schema(&seo::breadcrumb_schema(
            &breadcrumbs,
            &state.config().base_url,
        ));

    Ok(ProductTemplate {
        ctx,
        product: ProductCard::new(&product, &cms_base, Layout::Hero),
        gallery,
        ingredients: ingredients.iter().map(|i| i.name.clone()).collect(),
        allergens: allergens.iter().map(|i| i.name.clone()).collect(),
        breadcrumbs,
    })
}
