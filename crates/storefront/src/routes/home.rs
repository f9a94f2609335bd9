//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use chrono::Datelike;
use food_en_k_core::entity::{GalleryImage, HeroContent, Info, LocalPartner};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::{ImageView, PageContext, ProductCard};
use crate::cms::media::{self, Breakpoint, Layout};
use crate::filters;
use crate::middleware::CspNonce;
use crate::services::banner::{Banner, static_banner};
use crate::services::featured::{self, FeaturedBadge};
use crate::services::gallery::gallery_images;
use crate::services::hero::{HeroPage, fetch_heroes};
use crate::services::info::fetch_infos;
use crate::services::partners::{self, fetch_partners};
use crate::services::seo::{self, SeoData};
use crate::state::AppState;

/// The burger of the moment.
pub struct FeaturedView {
    pub card: ProductCard,
    pub ingredients: Vec<String>,
    pub badges: Vec<FeaturedBadge>,
}

/// A partner card.
pub struct PartnerView {
    pub name: String,
    pub description: String,
    pub address: String,
    pub specialty: String,
    pub since: String,
    pub badge_color: &'static str,
    pub icon: &'static str,
    pub exclusive: bool,
    pub logo: Option<ImageView>,
}

impl PartnerView {
    fn new(partner: &LocalPartner, cms_base: &str, year: i32) -> Self {
        Self {
            name: partner.name.clone(),
            description: partner.description.clone(),
            address: partner.address.clone(),
            specialty: partner.specialty.clone(),
            since: partners::partner_since_label(&partner.partner_since, year),
            badge_color: partners::badge_color(partner, year),
            icon: partners::icon(&partner.specialty),
            exclusive: partner.is_exclusive,
            logo: partner.logo.as_ref().map(|logo| {
                let props = media::image_props(
                    cms_base,
                    logo,
                    &partner.name,
                    Layout::Thumbnail,
                    Breakpoint::Thumbnail,
                );
                ImageView {
                    src: props.src,
                    alt: props.alt,
                    sizes: props.sizes,
                }
            }),
        }
    }
}

/// Info banner above the hero.
pub struct InfoView {
    pub info: Info,
    pub color: &'static str,
    pub icon: &'static str,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub hero: HeroContent,
    pub info: Option<InfoView>,
    pub banner: Banner,
    pub featured: Option<FeaturedView>,
    pub exclusive_partners: Vec<PartnerView>,
    pub partners: Vec<PartnerView>,
    pub gallery: Vec<GalleryImage>,
}

/// Display the home page.
#[instrument(skip(state, session, nonce))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let api = state.api(&session);
    let config = state.config();
    let cms_base = state.cms().base_url().to_string();

    let (heroes, featured, partner_list, infos) = tokio::join!(
        fetch_heroes(&api, &config.contact.phone),
        featured::fetch_featured(&api),
        fetch_partners(&api),
        fetch_infos(&api),
    );

    let year = chrono::Local::now().year();
    let info = infos.primary().cloned().map(|info| InfoView {
        info,
        color: infos.color().as_str(),
        icon: infos.icon(),
    });

    let featured = featured.map(|product| FeaturedView {
        card: ProductCard::new(&product, &cms_base, Layout::Hero),
        ingredients: featured::ingredients_list(&product),
        badges: featured::featured_badges(&product),
    });

    let exclusive_partners = partner_list
        .exclusive()
        .into_iter()
        .map(|p| PartnerView::new(p, &cms_base, year))
        .collect();
    let regular_partners = partner_list
        .regular()
        .into_iter()
        .map(|p| PartnerView::new(p, &cms_base, year))
        .collect();

    let seo_data = SeoData::page("home", SeoData::default());
    let ctx = PageContext::load(&state, &session, nonce, "/", &seo_data)
        .await
        .with_schema(&seo::local_business_schema(config));

    HomeTemplate {
        ctx,
        hero: heroes.page(HeroPage::Home),
        info,
        banner: static_banner(),
        featured,
        exclusive_partners,
        partners: regular_partners,
        gallery: gallery_images(),
    }
}
