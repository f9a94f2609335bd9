//! Content backend checks.
//!
//! # Environment Variables
//!
//! - `STRAPI_URL` - CMS base URL (default: <http://localhost:1337>)
//! - `STRAPI_TOKEN` - API token, when the CMS requires one

use food_en_k_storefront::cms::{CmsClient, CmsError, CollectionResponse, Query};
use food_en_k_storefront::config::{CmsConfig, ConfigError};

/// Collections the storefront reads.
const COLLECTIONS: [&str; 9] = [
    "products",
    "menus",
    "categories",
    "locations",
    "local-partners",
    "event-services",
    "coverage-areas",
    "hero-contents",
    "infos",
];

/// Errors from CMS commands.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cms(#[from] CmsError),

    #[error("{0} collection(s) could not be read")]
    Failed(usize),
}

/// Ping the CMS, then count the entries of each collection.
///
/// # Errors
///
/// Returns an error if the CMS does not answer or a collection cannot be
/// read.
pub async fn check() -> Result<(), CheckError> {
    let _ = dotenvy::dotenv();
    let config = CmsConfig::from_env()?;
    let client = CmsClient::new(&config);

    tracing::info!("Pinging {}", client.base_url());
    client.ping().await?;

    let query = Query::new().page(1, 1);
    let mut failed = 0;
    for collection in COLLECTIONS {
        match client
            .find::<serde_json::Value>(collection, &query)
            .await
        {
            Ok(CollectionResponse { data, meta }) => {
                let total = meta
                    .pagination
                    .map_or(data.len() as u64, |pagination| pagination.total);
                tracing::info!(collection, total, "Collection readable");
            }
            Err(e) => {
                failed += 1;
                tracing::error!(collection, "Collection unreadable: {e}");
            }
        }
    }

    if failed > 0 {
        return Err(CheckError::Failed(failed));
    }
    tracing::info!("CMS check passed");
    Ok(())
}
