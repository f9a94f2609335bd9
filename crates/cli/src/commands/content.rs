//! Markdown page checks.

use std::path::Path;

use food_en_k_storefront::content::{ContentError, ContentStore, Placeholders};

/// Load every page in `dir` and log what was found.
///
/// Placeholders are left as is, so a page that only renders with the real
/// configuration still passes.
///
/// # Errors
///
/// Returns the first page that fails to read or parse.
pub fn check(dir: &Path) -> Result<(), ContentError> {
    tracing::info!("Checking pages in {}", dir.display());
    let store = ContentStore::load(dir, &Placeholders::new())?;

    if store.is_empty() {
        tracing::warn!("No pages found");
        return Ok(());
    }

    for page in store.footer_pages() {
        tracing::info!(
            slug = %page.slug,
            order = page.meta.order,
            "Footer page: {}",
            page.meta.title
        );
    }
    tracing::info!(pages = store.len(), "All pages parsed");
    Ok(())
}
