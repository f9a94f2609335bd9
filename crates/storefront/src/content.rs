//! Markdown content pages (legal notices, terms of sale, privacy policy).
//!
//! This module loads markdown files from the `content/pages` directory at
//! startup, parses frontmatter metadata, and renders markdown to HTML.
//!
//! # Placeholders
//!
//! Contact details that live in configuration can be referenced from the
//! markdown so the pages never drift from the rest of the site:
//!
//! ```markdown
//! Contact : {{contact_email}} / {{contact_phone}}
//! ```
//!
//! Supported keys are `restaurant_name`, `contact_email`, `contact_phone`
//! and `site_url`. Unknown keys are left as written.

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use food_en_k_core::format_french_phone;
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Metadata for static pages
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
    /// Show the page in the footer's legal links.
    #[serde(default)]
    pub footer: bool,
    /// Ordering among footer links, lowest first.
    #[serde(default)]
    pub order: i32,
}

/// A rendered page with metadata and HTML content
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// Values substituted for `{{key}}` placeholders.
#[derive(Debug, Clone, Default)]
pub struct Placeholders(HashMap<String, String>);

impl Placeholders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Placeholders filled from the storefront configuration.
    #[must_use]
    pub fn from_config(config: &crate::config::StorefrontConfig) -> Self {
        Self::new()
            .with("restaurant_name", config.contact.restaurant_name.clone())
            .with("contact_email", config.contact.email.clone())
            .with("contact_phone", format_french_phone(&config.contact.phone))
            .with("site_url", config.base_url.clone())
    }
}

/// Content store that holds all loaded pages in memory
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Load all content from the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the pages directory exists but cannot be read.
    pub fn load(content_dir: &Path, placeholders: &Placeholders) -> Result<Self, ContentError> {
        let pages = Self::load_pages(&content_dir.join("pages"), placeholders)?;

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    /// Load all pages from the pages directory
    fn load_pages(
        dir: &Path,
        placeholders: &Placeholders,
    ) -> Result<HashMap<String, Page>, ContentError> {
        let mut pages = HashMap::new();

        if !dir.exists() {
            tracing::warn!("Pages directory does not exist: {:?}", dir);
            return Ok(pages);
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match Self::load_page(&path, placeholders) {
                    Ok(page) => {
                        tracing::info!("Loaded page: {}", page.slug);
                        pages.insert(page.slug.clone(), page);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load page {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(pages)
    }

    /// Load a single page from a markdown file
    fn load_page(path: &Path, placeholders: &Placeholders) -> Result<Page, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
            .to_string();

        parse_page(&slug, &content, placeholders)
    }

    /// Get a page by slug
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    /// Get a page by slug or fail with [`ContentError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns an error if no page has this slug.
    pub fn require_page(&self, slug: &str) -> Result<&Page, ContentError> {
        self.get_page(slug)
            .ok_or_else(|| ContentError::NotFound(slug.to_string()))
    }

    /// Pages flagged for the footer, in display order.
    #[must_use]
    pub fn footer_pages(&self) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self.pages.values().filter(|p| p.meta.footer).collect();
        pages.sort_by(|a, b| {
            a.meta
                .order
                .cmp(&b.meta.order)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        pages
    }

    /// Number of loaded pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Parse frontmatter and render one page.
fn parse_page(slug: &str, content: &str, placeholders: &Placeholders) -> Result<Page, ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<PageMeta> = matter
        .parse(content)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    let content_html = render_markdown(&substitute_placeholders(&parsed.content, placeholders));

    Ok(Page {
        slug: slug.to_string(),
        meta,
        content_html,
    })
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());
    options.extension.footnotes = true;

    // Pages are authored in the repository, raw HTML is allowed
    options.render.r#unsafe = true;

    markdown_to_html(content, &options)
}

/// Matches `{{key}}`, with optional inner spaces.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("Invalid regex"));

fn substitute_placeholders(content: &str, placeholders: &Placeholders) -> String {
    PLACEHOLDER_RE
        .replace_all(content, |caps: &regex::Captures| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            caps.get(1)
                .and_then(|key| placeholders.0.get(key.as_str()))
                .map_or_else(|| whole.to_string(), Clone::clone)
        })
        .into_owned()
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Page not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const CGV: &str = "---\ntitle: Conditions générales de vente\ndescription: CGV du food truck\nupdated_at: 2025-06-01\nfooter: true\norder: 3\n---\n\n# CGV\n\nContact : {{contact_email}}, {{ unknown }}\n";

    fn placeholders() -> Placeholders {
        Placeholders::new().with("contact_email", "contact@food-en-k.com")
    }

    #[test]
    fn test_parse_page_frontmatter() {
        let page = parse_page("cgv", CGV, &placeholders()).unwrap();
        assert_eq!(page.slug, "cgv");
        assert_eq!(page.meta.title, "Conditions générales de vente");
        assert_eq!(
            page.meta.updated_at,
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
        assert!(page.meta.footer);
        assert_eq!(page.meta.order, 3);
    }

    #[test]
    fn test_placeholders_substituted() {
        let page = parse_page("cgv", CGV, &placeholders()).unwrap();
        assert!(page.content_html.contains("contact@food-en-k.com"));
        assert!(page.content_html.contains("{{ unknown }}"));
        assert!(page.content_html.contains("<h1"));
    }

    #[test]
    fn test_missing_frontmatter_is_error() {
        let result = parse_page("x", "# Just markdown\n", &Placeholders::new());
        assert!(matches!(result, Err(ContentError::Parse(_))));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = std::env::temp_dir().join(format!("fek-content-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(dir.join("pages")).unwrap();
        std::fs::write(dir.join("pages/cgv.md"), CGV).unwrap();
        std::fs::write(
            dir.join("pages/mentions-legales.md"),
            "---\ntitle: Mentions légales\nfooter: true\norder: 1\n---\nTexte\n",
        )
        .unwrap();
        std::fs::write(dir.join("pages/notes.txt"), "ignored").unwrap();

        let store = ContentStore::load(&dir, &placeholders()).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get_page("cgv").is_some());

        let footer = store.footer_pages();
        assert_eq!(footer[0].slug, "mentions-legales");
        assert_eq!(footer[1].slug, "cgv");

        assert!(matches!(
            store.require_page("nope"),
            Err(ContentError::NotFound(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_directory_is_empty_store() {
        let dir = std::env::temp_dir().join(format!("fek-missing-{}", uuid::Uuid::new_v4()));
        let store = ContentStore::load(&dir, &Placeholders::new()).unwrap();
        assert!(store.is_empty());
    }
}
