//! Media URL helpers.
//!
//! Uploads are served by the CMS under `/uploads/...` and usually come back
//! as relative URLs. No resizing happens here: the CMS already generated the
//! renditions, we only pick one and emit `sizes` hints.

use food_en_k_core::entity::{Media, MediaFormat};

/// Resolve a media URL against the CMS base URL.
///
/// Absolute and protocol-relative URLs are returned unchanged.
#[must_use]
pub fn resolve_url(base_url: &str, url: &str) -> String {
    if url.is_empty()
        || url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("//")
        || url.starts_with("data:")
    {
        return url.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}

/// Whether a URL points at a CMS upload.
#[must_use]
pub fn is_cms_image(url: Option<&str>) -> bool {
    url.is_some_and(|u| u.contains("/uploads/"))
}

/// Renditions generated for each upload, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    Thumbnail,
    Small,
    Medium,
    Large,
}

impl Breakpoint {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Thumbnail => "thumbnail",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Smallest rendition that fits a container of `width` pixels.
    #[must_use]
    pub const fn for_width(width: u32) -> Self {
        match width {
            0..=150 => Self::Thumbnail,
            151..=500 => Self::Small,
            501..=750 => Self::Medium,
            _ => Self::Large,
        }
    }
}

/// Where an image is displayed, for the `sizes` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Card,
    Hero,
    Gallery,
    Thumbnail,
}

impl Layout {
    #[must_use]
    pub const fn sizes(self) -> &'static str {
        match self {
            Self::Card => "(min-width: 1280px) 25vw, (min-width: 1024px) 33vw, (min-width: 768px) 50vw, 100vw",
            Self::Hero => "100vw",
            Self::Gallery => "(min-width: 1024px) 25vw, (min-width: 768px) 33vw, 50vw",
            Self::Thumbnail => "(max-width: 768px) 100px, 150px",
        }
    }

    /// Typical rendered width in pixels, used to pick a rendition.
    #[must_use]
    pub const fn width(self) -> u32 {
        match self {
            Self::Card | Self::Gallery => 500,
            Self::Hero => 1200,
            Self::Thumbnail => 150,
        }
    }
}

fn format_for(media: &Media, breakpoint: Breakpoint) -> Option<&MediaFormat> {
    let formats = media.formats.as_ref()?;
    match breakpoint {
        Breakpoint::Thumbnail => formats.thumbnail.as_ref(),
        Breakpoint::Small => formats.small.as_ref(),
        Breakpoint::Medium => formats.medium.as_ref(),
        Breakpoint::Large => formats.large.as_ref(),
    }
}

/// URL of the requested rendition, or of the original upload.
#[must_use]
pub fn image_url(media: &Media, breakpoint: Breakpoint) -> &str {
    format_for(media, breakpoint).map_or(media.url.as_str(), |f| f.url.as_str())
}

/// Renditions present on an upload, plus `original`.
#[must_use]
pub fn available_formats(media: &Media) -> Vec<&'static str> {
    let mut formats: Vec<&'static str> = [
        Breakpoint::Thumbnail,
        Breakpoint::Small,
        Breakpoint::Medium,
        Breakpoint::Large,
    ]
    .into_iter()
    .filter(|bp| format_for(media, *bp).is_some())
    .map(Breakpoint::as_str)
    .collect();
    formats.push("original");
    formats
}

/// Attributes for an `<img>` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageProps {
    pub src: String,
    pub alt: String,
    pub sizes: &'static str,
    pub loading: &'static str,
}

/// Build `<img>` attributes for an upload.
///
/// `alt` wins over the upload's alternative text; "Image" is the last resort.
#[must_use]
pub fn image_props(
    base_url: &str,
    media: &Media,
    alt: &str,
    layout: Layout,
    breakpoint: Breakpoint,
) -> ImageProps {
    let alt = if alt.is_empty() { media.alt() } else { alt };
    ImageProps {
        src: resolve_url(base_url, image_url(media, breakpoint)),
        alt: if alt.is_empty() { "Image" } else { alt }.to_string(),
        sizes: layout.sizes(),
        loading: "lazy",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn media() -> Media {
        serde_json::from_value(json!({
            "id": 1,
            "url": "/uploads/burger.jpg",
            "alternativeText": null,
            "name": "burger.jpg",
            "formats": {
                "thumbnail": { "url": "/uploads/thumbnail_burger.jpg", "width": 156 },
                "small": { "url": "/uploads/small_burger.jpg", "width": 500 }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_resolve_relative_upload() {
        assert_eq!(
            resolve_url("http://localhost:1337/", "/uploads/a.jpg"),
            "http://localhost:1337/uploads/a.jpg"
        );
        assert_eq!(
            resolve_url("http://localhost:1337", "uploads/a.jpg"),
            "http://localhost:1337/uploads/a.jpg"
        );
    }

    #[test]
    fn test_resolve_absolute_unchanged() {
        let url = "https://images.unsplash.com/photo-1?w=800";
        assert_eq!(resolve_url("http://localhost:1337", url), url);
        assert_eq!(resolve_url("http://localhost:1337", ""), "");
    }

    #[test]
    fn test_is_cms_image() {
        assert!(is_cms_image(Some("/uploads/a.jpg")));
        assert!(is_cms_image(Some("https://cms.example.com/uploads/a.jpg")));
        assert!(!is_cms_image(Some("https://images.unsplash.com/a.jpg")));
        assert!(!is_cms_image(None));
    }

    #[test]
    fn test_breakpoint_for_width() {
        assert_eq!(Breakpoint::for_width(150), Breakpoint::Thumbnail);
        assert_eq!(Breakpoint::for_width(151), Breakpoint::Small);
        assert_eq!(Breakpoint::for_width(500), Breakpoint::Small);
        assert_eq!(Breakpoint::for_width(750), Breakpoint::Medium);
        assert_eq!(Breakpoint::for_width(1200), Breakpoint::Large);
    }

    #[test]
    fn test_image_url_falls_back_to_original() {
        let media = media();
        assert_eq!(image_url(&media, Breakpoint::Small), "/uploads/small_burger.jpg");
        assert_eq!(image_url(&media, Breakpoint::Large), "/uploads/burger.jpg");
    }

    #[test]
    fn test_available_formats() {
        assert_eq!(
            available_formats(&media()),
            vec!["thumbnail", "small", "original"]
        );
    }

    #[test]
    fn test_image_props() {
        let props = image_props(
            "http://cms",
            &media(),
            "",
            Layout::Thumbnail,
            Breakpoint::Thumbnail,
        );
        assert_eq!(props.src, "http://cms/uploads/thumbnail_burger.jpg");
        assert_eq!(props.alt, "burger.jpg");
        assert_eq!(props.sizes, "(max-width: 768px) 100px, 150px");
        assert_eq!(props.loading, "lazy");
    }
}
