//! Strapi content backend client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`, bracket-encoded query strings built by [`Query`]
//! - The CMS is the source of truth, nothing is synced locally
//! - Reads are cached in memory via `moka` (5 minute TTL by default)
//! - Every request goes through a fixed-attempt [`RetryPolicy`]
//!
//! [`CmsClient`] returns `Result`s. Page handlers normally go through
//! [`ContentApi`], which logs failures, queues a notification for the visitor
//! and degrades to an empty value instead.
//!
//! # Example
//!
//! ```rust,ignore
//! use food_en_k_storefront::cms::{CmsClient, FilterOp, Query};
//!
//! let client = CmsClient::new(&config.cms);
//!
//! let query = Query::new()
//!     .filter("category.slug", FilterOp::Eq, "bg-moment")
//!     .populate_fields(["images"])
//!     .sort(["createdAt:desc"]);
//! let products = client.find::<Product>("products", &query).await?;
//! ```

mod api;
mod client;
pub mod media;
mod query;
mod retry;

pub use api::{ApiError, ApiResponse, ContentApi};
pub use client::CmsClient;
pub use query::{FilterOp, FilterValue, Pagination, Populate, PopulateNode, Query};
pub use retry::RetryPolicy;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when talking to the content backend.
#[derive(Debug, Error)]
pub enum CmsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("CMS returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// First characters of the response body.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was rejected before being sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CmsError {
    /// HTTP status associated with the error, when there is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Status { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            Self::InvalidInput(_) => Some(400),
            Self::Parse(_) => None,
        }
    }

    /// Message safe to show to a visitor.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) => "Le service de contenu est injoignable".to_string(),
            Self::Status { status, .. } => {
                format!("Le service de contenu a répondu avec une erreur (HTTP {status})")
            }
            Self::Parse(_) => "Réponse inattendue du service de contenu".to_string(),
            Self::NotFound(_) => "Contenu introuvable".to_string(),
            Self::InvalidInput(message) => message.clone(),
        }
    }
}

/// Pagination block of a collection response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub total: u64,
}

/// `meta` block of a collection response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub pagination: Option<PageInfo>,
}

/// `{ data: [...], meta: { pagination } }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: ResponseMeta,
}

/// `{ data: {...} }` envelope returned for single entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleResponse<T> {
    pub data: T,
}
