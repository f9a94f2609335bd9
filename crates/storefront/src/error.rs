//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Handlers that cannot degrade to default content
//! return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cms::CmsError;
use crate::content::ContentError;
use crate::services::cart_store::CartStoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Content backend call failed.
    #[error("CMS error: {0}")]
    Cms(#[from] CmsError),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Cart could not be loaded or saved.
    #[error("Cart error: {0}")]
    Cart(#[from] CartStoreError),

    /// Markdown page could not be loaded.
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Cms(CmsError::NotFound(_)) | Self::Content(ContentError::NotFound(_)) => false,
            Self::Cms(_) | Self::Session(_) | Self::Cart(_) | Self::Content(_) | Self::Internal(_) => {
                true
            }
            Self::NotFound(_) | Self::BadRequest(_) | Self::RateLimited => false,
        }
    }

    /// HTTP status for the error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Cms(CmsError::NotFound(_))
            | Self::Content(ContentError::NotFound(_))
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Cms(CmsError::InvalidInput(_)) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Cms(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Cart(_) | Self::Content(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Cms(CmsError::NotFound(_)) | Self::Content(ContentError::NotFound(_)) => {
                "Page introuvable".to_string()
            }
            Self::Cms(CmsError::InvalidInput(msg)) => msg.clone(),
            Self::Cms(_) => "Service de contenu indisponible".to_string(),
            Self::Session(_) | Self::Cart(_) | Self::Content(_) | Self::Internal(_) => {
                "Erreur interne du serveur".to_string()
            }
            Self::RateLimited => "Trop de requêtes, veuillez patienter".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product", Some(&[("product_id", "12")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("le-breizh".to_string());
        assert_eq!(err.to_string(), "Not found: le-breizh");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::RateLimited),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_cms_error_status_codes() {
        assert_eq!(
            AppError::Cms(CmsError::NotFound("products/x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Cms(CmsError::Status {
                status: 500,
                body: String::new()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Cms(CmsError::InvalidInput("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_content_not_found_is_404() {
        let err = AppError::Content(ContentError::NotFound("cgv".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
