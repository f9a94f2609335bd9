//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! Adds restrictive security headers to all responses. Start locked down and
//! loosen only when specific functionality requires it.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};
use url::Url;

use super::CspNonce;

/// Origins the CSP has to allow beyond `'self'`.
#[derive(Clone, Debug)]
pub struct ContentPolicy {
    cms_origin: Arc<str>,
}

impl ContentPolicy {
    /// Policy allowing media from the CMS at `cms_url`.
    #[must_use]
    pub fn new(cms_url: &Url) -> Self {
        Self {
            cms_origin: cms_url.origin().ascii_serialization().into(),
        }
    }

    /// Build the `Content-Security-Policy` value for one response.
    ///
    /// ```text
    /// default-src 'none';
    /// script-src 'self' https://unpkg.com 'nonce-…';
    /// style-src 'self';
    /// font-src 'self';
    /// img-src 'self' data: https: <cms origin>;
    /// connect-src 'self';
    /// frame-src 'none';
    /// object-src 'none';
    /// base-uri 'self';
    /// form-action 'self' sms: tel:;
    /// frame-ancestors 'none'
    /// ```
    ///
    /// `form-action` lists `sms:` and `tel:` because placing an order
    /// redirects to them. Product photos come from the CMS and from
    /// external image hosts, hence `https:` in `img-src`.
    #[must_use]
    pub fn header_value(&self, nonce: &str) -> String {
        let script_src = if nonce.is_empty() {
            "script-src 'self' https://unpkg.com".to_string()
        } else {
            format!("script-src 'self' https://unpkg.com 'nonce-{nonce}'")
        };
        format!(
            "default-src 'none'; \
             {script_src}; \
             style-src 'self'; \
             font-src 'self'; \
             img-src 'self' data: https: {cms}; \
             connect-src 'self'; \
             frame-src 'none'; \
             object-src 'none'; \
             base-uri 'self'; \
             form-action 'self' sms: tel:; \
             frame-ancestors 'none'",
            cms = self.cms_origin,
        )
    }
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY` - Prevent clickjacking
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: no-referrer` - Zero referrer leakage
/// - `Content-Security-Policy` - see [`ContentPolicy::header_value`]
/// - `Permissions-Policy` - Deny sensitive features except geolocation
///   for the nearby-locations search
/// - `Cache-Control: no-store, max-age=0` - Pages carry the visitor's cart
/// - `Cross-Origin-Opener-Policy: same-origin` - Process isolation
/// - `Cross-Origin-Resource-Policy: same-origin` - Resource isolation
/// - `Cross-Origin-Embedder-Policy: credentialless` - Isolation that still
///   loads CMS and external images
/// - `X-DNS-Prefetch-Control: off` - Prevent DNS prefetch leakage
pub async fn security_headers_middleware(
    State(policy): State<ContentPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let nonce = request
        .extensions()
        .get::<CspNonce>()
        .map(|n| n.value().to_string())
        .unwrap_or_default();

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

    match HeaderValue::from_str(&policy.header_value(&nonce)) {
        Ok(value) => {
            headers.insert(CONTENT_SECURITY_POLICY, value);
        }
        Err(e) => tracing::error!("Invalid CSP header value: {e}"),
    }

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "accelerometer=(), \
             autoplay=(), \
             browsing-topics=(), \
             camera=(), \
             display-capture=(), \
             encrypted-media=(), \
             fullscreen=(), \
             geolocation=(self), \
             gyroscope=(), \
             hid=(), \
             idle-detection=(), \
             interest-cohort=(), \
             magnetometer=(), \
             microphone=(), \
             midi=(), \
             payment=(), \
             publickey-credentials-get=(), \
             screen-wake-lock=(), \
             serial=(), \
             usb=(), \
             xr-spatial-tracking=()",
        ),
    );

    headers.insert(
        HeaderName::from_static("cache-control"),
        HeaderValue::from_static("no-store, max-age=0"),
    );

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-embedder-policy"),
        HeaderValue::from_static("credentialless"),
    );

    headers.insert(
        HeaderName::from_static("x-dns-prefetch-control"),
        HeaderValue::from_static("off"),
    );

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_includes_cms_origin_and_nonce() {
        let policy = ContentPolicy::new(&Url::parse("https://cms.food-en-k.com/admin").unwrap());
        let value = policy.header_value("abc123");
        assert!(value.contains("img-src 'self' data: https: https://cms.food-en-k.com;"));
        assert!(value.contains("'nonce-abc123'"));
        assert!(value.contains("form-action 'self' sms: tel:"));
    }

    #[test]
    fn test_policy_without_nonce() {
        let policy = ContentPolicy::new(&Url::parse("http://localhost:1337").unwrap());
        let value = policy.header_value("");
        assert!(!value.contains("nonce-"));
        assert!(value.contains("http://localhost:1337"));
    }
}
