//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL of the site (default: <http://localhost:3000>)
//! - `STOREFRONT_DATABASE_URL` / `DATABASE_URL` - `PostgreSQL` for sessions
//!   (sessions are kept in memory when unset)
//! - `STRAPI_URL` - Content backend URL (default: <http://localhost:1337>)
//! - `STRAPI_TOKEN` - Content backend API token
//! - `CMS_CACHE_TTL_SECS` - Read cache lifetime (default: 300)
//! - `CMS_RETRY_ATTEMPTS` - Attempts per content request (default: 3)
//! - `CMS_RETRY_DELAY_MS` - First retry delay, doubled each attempt (default: 1000)
//! - `CONTACT_EMAIL` - Public contact email (default: contact@food-en-k.com)
//! - `CONTACT_PHONE` - Public phone, also used for orders (default: 0624316790)
//! - `RESTAURANT_NAME` - Name shown in order messages (default: Food en K)
//! - `ORDER_MINIMUM` - Smallest cart total accepted for an order, in euros
//!   (default: 0, no minimum)
//! - `ORDER_DELIVERY_FEE` - Delivery fee added to order messages, in euros
//!   (default: 0, no delivery line)
//! - `GTM_ID` - Google Tag Manager container ID
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use food_en_k_core::order::OrderConfig;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` URL for the session store (contains password)
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the site, without trailing slash
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Content backend configuration
    pub cms: CmsConfig,
    /// Public contact details
    pub contact: ContactConfig,
    /// Google Tag Manager container ID
    pub gtm_id: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (production, staging, ...)
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Content backend (Strapi) configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct CmsConfig {
    /// Base URL, e.g. `http://localhost:1337`
    pub base_url: Url,
    /// Bearer token for the REST API
    pub api_token: Option<SecretString>,
    /// How long read responses stay cached
    pub cache_ttl: Duration,
    /// Attempts per request, first try included
    pub retry_attempts: u32,
    /// Delay before the first retry
    pub retry_base_delay: Duration,
}

impl std::fmt::Debug for CmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cache_ttl", &self.cache_ttl)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_base_delay", &self.retry_base_delay)
            .finish()
    }
}

/// Public contact details shown in the footer, structured data and orders.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    pub email: String,
    pub phone: String,
    pub restaurant_name: String,
    pub minimum_order: Decimal,
    pub delivery_fee: Decimal,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            email: "contact@food-en-k.com".to_string(),
            phone: "0624316790".to_string(),
            restaurant_name: "Food en K".to_string(),
            minimum_order: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
        }
    }
}

impl ContactConfig {
    /// Order settings derived from the contact details.
    #[must_use]
    pub fn order_config(&self) -> OrderConfig {
        OrderConfig {
            restaurant_name: self.restaurant_name.clone(),
            restaurant_phone: self.phone.clone(),
            minimum_order: self.minimum_order,
            delivery_fee: self.delivery_fee,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL");
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = parse_env_or_default("STOREFRONT_PORT", 3000u16)?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000")
            .trim_end_matches('/')
            .to_string();
        let session_secret = get_validated_secret("STOREFRONT_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "STOREFRONT_SESSION_SECRET")?;

        let cms = CmsConfig::from_env()?;
        let contact = ContactConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            cms,
            contact,
            gtm_id: get_optional_env("GTM_ID"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CmsConfig {
    /// Load the content backend settings alone.
    ///
    /// Used by the CLI, which does not need the rest of the storefront
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = get_env_or_default("STRAPI_URL", "http://localhost:1337");
        let base_url = Url::parse(raw_url.trim_end_matches('/'))
            .map_err(|e| ConfigError::InvalidEnvVar("STRAPI_URL".to_string(), e.to_string()))?;

        Ok(Self {
            base_url,
            api_token: get_optional_env("STRAPI_TOKEN")
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            cache_ttl: Duration::from_secs(parse_env_or_default("CMS_CACHE_TTL_SECS", 300u64)?),
            retry_attempts: parse_env_or_default("CMS_RETRY_ATTEMPTS", 3u32)?.max(1),
            retry_base_delay: Duration::from_millis(parse_env_or_default(
                "CMS_RETRY_DELAY_MS",
                1000u64,
            )?),
        })
    }

    /// Settings pointing at `base_url` with defaults for everything else.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_token: None,
            cache_ttl: Duration::from_secs(300),
            retry_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
        }
    }
}

impl ContactConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            email: get_optional_env("CONTACT_EMAIL").unwrap_or(defaults.email),
            phone: get_optional_env("CONTACT_PHONE").unwrap_or(defaults.phone),
            restaurant_name: get_optional_env("RESTAURANT_NAME")
                .unwrap_or(defaults.restaurant_name),
            minimum_order: parse_amount("ORDER_MINIMUM", get_optional_env("ORDER_MINIMUM"))?,
            delivery_fee: parse_amount(
                "ORDER_DELIVERY_FEE",
                get_optional_env("ORDER_DELIVERY_FEE"),
            )?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Parse a euro amount such as `15` or `2,50`. Unset or blank means zero.
fn parse_amount(key: &str, raw: Option<String>) -> Result<Decimal, ConfigError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(Decimal::ZERO);
    };
    let amount = raw
        .trim()
        .replace(',', ".")
        .parse::<Decimal>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if amount.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "amount must not be negative".to_string(),
        ));
    }
    Ok(amount)
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

/// Configuration for tests: local CMS URL, memory sessions, no Sentry.
#[doc(hidden)]
#[must_use]
pub fn test_config(cms_url: Url) -> StorefrontConfig {
    StorefrontConfig {
        database_url: None,
        host: IpAddr::from([127, 0, 0, 1]),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6"),
        cms: CmsConfig {
            retry_base_delay: Duration::from_millis(1),
            ..CmsConfig::new(cms_url)
        },
        contact: ContactConfig::default(),
        gtm_id: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config(Url::parse("http://localhost:1337").unwrap());
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(!config.is_secure());
    }

    #[test]
    fn test_cms_config_debug_redacts_token() {
        let config = CmsConfig {
            api_token: Some(SecretString::from("super_secret_strapi_token")),
            ..CmsConfig::new(Url::parse("https://cms.food-en-k.com").unwrap())
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("https://cms.food-en-k.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_strapi_token"));
    }

    #[test]
    fn test_order_config_uses_contact_phone() {
        let contact = ContactConfig::default();
        let order = contact.order_config();
        assert_eq!(order.restaurant_phone, "0624316790");
        assert_eq!(order.restaurant_name, "Food en K");
        assert_eq!(order.minimum_order, Decimal::ZERO);
        assert_eq!(order.delivery_fee, Decimal::ZERO);
    }

    #[test]
    fn test_order_config_carries_amounts() {
        let contact = ContactConfig {
            minimum_order: Decimal::new(15, 0),
            delivery_fee: Decimal::new(250, 2),
            ..ContactConfig::default()
        };
        let order = contact.order_config();
        assert_eq!(order.minimum_order, Decimal::new(15, 0));
        assert_eq!(order.delivery_fee, Decimal::new(250, 2));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("ORDER_MINIMUM", None).unwrap(), Decimal::ZERO);
        assert_eq!(
            parse_amount("ORDER_MINIMUM", Some("  ".to_string())).unwrap(),
            Decimal::ZERO
        );
        assert_eq!(
            parse_amount("ORDER_DELIVERY_FEE", Some("2,50".to_string())).unwrap(),
            Decimal::new(250, 2)
        );
        assert_eq!(
            parse_amount("ORDER_MINIMUM", Some("15".to_string())).unwrap(),
            Decimal::new(15, 0)
        );
    }

    #[test]
    fn test_parse_amount_rejects_invalid() {
        assert!(matches!(
            parse_amount("ORDER_MINIMUM", Some("quinze".to_string())),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "ORDER_MINIMUM"
        ));
        assert!(parse_amount("ORDER_DELIVERY_FEE", Some("-1".to_string())).is_err());
    }
}
