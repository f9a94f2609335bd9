//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded in the span and the Sentry scope)
//! 4. CSP nonce (generate per-request nonce for inline scripts)
//! 5. Security headers (CSP built with the nonce, HSTS-free isolation headers)
//! 6. Session layer (tower-sessions, `PostgreSQL` or memory store)
//! 7. Rate limiting on form and cart posts (governor)

pub mod csp;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use rate_limit::{cart_rate_limiter, form_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::{ContentPolicy, security_headers_middleware};
pub use session::create_session_layer;
