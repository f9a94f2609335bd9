//! Session keys.
//!
//! The session stands in for browser storage: each key holds one JSON
//! document that is rewritten in full on every change.

/// Session keys for visitor state.
pub mod keys {
    /// Cart contents as a `PersistedCart`.
    pub const CART: &str = "food-truck-cart";

    /// Whether the cart drawer is open.
    pub const CART_OPEN: &str = "cart-open";

    /// Visitor preferences (theme, language, newsletter).
    pub const PREFERENCES: &str = "food-en-k-preferences";

    /// Ids of alerts the visitor dismissed.
    pub const DISMISSED_ALERTS: &str = "dismissed-alerts";

    /// Pending notifications, rendered and drained on the next page.
    pub const NOTIFICATIONS: &str = "notifications";
}
