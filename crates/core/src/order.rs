//! Order message composition.
//!
//! The truck takes orders by text message or phone call. This module turns
//! a cart into the message the visitor sends, and builds the `sms:` and
//! `tel:` links that open it on their device.

use core::fmt;
use core::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::types::Price;

/// Restaurant details used in order messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfig {
    pub restaurant_name: String,
    pub restaurant_phone: String,
    /// Orders below this total are refused. Zero disables the check.
    pub minimum_order: Decimal,
    /// Added to the total when non-zero.
    pub delivery_fee: Decimal,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            restaurant_name: "Food Truck Gourmet".to_owned(),
            restaurant_phone: "+33123456789".to_owned(),
            minimum_order: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
        }
    }
}

impl OrderConfig {
    /// Cart total plus delivery fee.
    #[must_use]
    pub fn order_total(&self, cart: &Cart) -> Price {
        cart.total_price() + Price::eur(self.delivery_fee)
    }
}

/// Who is placing the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderContact {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// What to do with the composed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    /// Show the message so the visitor can copy it.
    Copy,
    /// Open the messaging app with the message prefilled.
    Sms,
    /// Call the restaurant.
    Call,
}

/// Errors from order handling.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Action non reconnue")]
    UnknownAction(String),
}

impl FromStr for OrderAction {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "copy" => Ok(Self::Copy),
            "sms" => Ok(Self::Sms),
            "call" => Ok(Self::Call),
            other => Err(OrderError::UnknownAction(other.to_owned())),
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Copy => "copy",
            Self::Sms => "sms",
            Self::Call => "call",
        })
    }
}

/// Result of [`execute_order_action`], shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderOutcome {
    pub success: bool,
    pub message: String,
    /// `sms:` or `tel:` link the browser should follow.
    pub redirect: Option<String>,
    /// Full order text, for the copy action.
    pub order_text: Option<String>,
}

impl OrderOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            redirect: None,
            order_text: None,
        }
    }
}

/// Everything the order page displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub lines: Vec<CartLine>,
    pub total: Price,
    pub item_count: u32,
    pub formatted_message: String,
    pub phone_number: String,
}

/// Format used for the order timestamp (`19/10/2026 14:03:05`).
pub const ORDER_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Build the order text sent to the restaurant.
#[must_use]
pub fn compose_order_message(
    cart: &Cart,
    contact: Option<&OrderContact>,
    config: &OrderConfig,
    placed_at: NaiveDateTime,
) -> String {
    let mut message = format!("🍔 Nouvelle commande - {}\n\n", config.restaurant_name);

    if let Some(contact) = contact {
        message.push_str(&format!("👤 Client: {}\n", contact.name));
        message.push_str(&format!("📞 Téléphone: {}\n", contact.phone));
        if let Some(email) = contact.email.as_deref().filter(|e| !e.is_empty()) {
            message.push_str(&format!("📧 Email: {email}\n"));
        }
        message.push('\n');
    }

    message.push_str("📋 Commande:\n");
    for line in cart.lines() {
        message.push_str(&format!(
            "• {}x {} - {}\n",
            line.quantity,
            line.product.name,
            line.line_total().display()
        ));
        if let Some(notes) = &line.notes {
            message.push_str(&format!("  Note: {notes}\n"));
        }
    }

    message.push('\n');
    if !config.delivery_fee.is_zero() {
        message.push_str(&format!(
            "🚚 Livraison: {}\n",
            Price::eur(config.delivery_fee).display()
        ));
    }
    message.push_str(&format!(
        "💰 Total: {}\n",
        config.order_total(cart).display()
    ));
    message.push_str(&format!("📦 Nombre d'articles: {}\n\n", cart.item_count()));
    message.push_str(&format!(
        "📅 Commande passée le {}",
        placed_at.format(ORDER_TIMESTAMP_FORMAT)
    ));

    message
}

/// The visitor's phone if given, else the restaurant's.
fn target_phone<'a>(phone: Option<&'a str>, config: &'a OrderConfig) -> &'a str {
    phone
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(&config.restaurant_phone)
}

/// `sms:` link with the message as body.
#[must_use]
pub fn sms_url(message: &str, phone: Option<&str>, config: &OrderConfig) -> String {
    format!(
        "sms:{}?body={}",
        target_phone(phone, config),
        urlencoding::encode(message)
    )
}

/// `tel:` link.
#[must_use]
pub fn phone_url(phone: Option<&str>, config: &OrderConfig) -> String {
    format!("tel:{}", target_phone(phone, config))
}

/// Summary of the cart as an order.
#[must_use]
pub fn order_summary(
    cart: &Cart,
    contact: Option<&OrderContact>,
    config: &OrderConfig,
    placed_at: NaiveDateTime,
) -> OrderSummary {
    OrderSummary {
        lines: cart.lines().to_vec(),
        total: config.order_total(cart),
        item_count: cart.item_count(),
        formatted_message: compose_order_message(cart, contact, config, placed_at),
        phone_number: target_phone(contact.map(|c| c.phone.as_str()), config).to_owned(),
    }
}

/// Compose the order and prepare `action`.
///
/// An empty cart (or one under the minimum order) is reported as an
/// unsuccessful outcome, not an error.
#[must_use]
pub fn execute_order_action(
    action: OrderAction,
    cart: &Cart,
    contact: Option<&OrderContact>,
    config: &OrderConfig,
    placed_at: NaiveDateTime,
) -> OrderOutcome {
    if cart.is_empty() {
        return OrderOutcome::failure("Le panier est vide");
    }

    if config.minimum_order > Decimal::ZERO && cart.total_price().amount < config.minimum_order {
        return OrderOutcome::failure(format!(
            "Commande minimum : {}",
            Price::eur(config.minimum_order).display()
        ));
    }

    let text = compose_order_message(cart, contact, config, placed_at);
    let contact_phone = contact.map(|c| c.phone.as_str());

    match action {
        OrderAction::Copy => OrderOutcome {
            success: true,
            message: "Message prêt à copier".to_owned(),
            redirect: None,
            order_text: Some(text),
        },
        OrderAction::Sms => OrderOutcome {
            success: true,
            message: "SMS ouvert".to_owned(),
            redirect: Some(sms_url(&text, contact_phone, config)),
            order_text: Some(text),
        },
        OrderAction::Call => OrderOutcome {
            success: true,
            message: "Appel en cours...".to_owned(),
            redirect: Some(phone_url(contact_phone, config)),
            order_text: None,
        },
    }
}
