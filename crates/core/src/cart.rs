//! The visitor's shopping cart.
//!
//! A cart is an ordered list of lines, one per product. Adding a product
//! that is already in the cart bumps the existing line instead of creating
//! a second one, and a line never holds a quantity of zero: setting it to
//! zero (or less) removes the line.
//!
//! The cart itself does no I/O. Callers persist [`Cart::to_persisted`]
//! after every mutation and rebuild with [`Cart::from_persisted`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::Product;
use crate::types::{CartLineId, Price, ProductId};

/// The product fields a cart line needs, captured when the line is created.
///
/// Later price changes in the CMS do not affect lines already in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
}

impl ProductSnapshot {
    /// Unit price in euros.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::eur(self.price)
    }
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            price: product.price,
            image_url: product.primary_image().map(|m| m.url.clone()),
            category: product.category.as_ref().map(|c| c.name.clone()),
            is_vegetarian: product.is_vegetarian(),
            is_vegan: product.is_vegan(),
        }
    }
}

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartLineId,
    pub product: ProductSnapshot,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.unit_price().times(self.quantity)
    }
}

/// Serialized form of the cart, as stored under `food-truck-cart`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCart {
    #[serde(default)]
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from its stored form.
    ///
    /// Lines with a zero quantity and repeated line ids are dropped so that
    /// a hand-edited or stale payload cannot break the cart's invariants.
    #[must_use]
    pub fn from_persisted(persisted: PersistedCart) -> Self {
        let mut seen = HashSet::new();
        let lines = persisted
            .items
            .into_iter()
            .filter(|line| line.quantity > 0 && seen.insert(line.id))
            .collect();
        Self { lines }
    }

    /// Stored form of the cart, stamped with `now`.
    #[must_use]
    pub fn to_persisted(&self, now: DateTime<Utc>) -> PersistedCart {
        PersistedCart {
            items: self.lines.clone(),
            last_updated: Some(now),
        }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Find a line by id.
    #[must_use]
    pub fn line(&self, id: CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Add `quantity` units of a product.
    ///
    /// Returns the id of the line that now holds the product, or `None`
    /// when `quantity` is zero (nothing changes).
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Option<CartLineId> {
        self.add_snapshot(ProductSnapshot::from(product), quantity)
    }

    /// Same as [`Cart::add_item`] for an already captured snapshot.
    pub fn add_snapshot(&mut self, product: ProductSnapshot, quantity: u32) -> Option<CartLineId> {
        if quantity == 0 {
            return None;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
            return Some(line.id);
        }

        let id = CartLineId::generate();
        self.lines.push(CartLine {
            id,
            product,
            quantity,
            notes: None,
            added_at: Utc::now(),
        });
        Some(id)
    }

    /// Remove a line. Returns `false` if no line has this id.
    pub fn remove_item(&mut self, id: CartLineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        self.lines.len() != before
    }

    /// Set a line's quantity; zero or negative removes the line.
    ///
    /// Returns `false` if no line has this id.
    pub fn update_quantity(&mut self, id: CartLineId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(id);
        }

        let Some(line) = self.lines.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        true
    }

    /// Attach a note to a line; blank notes clear it.
    ///
    /// Returns `false` if no line has this id.
    pub fn set_notes(&mut self, id: CartLineId, notes: Option<&str>) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        line.notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned);
        true
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
