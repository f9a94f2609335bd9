//! Session-backed cart.
//!
//! The cart lives in the visitor's session under `food-truck-cart`. Every
//! mutation loads the stored cart, applies the change and writes the whole
//! cart back, so the session always holds the latest state.

use chrono::Utc;
use food_en_k_core::CartLineId;
use food_en_k_core::cart::{Cart, PersistedCart, ProductSnapshot};
use thiserror::Error;
use tower_sessions::Session;
use tracing::{instrument, warn};

use crate::models::session_keys;

/// Cart persistence errors.
#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Cart of the current visitor.
#[derive(Clone)]
pub struct CartStore {
    session: Session,
}

impl CartStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Load the stored cart.
    ///
    /// A payload that no longer decodes is discarded and an empty cart is
    /// returned.
    pub async fn load(&self) -> Cart {
        match self.session.get::<PersistedCart>(session_keys::CART).await {
            Ok(stored) => stored.map(Cart::from_persisted).unwrap_or_default(),
            Err(e) => {
                warn!("Discarding unreadable cart: {e}");
                if let Err(e) = self.session.remove_value(session_keys::CART).await {
                    warn!("Failed to clear unreadable cart: {e}");
                }
                Cart::new()
            }
        }
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartStoreError> {
        self.session
            .insert(session_keys::CART, cart.to_persisted(Utc::now()))
            .await?;
        Ok(())
    }

    /// Apply `change` to the stored cart and persist the result.
    async fn mutate<R>(&self, change: impl FnOnce(&mut Cart) -> R) -> Result<(Cart, R), CartStoreError> {
        let mut cart = self.load().await;
        let result = change(&mut cart);
        self.save(&cart).await?;
        Ok((cart, result))
    }

    /// Add a product. Returns the updated cart and the line holding it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add(
        &self,
        product: ProductSnapshot,
        quantity: u32,
    ) -> Result<(Cart, Option<CartLineId>), CartStoreError> {
        self.mutate(|cart| cart.add_snapshot(product, quantity)).await
    }

    /// Set a line's quantity, removing it at zero or below.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        line: CartLineId,
        quantity: i64,
    ) -> Result<(Cart, bool), CartStoreError> {
        self.mutate(|cart| cart.update_quantity(line, quantity)).await
    }

    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    #[instrument(skip(self))]
    pub async fn remove(&self, line: CartLineId) -> Result<(Cart, bool), CartStoreError> {
        self.mutate(|cart| cart.remove_item(line)).await
    }

    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    #[instrument(skip(self, notes))]
    pub async fn set_notes(
        &self,
        line: CartLineId,
        notes: Option<&str>,
    ) -> Result<(Cart, bool), CartStoreError> {
        self.mutate(|cart| cart.set_notes(line, notes)).await
    }

    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<Cart, CartStoreError> {
        self.mutate(Cart::clear).await.map(|(cart, ())| cart)
    }

    /// Whether the cart drawer is open.
    pub async fn is_open(&self) -> bool {
        self.session
            .get::<bool>(session_keys::CART_OPEN)
            .await
            .ok()
            .flatten()
            .unwrap_or(false)
    }

    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn set_open(&self, open: bool) -> Result<(), CartStoreError> {
        self.session.insert(session_keys::CART_OPEN, open).await?;
        Ok(())
    }

    /// Flip the drawer state and return the new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn toggle(&self) -> Result<bool, CartStoreError> {
        let open = !self.is_open().await;
        self.set_open(open).await?;
        Ok(open)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use food_en_k_core::ProductId;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn burger(id: i64, cents: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: format!("Burger {id}"),
            slug: format!("burger-{id}"),
            price: Decimal::new(cents, 2),
            image_url: None,
            category: None,
            is_vegetarian: false,
            is_vegan: false,
        }
    }

    #[tokio::test]
    async fn test_add_persists_and_accumulates() {
        let session = session();
        let store = CartStore::new(session.clone());

        let (_, first) = store.add(burger(1, 1250), 1).await.unwrap();
        let (cart, second) = store.add(burger(1, 1250), 2).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(cart.item_count(), 3);

        // a fresh store over the same session sees the same cart
        let reloaded = CartStore::new(session).load().await;
        assert_eq!(reloaded.lines().len(), 1);
        assert_eq!(reloaded.lines()[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_stored_form_has_timestamp() {
        let session = session();
        let store = CartStore::new(session.clone());
        store.add(burger(2, 900), 1).await.unwrap();

        let stored: PersistedCart = session.get(session_keys::CART).await.unwrap().unwrap();
        assert_eq!(stored.items.len(), 1);
        assert!(stored.last_updated.is_some());
    }

    #[tokio::test]
    async fn test_update_to_zero_removes() {
        let store = CartStore::new(session());
        let (_, line) = store.add(burger(1, 1000), 1).await.unwrap();
        let (cart, found) = store.update_quantity(line.unwrap(), 0).await.unwrap();
        assert!(found);
        assert!(cart.is_empty());
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_notes_remove_and_clear() {
        let store = CartStore::new(session());
        let (_, line) = store.add(burger(1, 1000), 1).await.unwrap();
        let line = line.unwrap();
        store.add(burger(2, 800), 1).await.unwrap();

        let (cart, _) = store.set_notes(line, Some("sans oignons")).await.unwrap();
        assert_eq!(cart.line(line).unwrap().notes.as_deref(), Some("sans oignons"));

        let (cart, removed) = store.remove(line).await.unwrap();
        assert!(removed);
        assert_eq!(cart.lines().len(), 1);

        assert!(store.clear().await.unwrap().is_empty());
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_cart_is_discarded() {
        let session = session();
        session.insert(session_keys::CART, "not a cart").await.unwrap();
        let store = CartStore::new(session.clone());
        assert!(store.load().await.is_empty());
        assert!(session.get::<serde_json::Value>(session_keys::CART).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_toggle() {
        let store = CartStore::new(session());
        assert!(!store.is_open().await);
        assert!(store.toggle().await.unwrap());
        assert!(store.is_open().await);
        assert!(!store.toggle().await.unwrap());
    }
}
