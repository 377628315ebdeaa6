//! Cart persistence on top of a key-value store.

use storefront_cart::{Cart, CartId, CartSnapshot};

use crate::store::{KeyValueStore, StoreError};

/// Saves and restores the session cart as JSON under one key.
#[derive(Debug)]
pub struct CartStore<S> {
    store: S,
    key: String,
}

impl<S> CartStore<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Restore the saved cart; a missing key yields an empty cart.
    pub fn load(&self) -> Result<Cart, StoreError> {
        let id = CartId::new(self.key.clone());
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Cart::with_id(id));
        };

        let snapshot: CartSnapshot =
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: self.key.clone(),
                source,
            })?;
        let cart = Cart::from_snapshot(id, snapshot);
        tracing::debug!(key = %self.key, lines = cart.len(), "cart restored");
        Ok(cart)
    }

    /// Like `load`, but any failure starts the session with an empty cart.
    ///
    /// A corrupt entry is also removed so the next reload doesn't trip on it.
    pub fn load_or_empty(&self) -> Cart {
        match self.load() {
            Ok(cart) => cart,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "discarding unreadable cart");
                if matches!(err, StoreError::Corrupt { .. }) {
                    if let Err(err) = self.store.remove(&self.key) {
                        tracing::warn!(key = %self.key, error = %err, "failed to remove corrupt cart");
                    }
                }
                Cart::with_id(CartId::new(self.key.clone()))
            }
        }
    }

    /// Persist the cart; an empty cart removes the key.
    pub fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        if cart.is_empty() {
            return self.store.remove(&self.key);
        }
        let raw = serde_json::to_string(&cart.snapshot()).map_err(|source| StoreError::Encode {
            key: self.key.clone(),
            source,
        })?;
        self.store.set(&self.key, raw)
    }

    pub fn discard(&self) -> Result<(), StoreError> {
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use storefront_catalog::Product;
    use storefront_core::{Money, ProductId};

    use crate::store::InMemoryKeyValueStore;

    fn filled_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(&Product::new("A", "Product A", Money::new(1000), 10, "f1"), 3);
        cart.add(&Product::new("B", "Product B", Money::new(500), 10, "f2"), 1);
        cart
    }

    #[test]
    fn missing_key_loads_an_empty_cart() {
        let store = CartStore::new(InMemoryKeyValueStore::new(), "cart");
        let cart = store.load().unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.id_typed().as_str(), "cart");
    }

    #[test]
    fn save_then_load_restores_lines_in_order() {
        let store = CartStore::new(InMemoryKeyValueStore::new(), "cart");
        let cart = filled_cart();

        store.save(&cart).unwrap();
        let restored = store.load().unwrap();

        assert_eq!(restored.lines(), cart.lines());
        assert_eq!(restored.total(), Money::new(3500));
    }

    #[test]
    fn saving_an_empty_cart_removes_the_key() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let store = CartStore::new(Arc::clone(&kv), "cart");

        store.save(&filled_cart()).unwrap();
        assert!(kv.get("cart").unwrap().is_some());

        store.save(&Cart::new()).unwrap();
        assert!(kv.get("cart").unwrap().is_none());
    }

    #[test]
    fn corrupt_entries_error_on_load_and_are_dropped_by_load_or_empty() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        kv.set("cart", "{not json".to_string()).unwrap();
        let store = CartStore::new(Arc::clone(&kv), "cart");

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "cart"));

        assert!(store.load_or_empty().is_empty());
        assert!(kv.get("cart").unwrap().is_none());
    }

    #[test]
    fn restoring_merges_duplicate_lines_written_by_older_clients() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let product = Product::new("A", "Product A", Money::new(1000), 10, "f1");
        let line = serde_json::json!({ "product": product, "quantity": 2 });
        kv.set(
            "cart",
            serde_json::json!({ "lines": [line.clone(), line] }).to_string(),
        )
        .unwrap();

        let cart = CartStore::new(kv, "cart").load().unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::new("A")), 4);
    }
}
