//! One shopper's session: catalog lookups, the observable cart, persistence,
//! and checkout wired together.

use std::sync::Arc;

use storefront_cart::{Cart, CartEvent, CartHandle, ObservableCart};
use storefront_catalog::{InMemoryCatalog, Product, ProductCatalog};
use storefront_checkout::{stock, Checkout, CheckoutError, Order, OrderPlacement};
use storefront_core::{CustomerId, Money, ProductId};
use storefront_events::{InMemoryEventBus, Subscription};
use storefront_session::{CartStore, KeyValueStore};

/// Session facade used by the `storefront` binary.
///
/// Every mutation is persisted right after it is applied; a persistence
/// failure is logged and the in-memory cart stays authoritative.
pub struct ShoppingSession<C, P, S> {
    catalog: C,
    checkout: Checkout<P>,
    store: CartStore<S>,
    cart: ObservableCart<Arc<InMemoryEventBus<CartEvent>>>,
    customer_id: CustomerId,
}

impl<C, P, S> ShoppingSession<C, P, S>
where
    C: ProductCatalog,
    P: OrderPlacement,
    S: KeyValueStore,
{
    /// Start a session, restoring whatever cart was saved under the store's key.
    pub fn start(catalog: C, placement: P, store: CartStore<S>, customer_id: CustomerId) -> Self {
        let cart = store.load_or_empty();
        tracing::info!(
            customer_id = %customer_id,
            restored_lines = cart.len(),
            "session started"
        );
        Self {
            catalog,
            checkout: Checkout::new(placement),
            store,
            cart: ObservableCart::new(cart, Arc::new(InMemoryEventBus::new())),
            customer_id,
        }
    }

    pub fn cart(&self) -> &Cart {
        self.cart.cart()
    }

    pub fn subscribe(&self) -> Subscription<CartEvent> {
        self.cart.subscribe()
    }

    pub fn item_count(&self) -> u64 {
        self.cart().item_count()
    }

    pub fn total(&self) -> Money {
        self.cart().total()
    }

    /// Add from the product page, bounded by the product's stock.
    pub fn add(&mut self, product_id: &ProductId, quantity: u32) -> Result<(), CheckoutError> {
        let product = self.product(product_id)?;
        stock::add_within_stock(&mut self.cart, &product, quantity)?;
        self.persist();
        Ok(())
    }

    pub fn increase(&mut self, product_id: &ProductId) -> Result<bool, CheckoutError> {
        let product = self.product(product_id)?;
        let changed = stock::increase_quantity(&mut self.cart, &product);
        if changed {
            self.persist();
        }
        Ok(changed)
    }

    pub fn decrease(&mut self, product_id: &ProductId) -> bool {
        let changed = stock::decrease_quantity(&mut self.cart, product_id);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn remove(&mut self, product_id: &ProductId) {
        if !self.cart.remove(product_id).is_empty() {
            self.persist();
        }
    }

    /// Re-validate stock, place the order, and clear the cart on success.
    pub fn place_order(&mut self, shipping_address: &str) -> Result<Order, CheckoutError> {
        stock::validate_against_catalog(self.cart.cart(), &self.catalog)?;
        let order = self
            .checkout
            .place_order(&mut self.cart, &self.customer_id, shipping_address)?;
        self.persist();
        Ok(order)
    }

    fn product(&self, product_id: &ProductId) -> Result<Product, CheckoutError> {
        self.catalog
            .find(product_id)
            .ok_or_else(|| CheckoutError::UnknownProduct(product_id.clone()))
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(self.cart.cart()) {
            tracing::warn!(key = %self.store.key(), error = %err, "failed to persist cart");
        }
    }
}

/// Small two-supplier catalog used by the scripted session.
pub fn demo_catalog() -> InMemoryCatalog {
    InMemoryCatalog::with_products([
        Product::new("p-100", "Rice 25kg", Money::new(18_500), 40, "f1")
            .in_store("douala-akwa")
            .in_category("grocery"),
        Product::new("p-101", "Palm oil 5L", Money::new(6_000), 12, "f1")
            .in_store("douala-akwa")
            .in_category("grocery"),
        Product::new("p-200", "Solar lamp", Money::new(12_000), 3, "f2")
            .in_store("douala-bonanjo")
            .in_category("electronics"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    use storefront_checkout::{CatalogOrderPlacement, OrderHistory, OrderStatus};
    use storefront_session::InMemoryKeyValueStore;

    type TestSession = ShoppingSession<
        Arc<InMemoryCatalog>,
        Arc<CatalogOrderPlacement<Arc<InMemoryCatalog>>>,
        Arc<InMemoryKeyValueStore>,
    >;

    struct Fixture {
        session: TestSession,
        placement: Arc<CatalogOrderPlacement<Arc<InMemoryCatalog>>>,
        kv: Arc<InMemoryKeyValueStore>,
    }

    fn fixture() -> Fixture {
        let catalog = Arc::new(demo_catalog());
        let placement = Arc::new(CatalogOrderPlacement::new(Arc::clone(&catalog)));
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let session = ShoppingSession::start(
            catalog,
            Arc::clone(&placement),
            CartStore::new(Arc::clone(&kv), "cart"),
            CustomerId::new("c-1"),
        );
        Fixture {
            session,
            placement,
            kv,
        }
    }

    #[test]
    fn mutations_are_persisted_and_observed() {
        let mut f = fixture();
        let sub = f.session.subscribe();

        f.session.add(&ProductId::new("p-100"), 2).unwrap();
        f.session.add(&ProductId::new("p-200"), 1).unwrap();

        assert_eq!(sub.drain().len(), 2);
        assert_eq!(f.session.item_count(), 3);
        assert_eq!(f.session.total(), Money::new(49_000));
        assert!(f.kv.get("cart").unwrap().is_some());
    }

    #[test]
    fn stock_bounds_the_product_page_and_stepper() {
        let mut f = fixture();
        let lamp = ProductId::new("p-200");

        let err = f.session.add(&lamp, 4).unwrap_err();
        assert!(matches!(err, CheckoutError::InsufficientStock { available: 3, .. }));

        f.session.add(&lamp, 2).unwrap();
        assert!(f.session.increase(&lamp).unwrap());
        assert!(!f.session.increase(&lamp).unwrap());
        assert!(f.session.decrease(&lamp));
        assert_eq!(f.session.cart().quantity_of(&lamp), 2);
    }

    #[test]
    fn unknown_products_are_reported() {
        let mut f = fixture();
        let err = f.session.add(&ProductId::new("nope"), 1).unwrap_err();
        assert_eq!(err, CheckoutError::UnknownProduct(ProductId::new("nope")));
    }

    #[test]
    fn place_order_clears_and_forgets_the_saved_cart() {
        let mut f = fixture();
        f.session.add(&ProductId::new("p-100"), 1).unwrap();

        let order = f.session.place_order("Douala parcours vita").unwrap();

        assert_eq!(order.status, OrderStatus::Confirmed);
        assert!(f.session.cart().is_empty());
        assert!(f.kv.get("cart").unwrap().is_none());
        assert_eq!(
            f.placement.for_customer(&CustomerId::new("c-1")).unwrap().len(),
            1
        );
    }

    #[test]
    fn restarting_restores_the_saved_cart() {
        let mut f = fixture();
        f.session.add(&ProductId::new("p-101"), 3).unwrap();

        let restarted = ShoppingSession::start(
            Arc::new(demo_catalog()),
            Arc::clone(&f.placement),
            CartStore::new(Arc::clone(&f.kv), "cart"),
            CustomerId::new("c-1"),
        );
        assert_eq!(restarted.cart().quantity_of(&ProductId::new("p-101")), 3);
    }
}
