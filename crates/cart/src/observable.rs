//! Cart wrapper that publishes every applied event.
//!
//! This is the storefront's reactivity layer: the cart badge, the review page
//! and the checkout summary subscribe and re-read `item_count()` / `total()`
//! whenever an event arrives.

use storefront_catalog::Product;
use storefront_core::ProductId;
use storefront_events::{Event, EventBus, Subscription};

use crate::cart::{Cart, CartEvent};
use crate::handle::CartHandle;

/// Cart + event bus.
///
/// Mutations go through the wrapped cart first; events are published only
/// after the cart has applied them, so a subscriber reading the cart on
/// receipt never sees a stale value. A publish failure is logged and
/// swallowed: the mutation already happened and the cart never fails.
#[derive(Debug)]
pub struct ObservableCart<B> {
    cart: Cart,
    bus: B,
}

impl<B> ObservableCart<B>
where
    B: EventBus<CartEvent>,
{
    pub fn new(cart: Cart, bus: B) -> Self {
        Self { cart, bus }
    }

    pub fn subscribe(&self) -> Subscription<CartEvent> {
        self.bus.subscribe()
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn into_inner(self) -> Cart {
        self.cart
    }

    fn publish_all(&self, events: Vec<CartEvent>) -> Vec<CartEvent> {
        for event in &events {
            if let Err(err) = self.bus.publish(event.clone()) {
                tracing::warn!(
                    cart_id = %self.cart.id_typed(),
                    event_type = event.event_type(),
                    error = ?err,
                    "failed to publish cart event"
                );
            }
        }
        events
    }
}

impl<B> CartHandle for ObservableCart<B>
where
    B: EventBus<CartEvent>,
{
    fn cart(&self) -> &Cart {
        &self.cart
    }

    fn add(&mut self, product: &Product, quantity: u32) -> Vec<CartEvent> {
        let events = self.cart.add(product, quantity);
        self.publish_all(events)
    }

    fn remove(&mut self, product_id: &ProductId) -> Vec<CartEvent> {
        let events = self.cart.remove(product_id);
        self.publish_all(events)
    }

    fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> Vec<CartEvent> {
        let events = self.cart.set_quantity(product_id, quantity);
        self.publish_all(events)
    }

    fn clear(&mut self) -> Vec<CartEvent> {
        let events = self.cart.clear();
        self.publish_all(events)
    }
}
