//! Mutation seam shared by the bare cart and the observable cart.

use storefront_catalog::Product;
use storefront_core::ProductId;

use crate::cart::{Cart, CartEvent};

/// Something that owns a cart and exposes its four mutations.
///
/// Checkout and stock helpers take `&mut impl CartHandle`, so they work the
/// same whether the session uses a plain [`Cart`] or an
/// [`ObservableCart`](crate::ObservableCart) that notifies subscribers.
pub trait CartHandle {
    fn cart(&self) -> &Cart;

    fn add(&mut self, product: &Product, quantity: u32) -> Vec<CartEvent>;

    fn remove(&mut self, product_id: &ProductId) -> Vec<CartEvent>;

    fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> Vec<CartEvent>;

    fn clear(&mut self) -> Vec<CartEvent>;
}

impl CartHandle for Cart {
    fn cart(&self) -> &Cart {
        self
    }

    fn add(&mut self, product: &Product, quantity: u32) -> Vec<CartEvent> {
        Cart::add(self, product, quantity)
    }

    fn remove(&mut self, product_id: &ProductId) -> Vec<CartEvent> {
        Cart::remove(self, product_id)
    }

    fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> Vec<CartEvent> {
        Cart::set_quantity(self, product_id, quantity)
    }

    fn clear(&mut self) -> Vec<CartEvent> {
        Cart::clear(self)
    }
}
