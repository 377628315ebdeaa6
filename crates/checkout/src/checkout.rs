use storefront_cart::{Cart, CartHandle};
use storefront_core::CustomerId;

use crate::error::CheckoutError;
use crate::order::Order;
use crate::placement::OrderPlacement;
use crate::request::PlaceOrderRequest;

/// Checkout flow: validate, snapshot, place, and clear only on success.
///
/// A failed placement leaves the cart exactly as it was, so the shopper can
/// retry without re-adding anything.
#[derive(Debug)]
pub struct Checkout<P> {
    placement: P,
}

impl<P> Checkout<P>
where
    P: OrderPlacement,
{
    pub fn new(placement: P) -> Self {
        Self { placement }
    }

    pub fn placement(&self) -> &P {
        &self.placement
    }

    /// Build the order request without placing it.
    pub fn prepare(
        &self,
        cart: &Cart,
        shipping_address: &str,
    ) -> Result<PlaceOrderRequest, CheckoutError> {
        let shipping_address = shipping_address.trim();
        if shipping_address.is_empty() {
            return Err(CheckoutError::MissingShippingAddress);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(PlaceOrderRequest::from_cart(cart, shipping_address))
    }

    pub fn place_order<H>(
        &self,
        cart: &mut H,
        customer_id: &CustomerId,
        shipping_address: &str,
    ) -> Result<Order, CheckoutError>
    where
        H: CartHandle + ?Sized,
    {
        let request = self.prepare(cart.cart(), shipping_address)?;

        match self.placement.place_order(customer_id, &request) {
            Ok(order) => {
                cart.clear();
                tracing::info!(
                    order_id = %order.id,
                    customer_id = %customer_id,
                    lines = request.items.len(),
                    "checkout completed; cart cleared"
                );
                Ok(order)
            }
            Err(err) => {
                tracing::warn!(
                    customer_id = %customer_id,
                    lines = request.items.len(),
                    error = %err,
                    "order placement failed; cart kept"
                );
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use storefront_catalog::Product;
    use storefront_core::{Money, ProductId};

    use crate::error::PlacementError;
    use crate::order::{OrderItem, OrderStatus};

    /// Records requests and answers with a canned result.
    struct ScriptedPlacement {
        fail_with: Option<PlacementError>,
        seen: Mutex<Vec<PlaceOrderRequest>>,
    }

    impl ScriptedPlacement {
        fn accepting() -> Self {
            Self {
                fail_with: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: PlacementError) -> Self {
            Self {
                fail_with: Some(err),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl OrderPlacement for ScriptedPlacement {
        fn place_order(
            &self,
            customer_id: &CustomerId,
            request: &PlaceOrderRequest,
        ) -> Result<Order, PlacementError> {
            self.seen.lock().unwrap().push(request.clone());
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            let items = request
                .items
                .iter()
                .map(|l| OrderItem {
                    product_id: l.product_id.clone(),
                    product_name: l.product_id.to_string(),
                    supplier_id: l.supplier_id.clone(),
                    quantity: l.quantity,
                    unit_price: Money::new(1),
                })
                .collect();
            Ok(Order::pending(
                customer_id.clone(),
                items,
                request.shipping_address.clone(),
                chrono::Utc::now(),
            ))
        }
    }

    fn filled_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(&Product::new("A", "Product A", Money::new(1000), 10, "f1"), 3);
        cart.add(&Product::new("B", "Product B", Money::new(500), 10, "f2"), 1);
        cart
    }

    fn customer() -> CustomerId {
        CustomerId::new("c-1")
    }

    #[test]
    fn successful_placement_clears_the_cart() {
        let checkout = Checkout::new(ScriptedPlacement::accepting());
        let mut cart = filled_cart();

        let order = checkout
            .place_order(&mut cart, &customer(), "  Douala parcours vita  ")
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 2);
        assert!(cart.is_empty());

        let seen = checkout.placement().seen.lock().unwrap();
        assert_eq!(seen[0].shipping_address, "Douala parcours vita");
        assert_eq!(seen[0].items[0].quantity, 3);
    }

    #[test]
    fn failed_placement_keeps_the_cart() {
        let checkout = Checkout::new(ScriptedPlacement::failing(PlacementError::transport(
            "connection refused",
        )));
        let mut cart = filled_cart();
        let before = cart.clone();

        let err = checkout
            .place_order(&mut cart, &customer(), "Douala")
            .unwrap_err();

        assert_eq!(
            err,
            CheckoutError::Placement(PlacementError::transport("connection refused"))
        );
        assert_eq!(cart, before);
    }

    #[test]
    fn blank_address_is_rejected_before_placement() {
        let checkout = Checkout::new(ScriptedPlacement::accepting());
        let mut cart = filled_cart();

        let err = checkout.place_order(&mut cart, &customer(), "   ").unwrap_err();

        assert_eq!(err, CheckoutError::MissingShippingAddress);
        assert!(checkout.placement().seen.lock().unwrap().is_empty());
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn empty_cart_is_rejected_before_placement() {
        let checkout = Checkout::new(ScriptedPlacement::accepting());
        let mut cart = Cart::new();

        let err = checkout.place_order(&mut cart, &customer(), "Douala").unwrap_err();

        assert_eq!(err, CheckoutError::EmptyCart);
        assert!(checkout.placement().seen.lock().unwrap().is_empty());
    }

    #[test]
    fn prepare_does_not_mutate_the_cart() {
        let checkout = Checkout::new(ScriptedPlacement::accepting());
        let cart = filled_cart();

        let request = checkout.prepare(&cart, "Douala").unwrap();

        assert_eq!(request.items, cart.to_order_lines());
        assert_eq!(cart.quantity_of(&ProductId::new("A")), 3);
    }
}
