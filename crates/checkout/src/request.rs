use serde::{Deserialize, Serialize};

use storefront_cart::{Cart, OrderLine};

/// Payload sent to the order service (`POST /api/orders`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderLine>,
    pub shipping_address: String,
}

impl PlaceOrderRequest {
    /// Snapshot the cart's lines; later cart mutations don't affect the request.
    pub fn from_cart(cart: &Cart, shipping_address: impl Into<String>) -> Self {
        Self {
            items: cart.to_order_lines(),
            shipping_address: shipping_address.into(),
        }
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_catalog::Product;
    use storefront_core::Money;

    #[test]
    fn request_is_detached_from_the_cart() {
        let mut cart = Cart::new();
        let product = Product::new("A", "Product A", Money::new(1000), 5, "f1");
        cart.add(&product, 2);

        let request = PlaceOrderRequest::from_cart(&cart, "Yaoundé");
        cart.add(&product, 1);

        assert_eq!(request.items[0].quantity, 2);
        assert_eq!(request.item_count(), 2);
    }

    #[test]
    fn serializes_to_backend_shape() {
        let mut cart = Cart::new();
        cart.add(&Product::new("A", "Product A", Money::new(1000), 5, "f1"), 2);

        let json = serde_json::to_value(PlaceOrderRequest::from_cart(&cart, "Douala")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": [{ "productId": "A", "supplierId": "f1", "quantity": 2 }],
                "shippingAddress": "Douala"
            })
        );
    }
}
