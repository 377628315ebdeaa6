//! Caller-side stock policy.
//!
//! The cart accepts any quantity; these helpers are what the product pages
//! and the cart stepper call so the shopper can't select more than the
//! supplier holds.

use storefront_cart::{Cart, CartEvent, CartHandle};
use storefront_catalog::{Product, ProductCatalog};
use storefront_core::ProductId;

use crate::error::CheckoutError;

/// Check that the cart could hold `additional` more units of `product`.
pub fn ensure_within_stock(
    cart: &Cart,
    product: &Product,
    additional: u32,
) -> Result<(), CheckoutError> {
    let requested = u64::from(cart.quantity_of(&product.id)) + u64::from(additional);
    if !product.available || requested > u64::from(product.stock) {
        return Err(CheckoutError::InsufficientStock {
            product_id: product.id.clone(),
            requested,
            available: if product.available { product.stock } else { 0 },
        });
    }
    Ok(())
}

/// `add`, refused when it would exceed the product's stock.
pub fn add_within_stock<H>(
    cart: &mut H,
    product: &Product,
    quantity: u32,
) -> Result<Vec<CartEvent>, CheckoutError>
where
    H: CartHandle + ?Sized,
{
    ensure_within_stock(cart.cart(), product, quantity)?;
    Ok(cart.add(product, quantity))
}

/// Stepper "+": one more unit while below stock. Returns whether the cart changed.
pub fn increase_quantity<H>(cart: &mut H, product: &Product) -> bool
where
    H: CartHandle + ?Sized,
{
    if cart.cart().quantity_of(&product.id) >= product.stock {
        return false;
    }
    !cart.add(product, 1).is_empty()
}

/// Stepper "−": one unit less; the line disappears when it reaches zero.
pub fn decrease_quantity<H>(cart: &mut H, product_id: &ProductId) -> bool
where
    H: CartHandle + ?Sized,
{
    let current = cart.cart().quantity_of(product_id);
    if current == 0 {
        return false;
    }
    !cart
        .set_quantity(product_id, i64::from(current) - 1)
        .is_empty()
}

/// Re-check every line against fresh catalog data before placing an order.
pub fn validate_against_catalog<C>(cart: &Cart, catalog: &C) -> Result<(), CheckoutError>
where
    C: ProductCatalog + ?Sized,
{
    for line in cart.lines() {
        let product = catalog
            .find(line.product_id())
            .ok_or_else(|| CheckoutError::UnknownProduct(line.product_id().clone()))?;
        if !product.can_sell(line.quantity()) {
            return Err(CheckoutError::InsufficientStock {
                product_id: product.id,
                requested: u64::from(line.quantity()),
                available: if product.available { product.stock } else { 0 },
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use storefront_catalog::InMemoryCatalog;
    use storefront_core::Money;

    fn lamp(stock: u32) -> Product {
        Product::new("lamp", "Desk lamp", Money::new(7_500), stock, "f1")
    }

    #[test]
    fn increase_stops_at_stock() {
        let mut cart = Cart::new();
        let lamp = lamp(2);

        assert!(increase_quantity(&mut cart, &lamp));
        assert!(increase_quantity(&mut cart, &lamp));
        assert!(!increase_quantity(&mut cart, &lamp));
        assert_eq!(cart.quantity_of(&lamp.id), 2);
    }

    #[test]
    fn decrease_to_zero_removes_the_line() {
        let mut cart = Cart::new();
        cart.add(&lamp(5), 2);

        assert!(decrease_quantity(&mut cart, &ProductId::new("lamp")));
        assert_eq!(cart.quantity_of(&ProductId::new("lamp")), 1);

        assert!(decrease_quantity(&mut cart, &ProductId::new("lamp")));
        assert!(cart.is_empty());

        assert!(!decrease_quantity(&mut cart, &ProductId::new("lamp")));
    }

    #[test]
    fn add_within_stock_refuses_overselling() {
        let mut cart = Cart::new();
        let lamp = lamp(3);
        add_within_stock(&mut cart, &lamp, 2).unwrap();

        let err = add_within_stock(&mut cart, &lamp, 2).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::InsufficientStock {
                product_id: lamp.id.clone(),
                requested: 4,
                available: 3,
            }
        );
        assert_eq!(cart.quantity_of(&lamp.id), 2);
    }

    #[test]
    fn unavailable_products_have_no_usable_stock() {
        let mut lamp = lamp(10);
        lamp.available = false;

        let err = ensure_within_stock(&Cart::new(), &lamp, 1).unwrap_err();
        assert!(matches!(err, CheckoutError::InsufficientStock { available: 0, .. }));
    }

    #[test]
    fn validate_against_catalog_uses_fresh_stock() {
        let mut cart = Cart::new();
        cart.add(&lamp(10), 4);

        let catalog = InMemoryCatalog::with_products([lamp(10)]);
        validate_against_catalog(&cart, &catalog).unwrap();

        catalog.upsert(lamp(3)).unwrap();
        let err = validate_against_catalog(&cart, &catalog).unwrap_err();
        assert!(matches!(err, CheckoutError::InsufficientStock { requested: 4, available: 3, .. }));

        let empty = InMemoryCatalog::new();
        let err = validate_against_catalog(&cart, &empty).unwrap_err();
        assert_eq!(err, CheckoutError::UnknownProduct(ProductId::new("lamp")));
    }

    proptest! {
        /// Property: no sequence of stepper presses exceeds stock.
        #[test]
        fn stepper_never_exceeds_stock(stock in 0u32..20, presses in proptest::collection::vec(any::<bool>(), 0..60)) {
            let mut cart = Cart::new();
            let lamp = lamp(stock);
            for up in presses {
                if up {
                    increase_quantity(&mut cart, &lamp);
                } else {
                    decrease_quantity(&mut cart, &lamp.id);
                }
                prop_assert!(cart.quantity_of(&lamp.id) <= stock);
            }
        }
    }
}
