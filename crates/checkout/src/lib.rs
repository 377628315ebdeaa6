//! Checkout: turning a cart into a placed order.
//!
//! The cart is projected into a [`PlaceOrderRequest`], handed to an
//! [`OrderPlacement`] collaborator, and cleared only once that collaborator
//! confirms the order. Stock checks live here too, as caller-side policy; the
//! cart itself never enforces them.

pub mod checkout;
pub mod error;
pub mod order;
pub mod placement;
pub mod request;
pub mod stock;

pub use checkout::Checkout;
pub use error::{CheckoutError, PlacementError};
pub use order::{Order, OrderItem, OrderStatus};
pub use placement::{CatalogOrderPlacement, OrderHistory, OrderPlacement};
pub use request::PlaceOrderRequest;
