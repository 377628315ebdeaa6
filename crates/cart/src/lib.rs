//! Shopping cart domain module.
//!
//! The cart is the session's single source of truth for what the shopper
//! selected, how many units, and what it costs. It is pure, synchronous domain
//! logic (no IO, no HTTP, no storage), expressed as commands and events like
//! every other aggregate in the workspace.

pub mod cart;
pub mod handle;
pub mod observable;

pub use cart::{
    AddItem, Cart, CartCleared, CartCommand, CartEvent, CartLine, CartSnapshot, ClearCart,
    LineAdded, LineRemoved, OrderLine, QuantityChanged, RemoveItem, SetQuantity,
};
pub use handle::CartHandle;
pub use observable::ObservableCart;
pub use storefront_core::CartId;
