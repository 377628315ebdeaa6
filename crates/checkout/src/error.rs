use thiserror::Error;

use storefront_core::{DomainError, ProductId};

/// Failure reported by an order-placement collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// The order service refused the order (unknown product, insufficient stock, ...).
    #[error("order rejected: {0}")]
    Rejected(String),

    /// The order service could not be reached or answered garbage.
    #[error("order service unavailable: {0}")]
    Transport(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl PlacementError {
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("shipping address is required")]
    MissingShippingAddress,

    #[error("cart is empty")]
    EmptyCart,

    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    #[error("product {0} is no longer in the catalog")]
    UnknownProduct(ProductId),

    #[error(transparent)]
    Placement(#[from] PlacementError),
}
