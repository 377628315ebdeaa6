//! Session persistence.
//!
//! Browser-style key-value storage abstracted as a trait, and cart
//! save/restore layered on top so a cart survives a reload.

pub mod cart_store;
pub mod store;

pub use cart_store::CartStore;
pub use store::{InMemoryKeyValueStore, KeyValueStore, StoreError};
