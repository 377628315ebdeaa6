//! Product catalog domain module.
//!
//! Products are owned by the backend catalog; the storefront only reads them.
//! This crate holds the product record plus the collaborator traits the rest
//! of the workspace uses to look products up (no IO, no HTTP).

pub mod catalog;
pub mod product;

pub use catalog::{InMemoryCatalog, ProductCatalog, StockLedger, merge_quantities};
pub use product::Product;
