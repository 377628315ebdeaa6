//! `storefront` binary support: configuration and the scripted session it runs.

pub mod config;
pub mod session;

pub use config::{AppConfig, ConfigError};
pub use session::{ShoppingSession, demo_catalog};
