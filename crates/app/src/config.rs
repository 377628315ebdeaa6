//! Environment configuration.

use thiserror::Error;

use storefront_core::CustomerId;
use storefront_observability::LogFormat;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    Empty { var: &'static str },

    #[error("{var} has unsupported value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Runtime configuration, read from `STOREFRONT_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Key the cart is persisted under (`STOREFRONT_CART_KEY`, default `cart`).
    pub cart_key: String,
    /// Currency label for display (`STOREFRONT_CURRENCY`, default `FCFA`).
    pub currency: String,
    /// Customer placing orders (`STOREFRONT_CUSTOMER_ID`, default `guest`).
    pub customer_id: CustomerId,
    /// Pre-filled shipping address (`STOREFRONT_SHIPPING_ADDRESS`).
    pub shipping_address: Option<String>,
    /// `STOREFRONT_LOG_FORMAT`: `json` (default) or `pretty`.
    pub log_format: LogFormat,
}

impl AppConfig {
    pub const CART_KEY: &'static str = "STOREFRONT_CART_KEY";
    pub const CURRENCY: &'static str = "STOREFRONT_CURRENCY";
    pub const CUSTOMER_ID: &'static str = "STOREFRONT_CUSTOMER_ID";
    pub const SHIPPING_ADDRESS: &'static str = "STOREFRONT_SHIPPING_ADDRESS";
    pub const LOG_FORMAT: &'static str = "STOREFRONT_LOG_FORMAT";

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cart_key = non_empty(&lookup, Self::CART_KEY)?.unwrap_or_else(|| "cart".to_string());
        let currency = non_empty(&lookup, Self::CURRENCY)?.unwrap_or_else(|| "FCFA".to_string());

        let customer_id = match non_empty(&lookup, Self::CUSTOMER_ID)? {
            Some(raw) => CustomerId::new(raw),
            None => {
                tracing::warn!("{} not set; ordering as guest", Self::CUSTOMER_ID);
                CustomerId::new("guest")
            }
        };

        let shipping_address = lookup(Self::SHIPPING_ADDRESS)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty());

        let log_format = match lookup(Self::LOG_FORMAT) {
            None => LogFormat::default(),
            Some(raw) => LogFormat::parse(&raw).ok_or(ConfigError::Invalid {
                var: Self::LOG_FORMAT,
                value: raw,
            })?,
        };

        Ok(Self {
            cart_key,
            currency,
            customer_id,
            shipping_address,
            log_format,
        })
    }
}

/// `Ok(None)` when unset, `Err` when set but blank.
fn non_empty<F>(lookup: &F, var: &'static str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Err(ConfigError::Empty { var }),
        Some(raw) => Ok(Some(raw.trim().to_string())),
    }
}
