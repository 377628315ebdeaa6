//! Strongly-typed identifiers used across the storefront.
//!
//! The REST backend hands out opaque string identifiers (`"p-42"`, `"f1"`,
//! UUIDs, ...). Each kind gets its own newtype so a supplier id can never be
//! passed where a product id is expected.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of the supplier that fulfils a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(String);

/// Identifier of the store a product is listed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(String);

/// Identifier of the customer placing orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

/// Identifier of a shopping cart (one cart per user session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(String);

/// Identifier of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Wrap a raw identifier without validation.
            ///
            /// Use `parse` for untrusted input.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty", $name)));
                }
                Ok(Self(trimmed.to_owned()))
            }
        }
    };
}

impl_string_newtype!(ProductId, "ProductId");
impl_string_newtype!(SupplierId, "SupplierId");
impl_string_newtype!(StoreId, "StoreId");
impl_string_newtype!(CustomerId, "CustomerId");
impl_string_newtype!(OrderId, "OrderId");
impl_string_newtype!(CartId, "CartId");

impl Default for CartId {
    fn default() -> Self {
        Self("session".to_owned())
    }
}

impl OrderId {
    /// Generate a fresh order identifier (UUIDv7, time-ordered).
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_blank_identifiers() {
        let err = "   ".parse::<ProductId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) => assert!(msg.contains("ProductId")),
            _ => panic!("Expected InvalidId error"),
        }
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let id: SupplierId = " f1 ".parse().unwrap();
        assert_eq!(id.as_str(), "f1");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&ProductId::new("p-1")).unwrap();
        assert_eq!(json, "\"p-1\"");

        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProductId::new("p-1"));
    }

    #[test]
    fn default_cart_id_names_the_session_cart() {
        assert_eq!(CartId::default().as_str(), "session");
        assert!("".parse::<CartId>().is_err());
    }

    #[test]
    fn generated_order_ids_are_unique() {
        assert_ne!(OrderId::generate(), OrderId::generate());
    }
}
