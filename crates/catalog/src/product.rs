use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, Money, ProductId, StoreId, SupplierId};

/// Catalog product as served by the backend (`/api/products`).
///
/// The cart snapshots products by value; it never mutates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price in the smallest currency unit.
    pub price: Money,
    /// Units available at the supplier.
    pub stock: u32,
    pub supplier_id: SupplierId,
    pub store_id: StoreId,
    #[serde(default)]
    pub category: String,
    pub available: bool,
}

impl Product {
    /// Minimal available product; the remaining fields take neutral defaults.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        stock: u32,
        supplier_id: impl Into<SupplierId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            stock,
            supplier_id: supplier_id.into(),
            store_id: StoreId::new("default"),
            category: String::new(),
            available: true,
        }
    }

    pub fn in_store(mut self, store_id: impl Into<StoreId>) -> Self {
        self.store_id = store_id.into();
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the supplier can fulfil `quantity` units right now.
    pub fn can_sell(&self, quantity: u32) -> bool {
        self.available && self.stock >= quantity
    }

    /// Whether the product should be offered at all (listed and in stock).
    pub fn is_purchasable(&self) -> bool {
        self.can_sell(1)
    }

    /// Take `quantity` units out of stock; the product becomes unavailable at zero.
    pub fn decrease_stock(&mut self, quantity: u32) -> DomainResult<()> {
        if !self.can_sell(quantity) {
            return Err(DomainError::invariant(format!(
                "insufficient stock for {} (available: {}, requested: {})",
                self.name, self.stock, quantity
            )));
        }
        self.stock -= quantity;
        if self.stock == 0 {
            self.available = false;
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
