//! Catalog collaborators.

use std::sync::{Arc, RwLock};

use storefront_core::{DomainError, DomainResult, ProductId, SupplierId};

use crate::product::Product;

/// Read access to the product catalog.
///
/// Mirrors the backend's product listing endpoints; implementations may be
/// an HTTP client, a cache, or the in-memory catalog below.
pub trait ProductCatalog: Send + Sync {
    /// All listed products, in catalog order.
    fn all(&self) -> Vec<Product>;

    fn find(&self, id: &ProductId) -> Option<Product>;

    /// Like `find`, but an unknown id is a `NotFound` error.
    fn get(&self, id: &ProductId) -> DomainResult<Product> {
        self.find(id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }

    fn by_supplier(&self, supplier_id: &SupplierId) -> Vec<Product> {
        self.all()
            .into_iter()
            .filter(|p| &p.supplier_id == supplier_id)
            .collect()
    }

    fn by_category(&self, category: &str) -> Vec<Product> {
        self.all()
            .into_iter()
            .filter(|p| p.category == category)
            .collect()
    }
}

/// Stock bookkeeping performed when an order is accepted.
pub trait StockLedger: Send + Sync {
    /// Remove `quantity` units, returning the updated product.
    fn decrease_stock(&self, id: &ProductId, quantity: u32) -> DomainResult<Product>;

    /// Remove stock for several lines at once, all or nothing.
    ///
    /// Quantities naming the same product are summed before checking. On
    /// error no product has changed. Returns the updated products in first
    /// mention order.
    fn decrease_stock_all(&self, items: &[(ProductId, u32)]) -> DomainResult<Vec<Product>>;
}

impl<C> ProductCatalog for Arc<C>
where
    C: ProductCatalog + ?Sized,
{
    fn all(&self) -> Vec<Product> {
        (**self).all()
    }

    fn find(&self, id: &ProductId) -> Option<Product> {
        (**self).find(id)
    }
}

impl<C> StockLedger for Arc<C>
where
    C: StockLedger + ?Sized,
{
    fn decrease_stock(&self, id: &ProductId, quantity: u32) -> DomainResult<Product> {
        (**self).decrease_stock(id, quantity)
    }

    fn decrease_stock_all(&self, items: &[(ProductId, u32)]) -> DomainResult<Vec<Product>> {
        (**self).decrease_stock_all(items)
    }
}

/// Sum quantities per product id, keeping first mention order.
pub fn merge_quantities(items: &[(ProductId, u32)]) -> Vec<(ProductId, u64)> {
    let mut merged: Vec<(ProductId, u64)> = Vec::with_capacity(items.len());
    for (id, quantity) in items {
        match merged.iter_mut().find(|(seen, _)| seen == id) {
            Some((_, total)) => *total += u64::from(*quantity),
            None => merged.push((id.clone(), u64::from(*quantity))),
        }
    }
    merged
}

/// In-memory catalog for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<Vec<Product>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later products replace earlier ones with the same id, in place.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut listed = Vec::new();
        for product in products {
            insert_or_replace(&mut listed, product);
        }
        Self {
            products: RwLock::new(listed),
        }
    }

    /// Insert a product, replacing any existing product with the same id in place.
    pub fn upsert(&self, product: Product) -> DomainResult<()> {
        let mut products = self
            .products
            .write()
            .map_err(|_| DomainError::invariant("catalog lock poisoned"))?;
        tracing::debug!(product_id = %product.id, "product upserted");
        insert_or_replace(&mut products, product);
        Ok(())
    }
}

fn insert_or_replace(products: &mut Vec<Product>, product: Product) {
    match products.iter_mut().find(|p| p.id == product.id) {
        Some(existing) => *existing = product,
        None => products.push(product),
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn all(&self) -> Vec<Product> {
        self.products.read().map(|p| p.clone()).unwrap_or_default()
    }

    fn find(&self, id: &ProductId) -> Option<Product> {
        self.products
            .read()
            .ok()?
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }
}

impl StockLedger for InMemoryCatalog {
    fn decrease_stock(&self, id: &ProductId, quantity: u32) -> DomainResult<Product> {
        let mut products = self
            .products
            .write()
            .map_err(|_| DomainError::invariant("catalog lock poisoned"))?;
        let product = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))?;

        product.decrease_stock(quantity)?;
        tracing::debug!(
            product_id = %id,
            supplier_id = %product.supplier_id,
            remaining = product.stock,
            "stock decreased"
        );
        Ok(product.clone())
    }

    fn decrease_stock_all(&self, items: &[(ProductId, u32)]) -> DomainResult<Vec<Product>> {
        let mut products = self
            .products
            .write()
            .map_err(|_| DomainError::invariant("catalog lock poisoned"))?;
        let merged = merge_quantities(items);

        // Check every product before touching any of them.
        let mut staged = Vec::with_capacity(merged.len());
        for (id, total) in &merged {
            let index = products
                .iter()
                .position(|p| &p.id == id)
                .ok_or_else(|| DomainError::not_found(format!("product {id}")))?;
            let quantity = u32::try_from(*total).map_err(|_| {
                DomainError::invariant(format!("requested quantity for {id} is too large"))
            })?;
            let mut updated = products[index].clone();
            updated.decrease_stock(quantity)?;
            staged.push((index, updated));
        }

        let mut result = Vec::with_capacity(staged.len());
        for (index, updated) in staged {
            tracing::debug!(
                product_id = %updated.id,
                supplier_id = %updated.supplier_id,
                remaining = updated.stock,
                "stock decreased"
            );
            products[index] = updated.clone();
            result.push(updated);
        }
        Ok(result)
    }
}
