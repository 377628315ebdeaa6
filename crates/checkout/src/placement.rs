//! Order-placement collaborators.

use std::sync::RwLock;

use chrono::Utc;

use storefront_catalog::{ProductCatalog, StockLedger, merge_quantities};
use storefront_core::{CustomerId, DomainError, DomainResult, OrderId, ProductId};

use crate::error::PlacementError;
use crate::order::{Order, OrderItem, OrderStatus};
use crate::request::PlaceOrderRequest;

/// Places orders with the backend.
///
/// Production implementations wrap the REST endpoint; transport details stay
/// behind this trait. An `Ok` means the order exists server-side.
pub trait OrderPlacement: Send + Sync {
    fn place_order(
        &self,
        customer_id: &CustomerId,
        request: &PlaceOrderRequest,
    ) -> Result<Order, PlacementError>;
}

/// Read/cancel access to placed orders (order history page).
pub trait OrderHistory: Send + Sync {
    fn find(&self, order_id: &OrderId) -> Result<Option<Order>, PlacementError>;

    /// Orders of one customer, oldest first.
    fn for_customer(&self, customer_id: &CustomerId) -> Result<Vec<Order>, PlacementError>;

    fn cancel(&self, order_id: &OrderId) -> Result<Order, PlacementError>;

    /// Move an order forward in its fulfilment lifecycle (admin/order service).
    fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, PlacementError>;
}

impl<P> OrderPlacement for std::sync::Arc<P>
where
    P: OrderPlacement + ?Sized,
{
    fn place_order(
        &self,
        customer_id: &CustomerId,
        request: &PlaceOrderRequest,
    ) -> Result<Order, PlacementError> {
        (**self).place_order(customer_id, request)
    }
}

/// In-process order service backed by a product catalog.
///
/// Follows the backend's placement rules:
/// 1. every line must reference a known product of the named supplier
/// 2. each product must be able to sell the summed quantity of all lines
///    naming it (all lines are checked before any stock moves)
/// 3. items are priced and named from the catalog, not from the cart
/// 4. stock is decreased for all lines in one step; on failure nothing moves
/// 5. the order is created `Pending`, then confirmed
#[derive(Debug)]
pub struct CatalogOrderPlacement<C> {
    catalog: C,
    orders: RwLock<Vec<Order>>,
}

impl<C> CatalogOrderPlacement<C>
where
    C: ProductCatalog + StockLedger,
{
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            orders: RwLock::new(Vec::new()),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    fn price_items(&self, request: &PlaceOrderRequest) -> Result<Vec<OrderItem>, PlacementError> {
        let items = request
            .items
            .iter()
            .map(|line| {
                let product = self.catalog.find(&line.product_id).ok_or_else(|| {
                    PlacementError::rejected(format!("unknown product {}", line.product_id))
                })?;

                if product.supplier_id != line.supplier_id {
                    return Err(PlacementError::rejected(format!(
                        "product {} is not supplied by {}",
                        line.product_id, line.supplier_id
                    )));
                }

                Ok(OrderItem {
                    product_id: product.id,
                    product_name: product.name,
                    supplier_id: product.supplier_id,
                    quantity: line.quantity,
                    unit_price: product.price,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.check_stock(&stock_lines(&items))?;
        Ok(items)
    }

    /// Lines naming the same product are checked against its stock together.
    fn check_stock(&self, lines: &[(ProductId, u32)]) -> Result<(), PlacementError> {
        for (product_id, requested) in merge_quantities(lines) {
            let product = self.catalog.get(&product_id)?;
            let sellable = u32::try_from(requested).is_ok_and(|q| product.can_sell(q));
            if !sellable {
                return Err(PlacementError::rejected(format!(
                    "insufficient stock for {} (supplier: {}, available: {}, requested: {})",
                    product.name, product.supplier_id, product.stock, requested
                )));
            }
        }
        Ok(())
    }
}

fn stock_lines(items: &[OrderItem]) -> Vec<(ProductId, u32)> {
    items
        .iter()
        .map(|item| (item.product_id.clone(), item.quantity))
        .collect()
}

impl<C> OrderPlacement for CatalogOrderPlacement<C>
where
    C: ProductCatalog + StockLedger,
{
    fn place_order(
        &self,
        customer_id: &CustomerId,
        request: &PlaceOrderRequest,
    ) -> Result<Order, PlacementError> {
        if request.items.is_empty() {
            return Err(PlacementError::rejected("order has no items"));
        }
        if request.shipping_address.trim().is_empty() {
            return Err(PlacementError::rejected("shipping address is required"));
        }

        let items = self.price_items(request)?;

        for product in self.catalog.decrease_stock_all(&stock_lines(&items))? {
            tracing::info!(
                supplier_id = %product.supplier_id,
                product_id = %product.id,
                remaining_stock = product.stock,
                "stock updated"
            );
        }

        let now = Utc::now();
        let mut order = Order::pending(
            customer_id.clone(),
            items,
            request.shipping_address.clone(),
            now,
        );
        order.confirm(now)?;

        self.orders
            .write()
            .map_err(|_| DomainError::invariant("order store lock poisoned"))?
            .push(order.clone());

        tracing::info!(
            order_id = %order.id,
            customer_id = %customer_id,
            item_count = order.item_count(),
            total = %order.total(),
            "order placed"
        );
        Ok(order)
    }
}

impl<C> OrderHistory for CatalogOrderPlacement<C>
where
    C: ProductCatalog + StockLedger,
{
    fn find(&self, order_id: &OrderId) -> Result<Option<Order>, PlacementError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| DomainError::invariant("order store lock poisoned"))?;
        Ok(orders.iter().find(|o| &o.id == order_id).cloned())
    }

    fn for_customer(&self, customer_id: &CustomerId) -> Result<Vec<Order>, PlacementError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| DomainError::invariant("order store lock poisoned"))?;
        Ok(orders
            .iter()
            .filter(|o| &o.customer_id == customer_id)
            .cloned()
            .collect())
    }

    fn cancel(&self, order_id: &OrderId) -> Result<Order, PlacementError> {
        let order = self.modify(order_id, |order| order.cancel(Utc::now()))?;
        tracing::info!(order_id = %order_id, "order cancelled");
        Ok(order)
    }

    fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, PlacementError> {
        let order = self.modify(order_id, |order| order.update_status(status, Utc::now()))?;
        tracing::info!(order_id = %order_id, status = ?status, "order status updated");
        Ok(order)
    }
}

impl<C> CatalogOrderPlacement<C> {
    /// Apply `change` to a stored order under the write lock.
    fn modify<F>(&self, order_id: &OrderId, change: F) -> Result<Order, PlacementError>
    where
        F: FnOnce(&mut Order) -> DomainResult<()>,
    {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| DomainError::invariant("order store lock poisoned"))?;
        let order = orders
            .iter_mut()
            .find(|o| &o.id == order_id)
            .ok_or_else(|| DomainError::not_found(format!("order {order_id}")))?;

        change(order)?;
        Ok(order.clone())
    }
}
