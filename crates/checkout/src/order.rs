use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{
    CustomerId, DomainError, DomainResult, Entity, Money, OrderId, ProductId, SupplierId,
};

/// Order status lifecycle, as the backend reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Position along the fulfilment path; `None` for `Cancelled`.
    fn stage(self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Processing => Some(2),
            OrderStatus::Shipped => Some(3),
            OrderStatus::Delivered => Some(4),
            OrderStatus::Cancelled => None,
        }
    }
}

/// Order line as priced by the order service at placement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    /// Routes fulfilment (and the stock update) to the right supplier.
    pub supplier_id: SupplierId,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderItem {
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// A placed order (order history entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub shipping_address: String,
}

impl Order {
    /// New order in `Pending` with a freshly generated id.
    pub fn pending(
        customer_id: CustomerId,
        items: Vec<OrderItem>,
        shipping_address: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OrderId::generate(),
            customer_id,
            items,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
            shipping_address: shipping_address.into(),
        }
    }

    pub fn total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Only pending orders can be confirmed.
    pub fn confirm(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        if self.status != OrderStatus::Pending {
            return Err(DomainError::invariant("only pending orders can be confirmed"));
        }
        self.status = OrderStatus::Confirmed;
        self.updated_at = at;
        Ok(())
    }

    /// Move the order forward along pending, confirmed, processing, shipped
    /// and delivered. Stages may be skipped, never revisited; cancelling goes
    /// through `cancel`.
    pub fn update_status(&mut self, next: OrderStatus, at: DateTime<Utc>) -> DomainResult<()> {
        let (Some(current), Some(target)) = (self.status.stage(), next.stage()) else {
            return Err(DomainError::invariant(format!(
                "cannot move order from {:?} to {:?}",
                self.status, next
            )));
        };
        if target <= current {
            return Err(DomainError::invariant(format!(
                "order is already {:?}; cannot move back to {:?}",
                self.status, next
            )));
        }
        self.status = next;
        self.updated_at = at;
        Ok(())
    }

    pub fn is_cancellable(&self) -> bool {
        !matches!(
            self.status,
            OrderStatus::Shipped | OrderStatus::Delivered | OrderStatus::Cancelled
        )
    }

    pub fn cancel(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_cancellable() {
            return Err(DomainError::invariant(
                "cannot cancel an order that has shipped, been delivered or been cancelled",
            ));
        }
        self.status = OrderStatus::Cancelled;
        self.updated_at = at;
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
