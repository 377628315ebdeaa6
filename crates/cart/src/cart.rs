use core::convert::Infallible;

use serde::{Deserialize, Serialize};

use storefront_catalog::Product;
use storefront_core::{Aggregate, AggregateRoot, CartId, Money, ProductId, SupplierId};
use storefront_events::Event;

/// One product/quantity pair. The product is a copy taken when it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    product: Product,
    quantity: u32,
}

impl CartLine {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit price × quantity`.
    pub fn line_total(&self) -> Money {
        self.product.price.times(self.quantity)
    }
}

/// Order-placement projection of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub supplier_id: SupplierId,
    pub quantity: u32,
}

/// Read-only copy of the cart's lines, in cart order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
}

/// Aggregate root: Cart.
///
/// Invariants:
/// - at most one line per product id
/// - every line has `quantity >= 1`
/// - lines keep insertion order; updates happen in place
///
/// No operation fails. Inputs that would break an invariant degrade to no-ops.
/// Stock ceilings and cart size limits are the caller's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    id: CartId,
    lines: Vec<CartLine>,
    version: u64,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Empty cart for the current session.
    pub fn new() -> Self {
        Self::with_id(CartId::default())
    }

    pub fn with_id(id: CartId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            version: 0,
        }
    }

    /// Rebuild a cart from a persisted snapshot.
    ///
    /// Lines go through `add`, so duplicate product ids merge (first position
    /// wins) and zero-quantity lines are dropped.
    pub fn from_snapshot(id: CartId, snapshot: CartSnapshot) -> Self {
        let mut cart = Self::with_id(id);
        for line in snapshot.lines {
            cart.add(&line.product, line.quantity);
        }
        cart
    }

    pub fn id_typed(&self) -> &CartId {
        &self.id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id() == product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.line(product_id).is_some()
    }

    /// Quantity held for `product_id` (0 when absent).
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.line(product_id).map_or(0, CartLine::quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of `unit price × quantity` across all lines.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add `quantity` units of `product`.
    ///
    /// Merges into the existing line when the product is already in the cart,
    /// otherwise appends a new line. `quantity == 0` is a no-op.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Vec<CartEvent> {
        self.run(CartCommand::AddItem(AddItem {
            product: product.clone(),
            quantity,
        }))
    }

    pub fn add_one(&mut self, product: &Product) -> Vec<CartEvent> {
        self.add(product, 1)
    }

    /// Remove the line for `product_id`; no-op if absent.
    pub fn remove(&mut self, product_id: &ProductId) -> Vec<CartEvent> {
        self.run(CartCommand::RemoveItem(RemoveItem {
            product_id: product_id.clone(),
        }))
    }

    /// Set the quantity of an existing line.
    ///
    /// `quantity <= 0` removes the line. An absent product stays absent.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> Vec<CartEvent> {
        self.run(CartCommand::SetQuantity(SetQuantity {
            product_id: product_id.clone(),
            quantity,
        }))
    }

    pub fn clear(&mut self) -> Vec<CartEvent> {
        self.run(CartCommand::ClearCart(ClearCart))
    }

    /// Order-placement payload lines, in cart order. Does not touch the cart.
    pub fn to_order_lines(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|l| OrderLine {
                product_id: l.product.id.clone(),
                supplier_id: l.product.supplier_id.clone(),
                quantity: l.quantity,
            })
            .collect()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
        }
    }

    fn run(&mut self, command: CartCommand) -> Vec<CartEvent> {
        let events = match self.execute(&command) {
            Ok(events) => events,
            Err(never) => match never {},
        };
        for event in &events {
            tracing::debug!(
                cart_id = %self.id,
                event_type = event.event_type(),
                item_count = self.item_count(),
                "cart updated"
            );
        }
        events
    }
}

impl AggregateRoot for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub product: Product,
    pub quantity: u32,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub product_id: ProductId,
}

/// Command: SetQuantity. Signed, because UI steppers go below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetQuantity {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddItem(AddItem),
    RemoveItem(RemoveItem),
    SetQuantity(SetQuantity),
    ClearCart(ClearCart),
}

/// Event: LineAdded (a new line appended at the end).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAdded {
    pub product: Product,
    pub quantity: u32,
}

/// Event: QuantityChanged. Carries the new absolute quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Event: LineRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRemoved {
    pub product_id: ProductId,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub lines_removed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    LineAdded(LineAdded),
    QuantityChanged(QuantityChanged),
    LineRemoved(LineRemoved),
    CartCleared(CartCleared),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::LineAdded(_) => "cart.line.added",
            CartEvent::QuantityChanged(_) => "cart.line.quantity_changed",
            CartEvent::LineRemoved(_) => "cart.line.removed",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = Infallible;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::LineAdded(e) => match self.line_mut(&e.product.id) {
                // Replaying a LineAdded for a product already present merges
                // rather than duplicating the line.
                Some(line) => line.quantity = line.quantity.saturating_add(e.quantity),
                None => self.lines.push(CartLine::new(e.product.clone(), e.quantity)),
            },
            CartEvent::QuantityChanged(e) => {
                if let Some(line) = self.line_mut(&e.product_id) {
                    line.quantity = e.quantity;
                }
            }
            CartEvent::LineRemoved(e) => {
                self.lines.retain(|l| l.product_id() != &e.product_id);
            }
            CartEvent::CartCleared(_) => {
                self.lines.clear();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        Ok(match command {
            CartCommand::AddItem(cmd) => self.handle_add(cmd),
            CartCommand::RemoveItem(cmd) => self.handle_remove(&cmd.product_id),
            CartCommand::SetQuantity(cmd) => self.handle_set_quantity(cmd),
            CartCommand::ClearCart(_) => self.handle_clear(),
        })
    }
}

impl Cart {
    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id() == product_id)
    }

    fn handle_add(&self, cmd: &AddItem) -> Vec<CartEvent> {
        if cmd.quantity == 0 {
            return Vec::new();
        }

        match self.line(&cmd.product.id) {
            Some(line) => {
                let quantity = line.quantity.saturating_add(cmd.quantity);
                if quantity == line.quantity {
                    return Vec::new();
                }
                vec![CartEvent::QuantityChanged(QuantityChanged {
                    product_id: cmd.product.id.clone(),
                    quantity,
                })]
            }
            None => vec![CartEvent::LineAdded(LineAdded {
                product: cmd.product.clone(),
                quantity: cmd.quantity,
            })],
        }
    }

    fn handle_remove(&self, product_id: &ProductId) -> Vec<CartEvent> {
        if !self.contains(product_id) {
            return Vec::new();
        }
        vec![CartEvent::LineRemoved(LineRemoved {
            product_id: product_id.clone(),
        })]
    }

    fn handle_set_quantity(&self, cmd: &SetQuantity) -> Vec<CartEvent> {
        if cmd.quantity <= 0 {
            return self.handle_remove(&cmd.product_id);
        }

        let Some(line) = self.line(&cmd.product_id) else {
            return Vec::new();
        };
        let quantity = u32::try_from(cmd.quantity).unwrap_or(u32::MAX);
        if quantity == line.quantity {
            return Vec::new();
        }
        vec![CartEvent::QuantityChanged(QuantityChanged {
            product_id: cmd.product_id.clone(),
            quantity,
        })]
    }

    fn handle_clear(&self) -> Vec<CartEvent> {
        if self.lines.is_empty() {
            return Vec::new();
        }
        vec![CartEvent::CartCleared(CartCleared {
            lines_removed: self.lines.len(),
        })]
    }
}
