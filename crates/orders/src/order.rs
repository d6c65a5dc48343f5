use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderflow_clients::Client;
use orderflow_core::{DomainError, DomainResult, Entity, OrderId, ProductId, ValueObject};
use orderflow_inventory::StockDemand;

/// Order status lifecycle.
///
/// `InProgress` is the only non-terminal state; the workflow settles every
/// order into exactly one of the four terminal states before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    InProgress,
    Completed,
    CanceledStock,
    CanceledPayment,
    CanceledError,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::InProgress)
    }
}

/// Value object: one ordered line — product, quantity, unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    product_id: ProductId,
    product_name: String,
    quantity: u32,
    unit_price: f64,
}

impl LineItem {
    /// Construct a line item. Quantity and unit price must be positive,
    /// product id and name non-empty.
    pub fn new(
        product_id: impl Into<ProductId>,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: f64,
    ) -> DomainResult<Self> {
        let product_id = product_id.into();
        let product_name = product_name.into();

        if product_id.is_empty() {
            return Err(DomainError::validation("product id cannot be empty"));
        }
        if product_name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if !(unit_price > 0.0) || !unit_price.is_finite() {
            return Err(DomainError::validation("unit price must be positive"));
        }

        Ok(Self {
            product_id,
            product_name,
            quantity,
            unit_price,
        })
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }

    /// Inventory-side view of this line.
    pub fn demand(&self) -> StockDemand {
        StockDemand::new(self.product_id.clone(), self.quantity)
    }
}

impl ValueObject for LineItem {}

/// Entity: a single order transaction.
///
/// Client and items are snapshotted at creation and immutable thereafter;
/// the status is the only mutable field, written once per workflow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    client: Client,
    items: Vec<LineItem>,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Open a new order: fresh id, status `InProgress`, creation timestamp.
    /// Rejects an empty item list.
    pub fn open(client: Client, items: Vec<LineItem>) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation(
                "order must contain at least one line item",
            ));
        }

        Ok(Self {
            id: OrderId::new(),
            client,
            items,
            status: OrderStatus::InProgress,
            created_at: Utc::now(),
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sum of line subtotals. No side effects.
    pub fn total(&self) -> f64 {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Overwrite the status.
    ///
    /// Deliberately loose: no transition table, any status can replace any
    /// other. The workflow is the only writer and writes exactly once per
    /// step; `OrderStatus::is_terminal` documents the intended lifecycle
    /// without enforcing it here.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
