//! System facade: wires inventory, payments, and the order workflow together
//! and exposes the single order-creation entry point.
//!
//! Everything here is composition; the business rules live in the domain
//! crates.

use std::sync::Arc;

use orderflow_clients::Client;
use orderflow_core::{DomainResult, OrderId, ProductId};
use orderflow_inventory::{InMemoryInventory, StockControl};
use orderflow_orders::{ConfirmationSender, LineItem, Order, OrderDesk};
use orderflow_payments::{PaymentProcessor, SimulatedGateway};

/// The assembled order-management system.
pub struct OrderSystem {
    inventory: Arc<dyn StockControl>,
    desk: OrderDesk,
}

impl OrderSystem {
    /// Demo wiring: the sample catalog and the random simulated gateway.
    pub fn new() -> Self {
        Self::with_components(
            Arc::new(InMemoryInventory::sample()),
            Arc::new(SimulatedGateway::new()),
        )
    }

    /// Custom wiring, e.g. deterministic components for tests.
    pub fn with_components(
        inventory: Arc<dyn StockControl>,
        payments: Arc<dyn PaymentProcessor>,
    ) -> Self {
        let desk = OrderDesk::new(inventory.clone(), payments);
        Self { inventory, desk }
    }

    /// Demo wiring plus process-wide observability.
    pub fn bootstrap() -> Self {
        orderflow_observability::init();
        tracing::info!("order management system started");
        Self::new()
    }

    pub fn set_notifier(&mut self, notifier: Arc<dyn ConfirmationSender>) {
        self.desk.set_notifier(notifier);
    }

    pub fn create_order(&self, client: Client, items: Vec<LineItem>) -> DomainResult<Order> {
        self.desk.create_order(client, items)
    }

    pub fn find_order(&self, id: OrderId) -> Option<Order> {
        self.desk.find_order(id)
    }

    pub fn stock_on_hand(&self, product_id: &ProductId) -> u32 {
        self.inventory.stock_on_hand(product_id)
    }
}

impl Default for OrderSystem {
    fn default() -> Self {
        Self::new()
    }
}
