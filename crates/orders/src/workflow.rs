//! Order-creation workflow.
//!
//! Orchestrates one order at a time through reservation → payment →
//! compensation, settling the order into exactly one terminal status per
//! invocation. No retries: callers resubmit a fresh order if they want
//! another attempt.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use orderflow_clients::Client;
use orderflow_core::{DomainResult, OrderId};
use orderflow_inventory::{StockControl, StockDemand};
use orderflow_payments::{PaymentProcessor, PaymentRequest};

use crate::notify::ConfirmationSender;
use crate::order::{LineItem, Order, OrderStatus};

/// The workflow orchestrator.
///
/// Holds the inventory and payment collaborators, an optional late-bound
/// notifier, and a log of every finished order. Order processing is
/// serialized: reservation, payment, and any compensating revert run as one
/// critical section, so two concurrent orders can never both take the last
/// unit of a product.
pub struct OrderDesk {
    inventory: Arc<dyn StockControl>,
    payments: Arc<dyn PaymentProcessor>,
    notifier: Option<Arc<dyn ConfirmationSender>>,
    ledger: Mutex<HashMap<OrderId, Order>>,
    serial: Mutex<()>,
}

impl OrderDesk {
    pub fn new(inventory: Arc<dyn StockControl>, payments: Arc<dyn PaymentProcessor>) -> Self {
        Self {
            inventory,
            payments,
            notifier: None,
            ledger: Mutex::new(HashMap::new()),
            serial: Mutex::new(()),
        }
    }

    /// Attach the confirmation channel. Optional and late-bound: a desk
    /// without one simply skips notification.
    pub fn set_notifier(&mut self, notifier: Arc<dyn ConfirmationSender>) {
        self.notifier = Some(notifier);
    }

    /// Create an order for `client` covering `items`.
    ///
    /// Returns the order in a terminal status. A failed reservation or a
    /// declined payment is an ordinary outcome (`CanceledStock` /
    /// `CanceledPayment`), not an error. A payment *error* surfaces to the
    /// caller, but only after the reservation has been reverted and the
    /// order recorded as `CanceledError` — look it up via [`find_order`].
    ///
    /// [`find_order`]: OrderDesk::find_order
    pub fn create_order(&self, client: Client, items: Vec<LineItem>) -> DomainResult<Order> {
        let mut order = Order::open(client, items)?;
        let demands: Vec<StockDemand> = order.items().iter().map(LineItem::demand).collect();

        let _serial = lock(&self.serial);

        if !self.inventory.reserve_stock(&demands) {
            order.set_status(OrderStatus::CanceledStock);
            tracing::info!(order_id = %order.id_typed(), "order canceled, insufficient stock");
            return Ok(self.record(order));
        }

        let request = PaymentRequest {
            order_id: order.id_typed(),
            amount: order.total(),
        };
        match self.payments.process_payment(&request) {
            Ok(true) => {
                order.set_status(OrderStatus::Completed);
                tracing::info!(
                    order_id = %order.id_typed(),
                    total = order.total(),
                    "order completed"
                );
            }
            Ok(false) => {
                self.inventory.revert_reservation(&demands);
                order.set_status(OrderStatus::CanceledPayment);
                tracing::info!(order_id = %order.id_typed(), "order canceled, payment declined");
            }
            Err(err) => {
                // Compensation and the terminal status write both happen
                // before the error surfaces, so the recorded order is
                // consistent even though the call fails.
                self.inventory.revert_reservation(&demands);
                order.set_status(OrderStatus::CanceledError);
                tracing::warn!(
                    order_id = %order.id_typed(),
                    error = %err,
                    "order canceled, payment error"
                );
                self.record(order);
                return Err(err);
            }
        }

        // Notification touches no shared stock state, so a slow channel must
        // not serialize other orders.
        drop(_serial);
        if order.status() == OrderStatus::Completed {
            self.send_confirmation(&order);
        }

        Ok(self.record(order))
    }

    /// Look up a finished order by id.
    pub fn find_order(&self, id: OrderId) -> Option<Order> {
        lock(&self.ledger).get(&id).cloned()
    }

    fn record(&self, order: Order) -> Order {
        lock(&self.ledger).insert(order.id_typed(), order.clone());
        order
    }

    fn send_confirmation(&self, order: &Order) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let message = format!("Your order #{} has been confirmed", order.id_typed());
        if let Err(err) = notifier.send_confirmation(order.client().email(), &message) {
            // Best effort only: a lost confirmation never rolls back the order.
            tracing::warn!(
                order_id = %order.id_typed(),
                error = %err,
                "confirmation delivery failed"
            );
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
