use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use orderflow_core::{ProductId, ValueObject};

/// Value object: how much of one product an order asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDemand {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl StockDemand {
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

impl ValueObject for StockDemand {}

/// Stock-keeping collaborator consumed by the order workflow.
///
/// `reserve_stock` and `revert_reservation` form a pair: a successful
/// reservation may later be compensated by a revert with the same demands.
pub trait StockControl: Send + Sync {
    /// All-or-nothing reservation.
    ///
    /// Checks every demand and, only if all can be satisfied, decrements each
    /// product's on-hand count in the same critical section. Returns `false`
    /// without mutating anything if any single demand is short.
    fn reserve_stock(&self, demands: &[StockDemand]) -> bool;

    /// Compensate a prior successful reservation by incrementing each demand
    /// back onto the shelf.
    fn revert_reservation(&self, demands: &[StockDemand]);

    /// Absolute replacement of each product's on-hand count (bulk restock).
    /// This is not a delta: the demand quantity becomes the new count.
    fn overwrite_stock(&self, demands: &[StockDemand]);

    /// On-hand count for a product; 0 for products never stocked.
    fn stock_on_hand(&self, product_id: &ProductId) -> u32;
}

/// In-memory stock ledger guarded by a single lock.
///
/// Every trait operation is atomic with respect to the others, which is what
/// lets the workflow treat reserve → revert as a safe compensation pair.
pub struct InMemoryInventory {
    stock: Mutex<HashMap<ProductId, u32>>,
}

impl InMemoryInventory {
    /// Start with an explicit catalog. Initial stock is configuration, not
    /// hidden static state, so tests can supply arbitrary starting counts.
    pub fn with_stock<I, P>(initial: I) -> Self
    where
        I: IntoIterator<Item = (P, u32)>,
        P: Into<ProductId>,
    {
        let stock = initial
            .into_iter()
            .map(|(product_id, quantity)| (product_id.into(), quantity))
            .collect();
        Self {
            stock: Mutex::new(stock),
        }
    }

    /// Empty catalog; every product reads as 0 until overwritten.
    pub fn empty() -> Self {
        Self::with_stock::<_, ProductId>([])
    }

    /// The demo catalog shipped with the system facade.
    pub fn sample() -> Self {
        Self::with_stock([
            ("PROD-2025-001", 15),
            ("PROD-2025-002", 8),
            ("PROD-2025-003", 25),
        ])
    }

    fn guard(&self) -> MutexGuard<'_, HashMap<ProductId, u32>> {
        // A poisoned lock only means another thread panicked mid-operation;
        // the map itself is still usable.
        self.stock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StockControl for InMemoryInventory {
    fn reserve_stock(&self, demands: &[StockDemand]) -> bool {
        // An order may repeat a product across lines; fold the demands into
        // one required count per product so the check and the decrement see
        // the same totals.
        let mut needed: HashMap<&ProductId, u32> = HashMap::new();
        for demand in demands {
            let required = needed.entry(&demand.product_id).or_insert(0);
            *required = required.saturating_add(demand.quantity);
        }

        let mut stock = self.guard();

        for (product_id, required) in &needed {
            let on_hand = stock.get(*product_id).copied().unwrap_or(0);
            if on_hand < *required {
                tracing::debug!(
                    product_id = %product_id,
                    requested = *required,
                    "reservation refused, insufficient stock"
                );
                return false;
            }
        }

        for (product_id, required) in needed {
            *stock.entry(product_id.clone()).or_insert(0) -= required;
        }
        true
    }

    fn revert_reservation(&self, demands: &[StockDemand]) {
        let mut stock = self.guard();
        for demand in demands {
            *stock.entry(demand.product_id.clone()).or_insert(0) += demand.quantity;
        }
        tracing::debug!(demands = demands.len(), "reservation reverted");
    }

    fn overwrite_stock(&self, demands: &[StockDemand]) {
        let mut stock = self.guard();
        for demand in demands {
            stock.insert(demand.product_id.clone(), demand.quantity);
        }
    }

    fn stock_on_hand(&self, product_id: &ProductId) -> u32 {
        self.guard().get(product_id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn demand(product: &str, quantity: u32) -> StockDemand {
        StockDemand::new(product, quantity)
    }

    #[test]
    fn reserve_decrements_every_product() {
        let inventory = InMemoryInventory::with_stock([("A", 10), ("B", 5)]);
        let demands = vec![demand("A", 3), demand("B", 5)];

        assert!(inventory.reserve_stock(&demands));
        assert_eq!(inventory.stock_on_hand(&"A".into()), 7);
        assert_eq!(inventory.stock_on_hand(&"B".into()), 0);
    }

    #[test]
    fn short_demand_refuses_and_mutates_nothing() {
        let inventory = InMemoryInventory::with_stock([("A", 10), ("B", 2)]);
        let demands = vec![demand("A", 3), demand("B", 5)];

        assert!(!inventory.reserve_stock(&demands));
        assert_eq!(inventory.stock_on_hand(&"A".into()), 10);
        assert_eq!(inventory.stock_on_hand(&"B".into()), 2);
    }

    #[test]
    fn duplicate_demands_are_checked_against_their_combined_total() {
        let inventory = InMemoryInventory::with_stock([("A", 1)]);

        // Each demand alone fits the snapshot; together they do not.
        let demands = vec![demand("A", 1), demand("A", 1)];
        assert!(!inventory.reserve_stock(&demands));
        assert_eq!(inventory.stock_on_hand(&"A".into()), 1);
    }

    #[test]
    fn duplicate_demands_within_stock_reserve_and_revert_cleanly() {
        let inventory = InMemoryInventory::with_stock([("A", 3)]);
        let demands = vec![demand("A", 1), demand("A", 2)];

        assert!(inventory.reserve_stock(&demands));
        assert_eq!(inventory.stock_on_hand(&"A".into()), 0);

        inventory.revert_reservation(&demands);
        assert_eq!(inventory.stock_on_hand(&"A".into()), 3);
    }

    #[test]
    fn unknown_product_reads_as_zero() {
        let inventory = InMemoryInventory::empty();
        assert_eq!(inventory.stock_on_hand(&"GHOST".into()), 0);
        assert!(!inventory.reserve_stock(&[demand("GHOST", 1)]));
    }

    #[test]
    fn revert_restores_reserved_quantities() {
        let inventory = InMemoryInventory::with_stock([("A", 10)]);
        let demands = vec![demand("A", 4)];

        assert!(inventory.reserve_stock(&demands));
        inventory.revert_reservation(&demands);
        assert_eq!(inventory.stock_on_hand(&"A".into()), 10);
    }

    #[test]
    fn overwrite_replaces_rather_than_adjusts() {
        let inventory = InMemoryInventory::with_stock([("A", 10)]);

        inventory.overwrite_stock(&[demand("A", 3), demand("NEW", 7)]);
        assert_eq!(inventory.stock_on_hand(&"A".into()), 3);
        assert_eq!(inventory.stock_on_hand(&"NEW".into()), 7);
    }

    #[test]
    fn sample_catalog_matches_demo_stock() {
        let inventory = InMemoryInventory::sample();
        assert_eq!(inventory.stock_on_hand(&"PROD-2025-001".into()), 15);
        assert_eq!(inventory.stock_on_hand(&"PROD-2025-002".into()), 8);
        assert_eq!(inventory.stock_on_hand(&"PROD-2025-003".into()), 25);
    }

    #[test]
    fn concurrent_reservations_never_oversell_the_last_unit() {
        let inventory = Arc::new(InMemoryInventory::with_stock([("A", 1)]));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let inventory = Arc::clone(&inventory);
                std::thread::spawn(move || inventory.reserve_stock(&[demand("A", 1)]))
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(wins, 1);
        assert_eq!(inventory.stock_on_hand(&"A".into()), 0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a successful reservation followed by its revert
            /// restores every on-hand count exactly.
            #[test]
            fn reserve_then_revert_is_identity(
                counts in prop::collection::vec(0u32..1_000, 1..8),
                take in prop::collection::vec(0u32..1_000, 1..8)
            ) {
                let catalog: Vec<(String, u32)> = counts
                    .iter()
                    .enumerate()
                    .map(|(i, count)| (format!("P{i}"), *count))
                    .collect();
                let inventory = InMemoryInventory::with_stock(catalog.clone());

                let demands: Vec<StockDemand> = take
                    .iter()
                    .enumerate()
                    .map(|(i, quantity)| StockDemand::new(format!("P{i}"), *quantity))
                    .collect();

                if inventory.reserve_stock(&demands) {
                    inventory.revert_reservation(&demands);
                }

                for (product, count) in &catalog {
                    prop_assert_eq!(
                        inventory.stock_on_hand(&product.as_str().into()),
                        *count
                    );
                }
            }
        }
    }
}
