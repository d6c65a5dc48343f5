//! Inventory domain module.
//!
//! This crate contains stock-keeping rules for the order workflow,
//! implemented purely as deterministic domain logic (no IO, no storage).
//!
//! The API is the reserve/revert variant: a reservation is a tentative,
//! reversible decrement performed before payment is confirmed, and a revert
//! is the compensating increment when a later workflow step fails.

pub mod stock;

pub use stock::{InMemoryInventory, StockControl, StockDemand};
