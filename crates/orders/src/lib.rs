//! Orders domain module.
//!
//! This crate contains the order entity and the creation workflow that
//! orchestrates inventory reservation, payment, and compensation. Business
//! rules are deterministic domain logic; the collaborators (stock, payments,
//! notification) are injected behind traits.

pub mod notify;
pub mod order;
pub mod workflow;

pub use notify::ConfirmationSender;
pub use order::{LineItem, Order, OrderStatus};
pub use workflow::OrderDesk;
