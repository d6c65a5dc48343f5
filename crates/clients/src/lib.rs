//! Clients domain module.
//!
//! This crate contains the client record and its construction rules,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod client;

pub use client::Client;
