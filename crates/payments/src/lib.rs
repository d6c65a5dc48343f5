//! Payments domain module.
//!
//! This crate simulates a payment gateway for the order workflow. Outcomes
//! are drawn from an injectable source so tests can force either branch
//! deterministically; the success rate drops in tiers as the charged amount
//! grows.

pub mod gateway;

pub use gateway::{
    FixedDraw, OutcomeSource, PaymentProcessor, PaymentRequest, ScriptedDraws, SimulatedGateway,
    ThreadRngDraws, TierPolicy,
};
