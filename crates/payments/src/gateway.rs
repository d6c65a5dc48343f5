use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use rand::Rng;
use serde::{Deserialize, Serialize};

use orderflow_core::{DomainError, DomainResult, OrderId};

/// What the workflow hands to a payment processor: the order being charged
/// and the amount due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub amount: f64,
}

/// Payment collaborator consumed by the order workflow.
pub trait PaymentProcessor: Send + Sync {
    /// Attempt to charge the request.
    ///
    /// `Ok(true)` is an approval, `Ok(false)` an ordinary decline. An `Err`
    /// means the request itself was unfit for payment (non-positive amount)
    /// and nothing was attempted.
    fn process_payment(&self, request: &PaymentRequest) -> DomainResult<bool>;
}

/// Source of uniform draws in `[0, 1)` deciding simulated outcomes.
///
/// Injectable so tests can script deterministic approvals and declines
/// without touching the workflow or the tier policy.
pub trait OutcomeSource: Send + Sync {
    fn next_draw(&self) -> f64;
}

/// Production source: thread-local RNG.
#[derive(Debug, Default)]
pub struct ThreadRngDraws;

impl OutcomeSource for ThreadRngDraws {
    fn next_draw(&self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }
}

/// Constant draw. `FixedDraw(0.0)` approves every charge, `FixedDraw(1.0)`
/// declines every charge.
#[derive(Debug, Clone, Copy)]
pub struct FixedDraw(pub f64);

impl OutcomeSource for FixedDraw {
    fn next_draw(&self) -> f64 {
        self.0
    }
}

/// A scripted sequence of draws, consumed front to back.
///
/// An exhausted script declines (draw 1.0) rather than panicking, so a
/// mis-sized script shows up as a failed assertion instead of an abort.
pub struct ScriptedDraws {
    draws: Mutex<VecDeque<f64>>,
}

impl ScriptedDraws {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: Mutex::new(draws.into_iter().collect()),
        }
    }
}

impl OutcomeSource for ScriptedDraws {
    fn next_draw(&self) -> f64 {
        self.draws
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(1.0)
    }
}

/// Success-rate policy: a baseline probability, reduced in tiers as the
/// charged amount grows. Policy, not law — swap it out per gateway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierPolicy {
    pub base_rate: f64,
    pub mid_threshold: f64,
    pub mid_penalty: f64,
    pub high_threshold: f64,
    pub high_penalty: f64,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            base_rate: 0.85,
            mid_threshold: 500.0,
            mid_penalty: 0.05,
            high_threshold: 1_000.0,
            high_penalty: 0.15,
        }
    }
}

impl TierPolicy {
    /// Success probability for a given charge amount.
    pub fn success_rate(&self, amount: f64) -> f64 {
        if amount > self.high_threshold {
            self.base_rate - self.high_penalty
        } else if amount > self.mid_threshold {
            self.base_rate - self.mid_penalty
        } else {
            self.base_rate
        }
    }
}

/// Simulated gateway: validates the request, then compares one draw against
/// the tiered success rate.
pub struct SimulatedGateway {
    policy: TierPolicy,
    outcomes: Box<dyn OutcomeSource>,
}

impl SimulatedGateway {
    /// Default policy, random outcomes.
    pub fn new() -> Self {
        Self::with_outcomes(ThreadRngDraws)
    }

    /// Default policy, custom outcome source.
    pub fn with_outcomes(outcomes: impl OutcomeSource + 'static) -> Self {
        Self::with_policy(TierPolicy::default(), outcomes)
    }

    pub fn with_policy(policy: TierPolicy, outcomes: impl OutcomeSource + 'static) -> Self {
        Self {
            policy,
            outcomes: Box::new(outcomes),
        }
    }

    /// Gateway that approves every valid charge.
    pub fn approving() -> Self {
        Self::with_outcomes(FixedDraw(0.0))
    }

    /// Gateway that declines every valid charge.
    pub fn declining() -> Self {
        Self::with_outcomes(FixedDraw(1.0))
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentProcessor for SimulatedGateway {
    fn process_payment(&self, request: &PaymentRequest) -> DomainResult<bool> {
        if !(request.amount > 0.0) || !request.amount.is_finite() {
            return Err(DomainError::payment(format!(
                "invalid amount {} for order {}",
                request.amount, request.order_id
            )));
        }

        let rate = self.policy.success_rate(request.amount);
        let approved = self.outcomes.next_draw() < rate;
        tracing::debug!(
            order_id = %request.order_id,
            amount = request.amount,
            rate,
            approved,
            "simulated charge"
        );
        Ok(approved)
    }
}
