//! Strategy port for ticket generation.
//!
//! Defines the [`Strategy`] trait and supporting types. Strategies read an
//! immutable [`HistoricalContext`] and emit candidate tickets.
//!
//! # Overview
//!
//! - Implement [`Strategy`] to add a new generation procedure
//! - Randomness comes only from the [`StrategyRng`] passed in, never from
//!   thread-local or global generators, so output is reproducible
//! - Failures are returned as [`StrategyError`]; the generator turns them
//!   into a [`StrategyOutput::Degraded`] result
//!
//! # Example
//!
//! ```
//! use drawbrain::domain::{CandidateTicket, HistoricalContext};
//! use drawbrain::port::inbound::strategy::{Strategy, StrategyError, StrategyRng};
//!
//! struct AlwaysLow;
//!
//! impl Strategy for AlwaysLow {
//!     fn name(&self) -> &str { "always_low" }
//!
//!     fn base_confidence(&self) -> f64 { 0.1 }
//!
//!     fn generate(
//!         &self,
//!         ctx: &HistoricalContext,
//!         count: usize,
//!         _rng: &mut StrategyRng,
//!     ) -> Result<Vec<CandidateTicket>, StrategyError> {
//!         let k = ctx.rules().primary_count as u8;
//!         Ok((0..count)
//!             .map(|_| CandidateTicket::new((1..=k).collect(), 1, 0.1))
//!             .collect())
//!     }
//! }
//! ```

use thiserror::Error;

use crate::domain::{CandidateTicket, HistoricalContext};

/// Generator threaded explicitly into every strategy call.
pub type StrategyRng = rand_chacha::ChaCha8Rng;

/// Errors a strategy may report. Never propagated past the generator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    /// The strategy gave up.
    #[error("strategy failed: {0}")]
    Failed(String),

    /// The snapshot holds too few draws for this strategy.
    #[error("need {needed} historical draws, have {available}")]
    InsufficientHistory { needed: usize, available: usize },
}

/// A pluggable candidate-ticket generation procedure.
///
/// Implementations must be pure over `(ctx, count, rng)`: the same inputs
/// and seed produce the same candidates.
///
/// `generate` runs on a blocking thread under a timeout. A call that
/// overruns is abandoned, not cancelled: its thread keeps running until
/// `generate` returns, so implementations must terminate on their own.
pub trait Strategy: Send + Sync {
    /// Unique identifier used for weights, attribution and configuration.
    fn name(&self) -> &str;

    /// Confidence assigned to fallback tickets attributed to this strategy.
    fn base_confidence(&self) -> f64;

    /// Produce exactly `count` candidates.
    ///
    /// # Errors
    /// Returns a [`StrategyError`] if no candidates can be produced.
    fn generate(
        &self,
        ctx: &HistoricalContext,
        count: usize,
        rng: &mut StrategyRng,
    ) -> Result<Vec<CandidateTicket>, StrategyError>;
}

/// What a strategy invocation yielded after failure handling.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutput {
    /// The strategy produced its own candidates.
    Ok(Vec<CandidateTicket>),
    /// The strategy failed or timed out; fallback candidates stand in,
    /// still attributed to the original strategy.
    Degraded {
        reason: String,
        candidates: Vec<CandidateTicket>,
    },
}

impl StrategyOutput {
    /// Candidates regardless of how they were produced.
    #[must_use]
    pub fn candidates(&self) -> &[CandidateTicket] {
        match self {
            Self::Ok(candidates) | Self::Degraded { candidates, .. } => candidates,
        }
    }

    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}
