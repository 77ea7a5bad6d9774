//! Gap ("overdue numbers") strategy.
//!
//! Favors numbers that have gone the longest without appearing.

use serde::Deserialize;

use super::sampling::{lifted_confidence, smoothed, weighted_distinct, weighted_one};
use crate::domain::{CandidateTicket, HistoricalContext};
use crate::port::inbound::strategy::{Strategy, StrategyError, StrategyRng};

/// Configuration for the gap strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct GapConfig {
    #[serde(default = "default_base_confidence")]
    pub base_confidence: f64,

    /// Pseudo-count added to every gap so just-drawn numbers stay drawable.
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,

    /// Exponent applied to gaps; above 1 sharpens the preference.
    #[serde(default = "default_exponent")]
    pub exponent: f64,
}

const fn default_base_confidence() -> f64 {
    0.3
}

const fn default_smoothing() -> f64 {
    1.0
}

const fn default_exponent() -> f64 {
    1.0
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            base_confidence: default_base_confidence(),
            smoothing: default_smoothing(),
            exponent: default_exponent(),
        }
    }
}

/// Draws numbers weighted by draws-since-last-seen.
pub struct GapStrategy {
    config: GapConfig,
}

impl GapStrategy {
    #[must_use]
    pub const fn new(config: GapConfig) -> Self {
        Self { config }
    }

    fn weights(&self, gaps: &[u32]) -> Vec<f64> {
        smoothed(gaps, self.config.smoothing)
            .into_iter()
            .map(|w| w.powf(self.config.exponent))
            .collect()
    }
}

impl Strategy for GapStrategy {
    fn name(&self) -> &str {
        "gap"
    }

    fn base_confidence(&self) -> f64 {
        self.config.base_confidence
    }

    fn generate(
        &self,
        ctx: &HistoricalContext,
        count: usize,
        rng: &mut StrategyRng,
    ) -> Result<Vec<CandidateTicket>, StrategyError> {
        let rules = ctx.rules();
        let primary_weights = self.weights(ctx.primary_gap());
        let secondary_weights = self.weights(ctx.secondary_gap());

        (0..count)
            .map(|_| {
                let primary =
                    weighted_distinct(rng, &primary_weights, rules.primary_max, rules.primary_count)?;
                let secondary = weighted_one(rng, &secondary_weights, rules.secondary_max)?;
                let confidence =
                    lifted_confidence(self.config.base_confidence, &primary_weights, &primary);
                Ok(CandidateTicket::new(primary, secondary, confidence))
            })
            .collect()
    }
}
