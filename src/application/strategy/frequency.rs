//! Frequency ("hot numbers") strategy.
//!
//! Favors numbers that appeared most often across the whole history.

use serde::Deserialize;

use super::sampling::{lifted_confidence, smoothed, weighted_distinct, weighted_one};
use crate::domain::{CandidateTicket, HistoricalContext};
use crate::port::inbound::strategy::{Strategy, StrategyError, StrategyRng};

/// Configuration for the frequency strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct FrequencyConfig {
    /// Confidence used when this strategy degrades to fallback.
    #[serde(default = "default_base_confidence")]
    pub base_confidence: f64,

    /// Pseudo-count added to every number so unseen numbers stay drawable.
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
}

const fn default_base_confidence() -> f64 {
    0.35
}

const fn default_smoothing() -> f64 {
    1.0
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            base_confidence: default_base_confidence(),
            smoothing: default_smoothing(),
        }
    }
}

/// Draws numbers weighted by all-time frequency.
pub struct FrequencyStrategy {
    config: FrequencyConfig,
}

impl FrequencyStrategy {
    #[must_use]
    pub const fn new(config: FrequencyConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &FrequencyConfig {
        &self.config
    }
}

impl Strategy for FrequencyStrategy {
    fn name(&self) -> &str {
        "frequency"
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
        let primary_weights = smoothed(ctx.primary_frequency(), self.config.smoothing);
        let secondary_weights = smoothed(ctx.secondary_frequency(), self.config.smoothing);

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
