//! Momentum strategy.
//!
//! Favors numbers trending in the recent window rather than all-time.

use serde::Deserialize;

use super::sampling::{lifted_confidence, weighted_distinct, weighted_one};
use crate::domain::{CandidateTicket, HistoricalContext};
use crate::port::inbound::strategy::{Strategy, StrategyError, StrategyRng};

/// Configuration for the momentum strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct MomentumConfig {
    #[serde(default = "default_base_confidence")]
    pub base_confidence: f64,

    /// Multiplier on recent-window counts relative to all-time counts.
    #[serde(default = "default_recency_boost")]
    pub recency_boost: f64,

    #[serde(default = "default_smoothing")]
    pub smoothing: f64,

    /// Minimum draws in the snapshot before the strategy will run.
    #[serde(default = "default_min_history")]
    pub min_history: usize,
}

const fn default_base_confidence() -> f64 {
    0.3
}

const fn default_recency_boost() -> f64 {
    4.0
}

const fn default_smoothing() -> f64 {
    1.0
}

const fn default_min_history() -> usize {
    3
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            base_confidence: default_base_confidence(),
            recency_boost: default_recency_boost(),
            smoothing: default_smoothing(),
            min_history: default_min_history(),
        }
    }
}

/// Draws numbers weighted by recent frequency.
pub struct MomentumStrategy {
    config: MomentumConfig,
}

impl MomentumStrategy {
    #[must_use]
    pub const fn new(config: MomentumConfig) -> Self {
        Self { config }
    }

    fn weights(&self, all_time: &[u32], recent: &[u32]) -> Vec<f64> {
        all_time
            .iter()
            .zip(recent)
            .map(|(&a, &r)| {
                f64::from(r) * self.config.recency_boost + f64::from(a) + self.config.smoothing
            })
            .collect()
    }
}

impl Strategy for MomentumStrategy {
    fn name(&self) -> &str {
        "momentum"
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
        if ctx.draws() < self.config.min_history {
            return Err(StrategyError::InsufficientHistory {
                needed: self.config.min_history,
                available: ctx.draws(),
            });
        }

        let rules = ctx.rules();
        let primary_weights =
            self.weights(ctx.primary_frequency(), ctx.recent_primary_frequency());
        let secondary_weights =
            self.weights(ctx.secondary_frequency(), ctx.recent_secondary_frequency());

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DrawDate, GameRules, Outcome};
    use rand::SeedableRng;

    #[test]
    fn refuses_short_history() {
        let strategy = MomentumStrategy::new(MomentumConfig::default());
        let ctx = HistoricalContext::empty(GameRules::default());
        let mut rng = StrategyRng::seed_from_u64(1);
        assert_eq!(
            strategy.generate(&ctx, 1, &mut rng),
            Err(StrategyError::InsufficientHistory {
                needed: 3,
                available: 0
            })
        );
    }

    #[test]
    fn favors_recent_numbers() {
        let rules = GameRules::try_new(10, 1, 3).unwrap();
        // 7 was hot long ago, 2 is hot now.
        let outcomes: Vec<Outcome> = (1..=20)
            .map(|day| {
                let n = if day <= 10 { 7 } else { 2 };
                Outcome::try_new(&rules, DrawDate::from_ymd(2026, 5, day).unwrap(), &[n], 3)
                    .unwrap()
            })
            .collect();
        let ctx = HistoricalContext::from_outcomes(rules, &outcomes, 5);
        let strategy = MomentumStrategy::new(MomentumConfig::default());

        let mut rng = StrategyRng::seed_from_u64(3);
        let candidates = strategy.generate(&ctx, 50, &mut rng).unwrap();
        let recent = candidates
            .iter()
            .filter(|c| c.primary_numbers == vec![2])
            .count();
        let stale = candidates
            .iter()
            .filter(|c| c.primary_numbers == vec![7])
            .count();
        assert!(recent > stale, "recent {recent} vs stale {stale}");
    }
}
