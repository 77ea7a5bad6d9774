//! Uniform random strategy.
//!
//! The exploration baseline, and the designated fallback that stands in
//! for any strategy that fails or times out.

use rand::Rng;
use serde::Deserialize;

use super::sampling::uniform_distinct;
use crate::domain::{CandidateTicket, HistoricalContext};
use crate::port::inbound::strategy::{Strategy, StrategyError, StrategyRng};

/// Configuration for the uniform random strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomConfig {
    #[serde(default = "default_base_confidence")]
    pub base_confidence: f64,
}

const fn default_base_confidence() -> f64 {
    0.1
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            base_confidence: default_base_confidence(),
        }
    }
}

/// Draws every number uniformly.
pub struct UniformRandomStrategy {
    config: RandomConfig,
}

impl UniformRandomStrategy {
    #[must_use]
    pub const fn new(config: RandomConfig) -> Self {
        Self { config }
    }

    /// Fallback generation: `count` uniform candidates at `confidence`.
    ///
    /// Infallible, so a degraded strategy always gets its candidates.
    #[must_use]
    pub fn fallback(
        ctx: &HistoricalContext,
        count: usize,
        confidence: f64,
        rng: &mut StrategyRng,
    ) -> Vec<CandidateTicket> {
        let rules = ctx.rules();
        (0..count)
            .map(|_| {
                CandidateTicket::new(
                    uniform_distinct(rng, rules.primary_max, rules.primary_count),
                    rng.gen_range(1..=rules.secondary_max),
                    confidence.clamp(0.0, 1.0),
                )
            })
            .collect()
    }
}

impl Default for UniformRandomStrategy {
    fn default() -> Self {
        Self::new(RandomConfig::default())
    }
}

impl Strategy for UniformRandomStrategy {
    fn name(&self) -> &str {
        "random"
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
        Ok(Self::fallback(ctx, count, self.config.base_confidence, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GameRules;
    use rand::SeedableRng;

    #[test]
    fn fallback_respects_rules() {
        let ctx = HistoricalContext::empty(GameRules::default());
        let mut rng = StrategyRng::seed_from_u64(4);
        let candidates = UniformRandomStrategy::fallback(&ctx, 30, 0.2, &mut rng);

        assert_eq!(candidates.len(), 30);
        for c in candidates {
            let mut sorted = c.primary_numbers.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), 5);
            assert!(sorted.iter().all(|&n| (1..=69).contains(&n)));
            assert!((1..=26).contains(&c.secondary_number));
            assert!((c.confidence - 0.2).abs() < 1e-12);
        }
    }
}
