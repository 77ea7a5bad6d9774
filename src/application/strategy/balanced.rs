//! Balanced-spread strategy.
//!
//! Uniform draws filtered toward an even odd/even and low/high split, the
//! shape most historical draws take.

use rand::Rng;
use serde::Deserialize;

use super::sampling::uniform_distinct;
use crate::domain::{CandidateTicket, GameRules, HistoricalContext};
use crate::port::inbound::strategy::{Strategy, StrategyError, StrategyRng};

/// Configuration for the balanced strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct BalancedConfig {
    #[serde(default = "default_base_confidence")]
    pub base_confidence: f64,

    /// Redraws allowed per ticket before settling for the best seen.
    #[serde(default = "default_max_redraws")]
    pub max_redraws: usize,
}

const fn default_base_confidence() -> f64 {
    0.25
}

const fn default_max_redraws() -> usize {
    64
}

impl Default for BalancedConfig {
    fn default() -> Self {
        Self {
            base_confidence: default_base_confidence(),
            max_redraws: default_max_redraws(),
        }
    }
}

/// Draws uniformly, keeping tickets whose numbers spread evenly.
pub struct BalancedStrategy {
    config: BalancedConfig,
}

impl BalancedStrategy {
    #[must_use]
    pub const fn new(config: BalancedConfig) -> Self {
        Self { config }
    }
}

/// How far a pick is from an even odd/even and low/high split. 0 is ideal.
fn imbalance(rules: &GameRules, numbers: &[u8]) -> usize {
    let k = numbers.len();
    let odd = numbers.iter().filter(|&&n| n % 2 == 1).count();
    let low = numbers
        .iter()
        .filter(|&&n| u16::from(n) * 2 <= u16::from(rules.primary_max))
        .count();
    let distance = |count: usize| {
        let (lo, hi) = (k / 2, k.div_ceil(2));
        if count < lo {
            lo - count
        } else {
            count.saturating_sub(hi)
        }
    };
    distance(odd) + distance(low)
}

impl Strategy for BalancedStrategy {
    fn name(&self) -> &str {
        "balanced"
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

        (0..count)
            .map(|_| {
                let mut best = uniform_distinct(rng, rules.primary_max, rules.primary_count);
                let mut best_score = imbalance(rules, &best);
                let mut redraws = 0;
                while best_score > 0 && redraws < self.config.max_redraws {
                    let pick = uniform_distinct(rng, rules.primary_max, rules.primary_count);
                    let score = imbalance(rules, &pick);
                    if score < best_score {
                        best = pick;
                        best_score = score;
                    }
                    redraws += 1;
                }
                if best.len() != rules.primary_count {
                    return Err(StrategyError::Failed("uniform draw came up short".into()));
                }

                let secondary = rng.gen_range(1..=rules.secondary_max);
                let penalty = 1.0 / (1.0 + best_score as f64);
                let confidence = (self.config.base_confidence * penalty).clamp(0.0, 1.0);
                Ok(CandidateTicket::new(best, secondary, confidence))
            })
            .collect()
    }
}
