//! Strategy configuration for ticket generation.

use serde::Deserialize;

use crate::application::strategy::{
    BalancedConfig, FrequencyConfig, GapConfig, MomentumConfig, RandomConfig,
};

pub const STRATEGY_FREQUENCY: &str = "frequency";
pub const STRATEGY_GAP: &str = "gap";
pub const STRATEGY_MOMENTUM: &str = "momentum";
pub const STRATEGY_BALANCED: &str = "balanced";
pub const STRATEGY_RANDOM: &str = "random";

/// Every built-in strategy name, in registration order.
pub const BUILTIN_STRATEGIES: [&str; 5] = [
    STRATEGY_FREQUENCY,
    STRATEGY_GAP,
    STRATEGY_MOMENTUM,
    STRATEGY_BALANCED,
    STRATEGY_RANDOM,
];

/// Configuration for all generation strategies.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategiesConfig {
    /// Enabled strategy names.
    #[serde(default = "default_enabled_strategies")]
    pub enabled: Vec<String>,

    #[serde(default)]
    pub frequency: FrequencyConfig,

    #[serde(default)]
    pub gap: GapConfig,

    #[serde(default)]
    pub momentum: MomentumConfig,

    #[serde(default)]
    pub balanced: BalancedConfig,

    #[serde(default)]
    pub random: RandomConfig,
}

fn default_enabled_strategies() -> Vec<String> {
    BUILTIN_STRATEGIES.iter().map(ToString::to_string).collect()
}

impl Default for StrategiesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_strategies(),
            frequency: FrequencyConfig::default(),
            gap: GapConfig::default(),
            momentum: MomentumConfig::default(),
            balanced: BalancedConfig::default(),
            random: RandomConfig::default(),
        }
    }
}

impl StrategiesConfig {
    /// Base confidence configured for a built-in strategy.
    #[must_use]
    pub fn base_confidence(&self, name: &str) -> Option<f64> {
        match normalize_strategy_name(name).as_str() {
            STRATEGY_FREQUENCY => Some(self.frequency.base_confidence),
            STRATEGY_GAP => Some(self.gap.base_confidence),
            STRATEGY_MOMENTUM => Some(self.momentum.base_confidence),
            STRATEGY_BALANCED => Some(self.balanced.base_confidence),
            STRATEGY_RANDOM => Some(self.random.base_confidence),
            _ => None,
        }
    }
}

/// Canonical form of a configured strategy name: `Gap-Hunter ` -> `gap_hunter`.
#[must_use]
pub fn normalize_strategy_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace('-', "_")
}
