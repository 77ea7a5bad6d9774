//! Engine tuning: batch size, learning rate, weight bounds, timeouts.

use std::time::Duration;

use serde::Deserialize;

use crate::application::pipeline::PipelineSettings;
use crate::application::strategy::WeightBounds;
use crate::domain::{DrawSchedule, GameRules, PrizeTable};

/// The `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Tickets generated per run.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Step size of the adaptive weight rule, in `(0, 1)`.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// Floor every strategy weight is held above.
    #[serde(default = "default_min_weight")]
    pub min_weight: f64,

    /// Cap on any single strategy weight.
    #[serde(default = "default_max_weight")]
    pub max_weight: f64,

    /// Evaluations kept in each strategy's rolling window.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Draws counted as recent for the momentum tables.
    #[serde(default = "default_momentum_window")]
    pub momentum_window: usize,

    /// Generation gives up after `batch_size * max_attempts_factor` candidates.
    #[serde(default = "default_max_attempts_factor")]
    pub max_attempts_factor: usize,

    #[serde(default = "default_strategy_timeout_ms")]
    pub strategy_timeout_ms: u64,

    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,

    /// Fixed base seed. Runs are reproducible when set.
    #[serde(default)]
    pub seed: Option<u64>,
}

const fn default_batch_size() -> usize {
    100
}

const fn default_learning_rate() -> f64 {
    0.2
}

const fn default_min_weight() -> f64 {
    0.02
}

const fn default_max_weight() -> f64 {
    0.6
}

const fn default_window_size() -> usize {
    500
}

const fn default_momentum_window() -> usize {
    20
}

const fn default_max_attempts_factor() -> usize {
    20
}

const fn default_strategy_timeout_ms() -> u64 {
    5_000
}

const fn default_run_timeout_secs() -> u64 {
    120
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            learning_rate: default_learning_rate(),
            min_weight: default_min_weight(),
            max_weight: default_max_weight(),
            window_size: default_window_size(),
            momentum_window: default_momentum_window(),
            max_attempts_factor: default_max_attempts_factor(),
            strategy_timeout_ms: default_strategy_timeout_ms(),
            run_timeout_secs: default_run_timeout_secs(),
            seed: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn weight_bounds(&self) -> WeightBounds {
        WeightBounds::new(self.min_weight, self.max_weight)
    }

    /// Combine with the game sections into orchestrator settings.
    #[must_use]
    pub fn pipeline_settings(
        &self,
        rules: GameRules,
        prizes: PrizeTable,
        schedule: DrawSchedule,
    ) -> PipelineSettings {
        PipelineSettings {
            rules,
            prizes,
            schedule,
            batch_size: self.batch_size,
            learning_rate: self.learning_rate,
            window_size: self.window_size,
            momentum_window: self.momentum_window,
            max_attempts_factor: self.max_attempts_factor,
            strategy_timeout: Duration::from_millis(self.strategy_timeout_ms),
            run_timeout: Duration::from_secs(self.run_timeout_secs),
            seed: self.seed,
        }
    }
}
