//! Canonical test configurations.
//!
//! Single source of truth for settings and registries used across tests.

use std::path::Path;
use std::time::Duration;

use crate::application::pipeline::PipelineSettings;
use crate::application::strategy::{
    BalancedConfig, FrequencyConfig, GapConfig, MomentumConfig, RandomConfig, StrategyRegistry,
    WeightBounds,
};

/// Small, seeded, fast pipeline settings.
pub fn settings() -> PipelineSettings {
    PipelineSettings {
        batch_size: 20,
        learning_rate: 0.2,
        window_size: 50,
        momentum_window: 5,
        max_attempts_factor: 20,
        strategy_timeout: Duration::from_millis(500),
        run_timeout: Duration::from_secs(10),
        seed: Some(7),
        ..PipelineSettings::default()
    }
}

/// Every built-in strategy under bounds `[0.05, 0.6]`.
pub fn registry() -> StrategyRegistry {
    StrategyRegistry::builder()
        .bounds(WeightBounds::new(0.05, 0.6))
        .frequency(FrequencyConfig::default())
        .gap(GapConfig::default())
        .momentum(MomentumConfig::default())
        .balanced(BalancedConfig::default())
        .random(RandomConfig::default())
        .build()
        .expect("built-in registry")
}

/// A config file for CLI tests, storing its database at `database`.
pub fn config_toml(database: &Path) -> String {
    format!(
        r#"database = "{}"

[logging]
level = "warn"

[engine]
batch_size = 12
seed = 11
strategy_timeout_ms = 1000
run_timeout_secs = 30
"#,
        database.display().to_string().replace('\\', "/")
    )
}
