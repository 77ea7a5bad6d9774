//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all engine settings.
//! Configuration is loaded from a TOML file; `DRAWBRAIN_DATABASE` overrides
//! the database path.
//!
//! # Example
//!
//! ```no_run
//! use drawbrain::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use super::engine::EngineConfig;
use super::logging::LoggingConfig;
use super::strategy::{normalize_strategy_name, StrategiesConfig, BUILTIN_STRATEGIES};
use crate::application::pipeline::PipelineSettings;
use crate::domain::{DrawSchedule, GameRules, PrizeTable};
use crate::error::{ConfigError, Result};

/// Environment variable overriding [`Config::database`].
pub const DATABASE_ENV: &str = "DRAWBRAIN_DATABASE";

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to SQLite database file, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Number space of the game.
    #[serde(default)]
    pub game: GameRules,

    /// Prize tiers and ticket stake.
    #[serde(default)]
    pub prizes: PrizeTable,

    /// Weekdays on which draws happen.
    #[serde(default)]
    pub schedule: DrawSchedule,

    #[serde(default)]
    pub engine: EngineConfig,

    /// Generation strategy configuration.
    ///
    /// Controls which strategies are enabled and their parameters.
    #[serde(default)]
    pub strategies: StrategiesConfig,
}

fn default_database_path() -> String {
    "drawbrain.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            logging: LoggingConfig::default(),
            game: GameRules::default(),
            prizes: PrizeTable::default(),
            schedule: DrawSchedule::default(),
            engine: EngineConfig::default(),
            strategies: StrategiesConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Ok(database) = std::env::var(DATABASE_ENV) {
            if !database.trim().is_empty() {
                config.database = database;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first offending field.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        self.game.validate().map_err(|e| invalid("game", e))?;
        self.prizes
            .validate(self.game.primary_count)
            .map_err(|e| invalid("prizes", e))?;
        self.schedule.validate().map_err(|e| invalid("schedule", e))?;

        let engine = &self.engine;
        if engine.batch_size == 0 {
            return Err(invalid("batch_size", "must be greater than 0").into());
        }
        if !(engine.learning_rate > 0.0 && engine.learning_rate < 1.0) {
            return Err(invalid("learning_rate", "must be between 0 and 1 (exclusive)").into());
        }
        if !(engine.min_weight > 0.0) {
            return Err(invalid("min_weight", "must be greater than 0").into());
        }
        if !(engine.max_weight <= 1.0 && engine.max_weight >= engine.min_weight) {
            return Err(invalid("max_weight", "must be >= min_weight and <= 1").into());
        }
        if engine.window_size == 0 {
            return Err(invalid("window_size", "must be greater than 0").into());
        }
        if engine.momentum_window == 0 {
            return Err(invalid("momentum_window", "must be greater than 0").into());
        }
        if engine.max_attempts_factor == 0 {
            return Err(invalid("max_attempts_factor", "must be greater than 0").into());
        }
        if engine.strategy_timeout_ms == 0 {
            return Err(invalid("strategy_timeout_ms", "must be greater than 0").into());
        }
        if engine.run_timeout_secs == 0 {
            return Err(invalid("run_timeout_secs", "must be greater than 0").into());
        }

        self.validate_strategies()
    }

    #[allow(clippy::result_large_err)]
    fn validate_strategies(&self) -> Result<()> {
        let enabled = &self.strategies.enabled;
        if enabled.is_empty() {
            return Err(ConfigError::MissingField {
                field: "strategies.enabled",
            }
            .into());
        }

        let mut seen = BTreeSet::new();
        for raw in enabled {
            let name = normalize_strategy_name(raw);
            if !BUILTIN_STRATEGIES.contains(&name.as_str()) {
                return Err(invalid(
                    "strategies.enabled",
                    format!(
                        "unknown strategy '{raw}' (expected one of: {})",
                        BUILTIN_STRATEGIES.join(", ")
                    ),
                )
                .into());
            }
            if !seen.insert(name) {
                return Err(invalid("strategies.enabled", format!("'{raw}' listed twice")).into());
            }
        }

        for name in &seen {
            let confidence = self.strategies.base_confidence(name).unwrap_or_default();
            if !(0.0..=1.0).contains(&confidence) {
                return Err(invalid(
                    "base_confidence",
                    format!("{name}: must be between 0 and 1"),
                )
                .into());
            }
        }

        if !self.engine.weight_bounds().feasible_for(seen.len()) {
            return Err(invalid(
                "min_weight",
                format!(
                    "bounds [{}, {}] cannot hold {} strategies summing to 1",
                    self.engine.min_weight,
                    self.engine.max_weight,
                    seen.len()
                ),
            )
            .into());
        }
        Ok(())
    }

    /// Orchestrator settings assembled from the game and engine sections.
    #[must_use]
    pub fn pipeline_settings(&self) -> PipelineSettings {
        self.engine
            .pipeline_settings(self.game, self.prizes.clone(), self.schedule.clone())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn invalid(field: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}
