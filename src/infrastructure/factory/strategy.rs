//! Strategy registry factory.
//!
//! Builds the registry of enabled generation strategies from
//! configuration.

use tracing::debug;

use crate::application::strategy::registry::StrategyRegistry;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::strategy::{
    normalize_strategy_name, STRATEGY_BALANCED, STRATEGY_FREQUENCY, STRATEGY_GAP,
    STRATEGY_MOMENTUM, STRATEGY_RANDOM,
};

/// Build the strategy registry from configuration.
///
/// Strategies are registered in the order they are listed and start with
/// uniform weights; persisted weights are applied at run start.
///
/// # Errors
/// Returns [`Error::UnknownStrategy`] for a name with no built-in
/// strategy, or a registry error for duplicates and infeasible bounds.
pub fn build_strategy_registry(config: &Config) -> Result<StrategyRegistry> {
    let strategies = &config.strategies;
    let mut builder = StrategyRegistry::builder().bounds(config.engine.weight_bounds());

    for name in &strategies.enabled {
        let normalized = normalize_strategy_name(name);
        builder = match normalized.as_str() {
            STRATEGY_FREQUENCY => builder.frequency(strategies.frequency.clone()),
            STRATEGY_GAP => builder.gap(strategies.gap.clone()),
            STRATEGY_MOMENTUM => builder.momentum(strategies.momentum.clone()),
            STRATEGY_BALANCED => builder.balanced(strategies.balanced.clone()),
            STRATEGY_RANDOM => builder.random(strategies.random.clone()),
            _ => return Err(Error::UnknownStrategy(name.clone())),
        };
    }

    let registry = builder.build()?;
    debug!(strategies = ?registry.names(), "Strategy registry built");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::strategy::WEIGHT_EPSILON;

    fn config_with(enabled: &[&str]) -> Config {
        let mut config = Config::default();
        config.strategies.enabled = enabled.iter().map(ToString::to_string).collect();
        config
    }

    #[test]
    fn default_config_registers_all_builtins_uniformly() {
        let registry = build_strategy_registry(&Config::default()).unwrap();
        assert_eq!(
            registry.names(),
            vec!["frequency", "gap", "momentum", "balanced", "random"]
        );
        for weight in registry.weight_vector() {
            assert!((weight - 0.2).abs() < WEIGHT_EPSILON);
        }
    }

    #[test]
    fn names_are_normalized() {
        let registry = build_strategy_registry(&config_with(&[" Gap ", "RANDOM"])).unwrap();
        assert_eq!(registry.names(), vec!["gap", "random"]);
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        let result = build_strategy_registry(&config_with(&["gap", "hot-hand"]));
        assert!(matches!(result, Err(Error::UnknownStrategy(name)) if name == "hot-hand"));
    }

    #[test]
    fn duplicate_strategy_is_an_error() {
        let result = build_strategy_registry(&config_with(&["gap", "gap"]));
        assert!(matches!(result, Err(Error::DuplicateStrategy(_))));
    }

    #[test]
    fn empty_list_is_an_error() {
        let result = build_strategy_registry(&config_with(&[]));
        assert!(matches!(result, Err(Error::NoStrategies)));
    }
}
