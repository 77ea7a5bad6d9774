//! Operator implementation for inbound adapters.
//!
//! Wires a fresh store and pipeline from [`Config`] for every use-case, so
//! each CLI invocation sees the database as it is on disk.

use async_trait::async_trait;

use crate::adapter::outbound::history::JsonFileOutcomeSource;
use crate::application::pipeline::RunResult;
use crate::application::query::{
    latest_batch, strategy_performance, StrategyPerformanceView, TicketQuery,
};
use crate::domain::{GameRules, Outcome, Ticket};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::strategy::{
    normalize_strategy_name, BUILTIN_STRATEGIES, STRATEGY_BALANCED, STRATEGY_FREQUENCY,
    STRATEGY_GAP, STRATEGY_MOMENTUM, STRATEGY_RANDOM,
};
use crate::infrastructure::factory::persistence::build_store;
use crate::infrastructure::factory::pipeline::build_pipeline;
use crate::port::inbound::operator::{EngineOperator, StrategyInfo};

/// [`EngineOperator`] backed by the configured SQLite database.
#[derive(Debug, Clone)]
pub struct ConfigOperator {
    config: Config,
}

impl ConfigOperator {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

fn signal(name: &str) -> &'static str {
    match name {
        STRATEGY_FREQUENCY => "all-time draw frequency",
        STRATEGY_GAP => "draws since last seen",
        STRATEGY_MOMENTUM => "recent-window frequency",
        STRATEGY_BALANCED => "odd/even and low/high spread",
        STRATEGY_RANDOM => "uniform",
        _ => "",
    }
}

#[async_trait]
impl EngineOperator for ConfigOperator {
    fn rules(&self) -> GameRules {
        self.config.game
    }

    async fn run_outcome(&self, outcome: &Outcome) -> Result<RunResult> {
        build_pipeline(&self.config)?.run(outcome).await
    }

    async fn sync(&self, source: &str) -> Result<Vec<RunResult>> {
        let source = JsonFileOutcomeSource::new(source);
        build_pipeline(&self.config)?.run_pending(&source).await
    }

    async fn tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>> {
        let store = build_store(&self.config)?;
        latest_batch(&store, query).await
    }

    async fn performance(&self) -> Result<Vec<StrategyPerformanceView>> {
        let store = build_store(&self.config)?;
        strategy_performance(&store).await
    }

    fn strategies(&self) -> Vec<StrategyInfo> {
        let strategies = &self.config.strategies;
        let enabled: Vec<String> = strategies
            .enabled
            .iter()
            .map(|name| normalize_strategy_name(name))
            .collect();

        BUILTIN_STRATEGIES
            .iter()
            .map(|&name| StrategyInfo {
                name: name.to_string(),
                enabled: enabled.iter().any(|e| e == name),
                base_confidence: strategies.base_confidence(name).unwrap_or_default(),
                signal: signal(name).to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{october, outcome};

    fn operator(dir: &tempfile::TempDir) -> ConfigOperator {
        let mut config = Config::default();
        config.database = dir.path().join("engine.db").to_string_lossy().to_string();
        config.engine.batch_size = 8;
        config.engine.seed = Some(3);
        config.strategies.enabled = vec!["gap".into(), "random".into()];
        ConfigOperator::new(config)
    }

    #[test]
    fn strategies_report_enabled_flags() {
        let dir = tempfile::tempdir().unwrap();
        let infos = operator(&dir).strategies();
        assert_eq!(infos.len(), 5);
        let enabled: Vec<&str> = infos
            .iter()
            .filter(|i| i.enabled)
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(enabled, vec!["gap", "random"]);
    }

    #[tokio::test]
    async fn run_then_query_through_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let operator = operator(&dir);

        let result = operator
            .run_outcome(&outcome(october(17), &[4, 8, 15, 16, 23], 7))
            .await
            .unwrap();
        assert!(matches!(result, RunResult::Completed(_)));

        let tickets = operator.tickets(&TicketQuery::default()).await.unwrap();
        assert_eq!(tickets.len(), 8);
        assert!(tickets.iter().all(|t| t.target() == october(19)));

        let views = operator.performance().await.unwrap();
        let names: Vec<&str> = views.iter().map(|v| v.strategy.as_str()).collect();
        assert_eq!(names, vec!["gap", "random"]);
    }
}
