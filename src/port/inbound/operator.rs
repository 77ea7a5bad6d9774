//! Operator capability surface consumed by inbound adapters.
//!
//! The CLI talks to the engine only through [`EngineOperator`]; the binary
//! installs an implementation wired from configuration.

use async_trait::async_trait;
use serde::Serialize;

use crate::application::pipeline::RunResult;
use crate::application::query::{StrategyPerformanceView, TicketQuery};
use crate::domain::{GameRules, Outcome, Ticket};
use crate::error::Result;

/// A built-in strategy as shown to operators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyInfo {
    pub name: String,
    pub enabled: bool,
    pub base_confidence: f64,
    /// One-line description of what the strategy favors.
    pub signal: String,
}

/// Engine use-cases for operator-facing adapters.
#[async_trait]
pub trait EngineOperator: Send + Sync {
    /// Rules outcomes must satisfy.
    fn rules(&self) -> GameRules;

    /// Record one outcome and run the pipeline on it.
    async fn run_outcome(&self, outcome: &Outcome) -> Result<RunResult>;

    /// Run the pipeline on every new outcome in the JSON outcome file at `source`.
    async fn sync(&self, source: &str) -> Result<Vec<RunResult>>;

    /// Tickets of the latest (or requested) batch.
    async fn tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>>;

    /// Per-strategy weights and performance.
    async fn performance(&self) -> Result<Vec<StrategyPerformanceView>>;

    /// Built-in strategies and whether each is enabled.
    fn strategies(&self) -> Vec<StrategyInfo>;
}
