//! Ports for historical data: the context snapshot and new outcomes.

use std::future::Future;

use async_trait::async_trait;

use crate::domain::{DrawDate, GameRules, HistoricalContext, Outcome};
use crate::error::Result;

/// Supplies the immutable snapshot strategies read from.
pub trait HistoricalContextProvider: Send + Sync {
    /// Build a snapshot for `rules`, with recent tables over the last
    /// `momentum_window` draws.
    ///
    /// A missing snapshot is fatal to the run that asked for it.
    fn snapshot(
        &self,
        rules: GameRules,
        momentum_window: usize,
    ) -> impl Future<Output = Result<HistoricalContext>> + Send;
}

/// Supplies outcomes as they become available.
#[async_trait]
pub trait OutcomeSource: Send + Sync {
    /// Human-readable source name for logging.
    fn name(&self) -> &str;

    /// Outcomes strictly after `after` (all when `None`), oldest first.
    async fn outcomes_after(
        &self,
        rules: &GameRules,
        after: Option<DrawDate>,
    ) -> Result<Vec<Outcome>>;
}
