//! Persistence port for the engine's entities.

use std::collections::BTreeMap;
use std::future::Future;

use crate::domain::{
    DrawDate, EvaluationResult, Outcome, OutcomeStatus, StrategyPerformanceRecord, Ticket,
};
use crate::error::Result;

/// Everything one pipeline run writes, committed as a single unit.
#[derive(Debug, Clone, PartialEq)]
pub struct RunCommit {
    /// Outcome the run processed.
    pub outcome_date: DrawDate,
    /// Status to record for that outcome.
    pub outcome_status: OutcomeStatus,
    /// New evaluation results; existing ones for the same ticket are kept.
    pub evaluations: Vec<EvaluationResult>,
    /// Full replacement of the per-strategy performance records.
    pub performance: Vec<StrategyPerformanceRecord>,
    /// Full replacement of the weight vector.
    pub weights: BTreeMap<String, f64>,
    /// The freshly generated batch.
    pub tickets: Vec<Ticket>,
}

/// Durable storage for outcomes, tickets, evaluations, weights and
/// performance records. CRUD only; no engine logic lives behind it.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - [`commit_run`](Self::commit_run) must be all-or-nothing
/// - Saving an evaluation for an already-evaluated ticket is a silent no-op
pub trait EngineStore: Send + Sync {
    /// Record an outcome as pending. Returns false if the draw date exists.
    fn record_outcome(&self, outcome: &Outcome) -> impl Future<Output = Result<bool>> + Send;

    /// Get a recorded outcome by draw date.
    fn get_outcome(&self, date: DrawDate) -> impl Future<Output = Result<Option<Outcome>>> + Send;

    /// Get the evaluation status of a recorded outcome.
    fn outcome_status(
        &self,
        date: DrawDate,
    ) -> impl Future<Output = Result<Option<OutcomeStatus>>> + Send;

    /// List all recorded outcomes, oldest first.
    fn list_outcomes(&self) -> impl Future<Output = Result<Vec<Outcome>>> + Send;

    /// All tickets generated against `target`.
    fn tickets_for(&self, target: DrawDate) -> impl Future<Output = Result<Vec<Ticket>>> + Send;

    /// Tickets against `target` that have no evaluation result yet.
    fn unevaluated_tickets(
        &self,
        target: DrawDate,
    ) -> impl Future<Output = Result<Vec<Ticket>>> + Send;

    /// Most recent draw date any ticket targets.
    fn latest_target(&self) -> impl Future<Output = Result<Option<DrawDate>>> + Send;

    /// Evaluation results recorded for outcome `date`.
    fn evaluations_for(
        &self,
        date: DrawDate,
    ) -> impl Future<Output = Result<Vec<EvaluationResult>>> + Send;

    /// Insert results, ignoring tickets already evaluated. Returns rows inserted.
    fn save_evaluations(
        &self,
        results: &[EvaluationResult],
    ) -> impl Future<Output = Result<usize>> + Send;

    /// Persisted weight vector, keyed by strategy name.
    fn load_weights(&self) -> impl Future<Output = Result<BTreeMap<String, f64>>> + Send;

    /// Persisted performance records.
    fn load_performance(
        &self,
    ) -> impl Future<Output = Result<Vec<StrategyPerformanceRecord>>> + Send;

    /// Atomically apply everything a run produced.
    fn commit_run(&self, commit: &RunCommit) -> impl Future<Output = Result<()>> + Send;
}
