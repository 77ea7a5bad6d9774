//! The evaluate, aggregate, re-weight and generate cycle.
//!
//! # State Machine
//!
//! ```text
//! IDLE -> EVALUATING -> AGGREGATING -> UPDATING_WEIGHTS -> GENERATING -> IDLE
//! ```
//!
//! A run starts only from `IDLE`; a second start fails fast with
//! [`Error::RunInProgress`]. Every phase builds its output in memory and
//! the run ends with a single [`EngineStore::commit_run`]; the live
//! registry weights are swapped only after that commit succeeds.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Datelike;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::application::aggregator::PerformanceAggregator;
use crate::application::evaluator::{Evaluation, OutcomeEvaluator};
use crate::application::generator::TicketBatchGenerator;
use crate::application::strategy::registry::StrategyRegistry;
use crate::application::weights::AdaptiveWeightUpdater;
use crate::domain::{
    DomainError, DrawDate, DrawSchedule, GameRules, Outcome, OutcomeStatus, PrizeTable,
};
use crate::error::{Error, Result};
use crate::port::outbound::history::{HistoricalContextProvider, OutcomeSource};
use crate::port::outbound::store::{EngineStore, RunCommit};

/// Phase of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    Idle,
    Evaluating,
    Aggregating,
    UpdatingWeights,
    Generating,
}

impl PipelineState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Evaluating => "EVALUATING",
            Self::Aggregating => "AGGREGATING",
            Self::UpdatingWeights => "UPDATING_WEIGHTS",
            Self::Generating => "GENERATING",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tuning for one orchestrator.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub rules: GameRules,
    pub prizes: PrizeTable,
    pub schedule: DrawSchedule,
    /// Tickets per generated batch.
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Evaluations kept per strategy.
    pub window_size: usize,
    /// Draws feeding the recent tables of the snapshot.
    pub momentum_window: usize,
    pub max_attempts_factor: usize,
    pub strategy_timeout: Duration,
    pub run_timeout: Duration,
    /// Base seed; a fresh one is drawn per run when unset.
    pub seed: Option<u64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            rules: GameRules::default(),
            prizes: PrizeTable::default(),
            schedule: DrawSchedule::default(),
            batch_size: 100,
            learning_rate: 0.2,
            window_size: 500,
            momentum_window: 20,
            max_attempts_factor: 20,
            strategy_timeout: Duration::from_secs(5),
            run_timeout: Duration::from_secs(120),
            seed: None,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub outcome_date: DrawDate,
    pub outcome_status: OutcomeStatus,
    /// Tickets scored against the outcome.
    pub evaluated: usize,
    pub wins: usize,
    /// Draw the new batch targets.
    pub target: DrawDate,
    /// Tickets generated by this run.
    pub tickets: usize,
    pub fallback_tickets: usize,
    /// Whether the attempt cap cut the batch short.
    pub exhausted: bool,
    /// Set when `target` already had a batch, so none was generated.
    pub batch_exists: bool,
    /// Generation seed; absent when no batch was generated.
    pub seed: Option<u64>,
    pub weights: BTreeMap<String, f64>,
}

/// What `run` did with an outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RunResult {
    Completed(RunReport),
    /// The outcome had already been processed by an earlier run.
    Skipped {
        draw_date: DrawDate,
        status: OutcomeStatus,
    },
}

/// Resets the pipeline to `IDLE` on every exit path.
struct RunGuard<'a> {
    state: &'a Mutex<PipelineState>,
}

impl RunGuard<'_> {
    fn advance(&self, next: PipelineState) {
        let mut state = self.state.lock();
        debug!(from = %*state, to = %next, "Pipeline transition");
        *state = next;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock() = PipelineState::Idle;
    }
}

/// Sequences one pipeline run per new outcome.
pub struct PipelineOrchestrator<S, P> {
    store: Arc<S>,
    context: Arc<P>,
    registry: RwLock<StrategyRegistry>,
    state: Mutex<PipelineState>,
    settings: PipelineSettings,
    evaluator: OutcomeEvaluator,
    aggregator: PerformanceAggregator,
    updater: AdaptiveWeightUpdater,
    generator: TicketBatchGenerator,
}

impl<S, P> PipelineOrchestrator<S, P>
where
    S: EngineStore,
    P: HistoricalContextProvider,
{
    #[must_use]
    pub fn new(
        store: Arc<S>,
        context: Arc<P>,
        registry: StrategyRegistry,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            evaluator: OutcomeEvaluator::new(settings.prizes.clone()),
            aggregator: PerformanceAggregator::new(settings.window_size, settings.prizes.stake),
            updater: AdaptiveWeightUpdater::new(settings.learning_rate),
            generator: TicketBatchGenerator::new(
                settings.max_attempts_factor,
                settings.strategy_timeout,
            ),
            store,
            context,
            registry: RwLock::new(registry),
            state: Mutex::new(PipelineState::Idle),
            settings,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        *self.state.lock()
    }

    /// Snapshot of the live registry.
    #[must_use]
    pub fn registry(&self) -> StrategyRegistry {
        self.registry.read().clone()
    }

    #[must_use]
    pub const fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn begin(&self) -> Result<RunGuard<'_>> {
        let mut state = self.state.lock();
        if *state != PipelineState::Idle {
            return Err(Error::RunInProgress {
                state: state.to_string(),
            });
        }
        *state = PipelineState::Evaluating;
        Ok(RunGuard { state: &self.state })
    }

    /// Process one new outcome end to end.
    ///
    /// The outcome is recorded as pending first, so a failed run can be
    /// retried. An outcome that an earlier run already processed is skipped,
    /// including one another process commits while this run is working. No
    /// batch is generated for a target draw that already has one.
    ///
    /// # Errors
    /// Returns [`Error::RunInProgress`] if another run is active,
    /// [`Error::RunTimedOut`] past the run timeout,
    /// [`DomainError::ConflictingOutcome`] if the date was recorded with
    /// other numbers, or any storage, context or weight error. Nothing is
    /// committed on error.
    #[instrument(skip(self, outcome), fields(draw_date = %outcome.draw_date()))]
    pub async fn run(&self, outcome: &Outcome) -> Result<RunResult> {
        let guard = self.begin()?;
        let limit = self.settings.run_timeout;
        match tokio::time::timeout(limit, self.execute(outcome, &guard)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(seconds = limit.as_secs(), "Pipeline run timed out");
                Err(Error::RunTimedOut {
                    seconds: limit.as_secs(),
                })
            }
        }
    }

    async fn execute(&self, outcome: &Outcome, guard: &RunGuard<'_>) -> Result<RunResult> {
        let date = outcome.draw_date();
        if !self.store.record_outcome(outcome).await? {
            self.ensure_same_outcome(outcome).await?;
        }
        if let Some(status) = self.store.outcome_status(date).await? {
            if status.is_processed() {
                info!(%status, "Outcome already processed, skipping");
                return Ok(RunResult::Skipped {
                    draw_date: date,
                    status,
                });
            }
        }

        // Weights are loaded at run start and persisted at run end.
        let mut registry = self.registry();
        let persisted = self.store.load_weights().await?;
        if !persisted.is_empty() {
            registry.load_weights(&persisted)?;
        }

        let evaluation = self.evaluator.evaluate(self.store.as_ref(), outcome).await?;
        let results = evaluation.results().to_vec();
        let outcome_status = match &evaluation {
            Evaluation::Scored(results) => OutcomeStatus::Evaluated {
                tickets: results.len(),
            },
            Evaluation::NoPredictions => OutcomeStatus::NoPredictions,
        };

        guard.advance(PipelineState::Aggregating);
        let existing = self.store.load_performance().await?;
        let uniform = 1.0 / registry.len().max(1) as f64;
        let mut performance =
            self.aggregator
                .aggregate(&registry.names(), existing, &results, uniform);

        guard.advance(PipelineState::UpdatingWeights);
        let staged = self.updater.update_weights(&registry, &performance)?;
        for record in &mut performance {
            if let Some(weight) = staged.weight(&record.strategy) {
                record.current_weight = weight;
            }
        }

        guard.advance(PipelineState::Generating);
        let target = self.settings.schedule.next_after(date);
        let batch = if self.store.tickets_for(target).await?.is_empty() {
            let context = self
                .context
                .snapshot(self.settings.rules, self.settings.momentum_window)
                .await
                .map_err(|e| Error::ContextUnavailable(e.to_string()))?;
            let seed = self.run_seed(target);
            let batch = self
                .generator
                .generate_batch(
                    &staged,
                    Arc::new(context),
                    target,
                    self.settings.batch_size,
                    seed,
                )
                .await?;
            Some((batch, seed))
        } else {
            info!(%target, "Target already has a batch, not generating");
            None
        };

        let report = RunReport {
            outcome_date: date,
            outcome_status,
            evaluated: results.len(),
            wins: results.iter().filter(|r| r.is_win()).count(),
            target,
            tickets: batch.as_ref().map_or(0, |(b, _)| b.len()),
            fallback_tickets: batch.as_ref().map_or(0, |(b, _)| b.fallback_count()),
            exhausted: batch.as_ref().is_some_and(|(b, _)| b.exhausted),
            batch_exists: batch.is_none(),
            seed: batch.as_ref().map(|(_, seed)| *seed),
            weights: staged.weights(),
        };

        let commit = RunCommit {
            outcome_date: date,
            outcome_status,
            evaluations: results,
            performance,
            weights: staged.weights(),
            tickets: batch.map(|(b, _)| b.tickets).unwrap_or_default(),
        };
        match self.store.commit_run(&commit).await {
            Ok(()) => {}
            Err(Error::AlreadyProcessed { .. }) => {
                // Another process committed this outcome while we worked.
                let status = self
                    .store
                    .outcome_status(date)
                    .await?
                    .unwrap_or(OutcomeStatus::Pending);
                warn!(%status, "Outcome processed concurrently, discarding run");
                return Ok(RunResult::Skipped {
                    draw_date: date,
                    status,
                });
            }
            Err(e) => return Err(e),
        }
        *self.registry.write() = staged;

        info!(
            status = %report.outcome_status,
            evaluated = report.evaluated,
            wins = report.wins,
            target = %report.target,
            tickets = report.tickets,
            fallback = report.fallback_tickets,
            "Pipeline run committed"
        );
        Ok(RunResult::Completed(report))
    }

    /// Reject an outcome whose date was recorded with other numbers.
    async fn ensure_same_outcome(&self, outcome: &Outcome) -> Result<()> {
        let Some(stored) = self.store.get_outcome(outcome.draw_date()).await? else {
            return Ok(());
        };
        if stored.primary_numbers() != outcome.primary_numbers()
            || stored.secondary_number() != outcome.secondary_number()
        {
            warn!(
                stored = ?stored.primary_numbers(),
                given = ?outcome.primary_numbers(),
                "Outcome conflicts with the recorded draw"
            );
            return Err(DomainError::ConflictingOutcome {
                draw_date: outcome.draw_date().to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn run_seed(&self, target: DrawDate) -> u64 {
        let base = self.settings.seed.unwrap_or_else(rand::random);
        let day = u64::try_from(target.date().num_days_from_ce()).unwrap_or_default();
        base ^ day.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    /// Run once for every outcome `source` has beyond the last one processed.
    ///
    /// Stops at the first failing run.
    ///
    /// # Errors
    /// Returns the source error or the first run error.
    pub async fn run_pending(&self, source: &dyn OutcomeSource) -> Result<Vec<RunResult>> {
        let after = self.latest_processed().await?;
        let mut outcomes = source.outcomes_after(&self.settings.rules, after).await?;
        outcomes.sort_by_key(Outcome::draw_date);
        info!(
            source = source.name(),
            after = ?after.map(|d| d.to_string()),
            pending = outcomes.len(),
            "Draining outcome source"
        );

        let mut results = Vec::with_capacity(outcomes.len());
        for outcome in &outcomes {
            results.push(self.run(outcome).await?);
        }
        Ok(results)
    }

    async fn latest_processed(&self) -> Result<Option<DrawDate>> {
        let outcomes = self.store.list_outcomes().await?;
        for outcome in outcomes.iter().rev() {
            let status = self.store.outcome_status(outcome.draw_date()).await?;
            if status.is_some_and(OutcomeStatus::is_processed) {
                return Ok(Some(outcome.draw_date()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::store::{MemoryStore, StoreContextProvider};
    use crate::application::strategy::{FrequencyConfig, RandomConfig};

    type Orchestrator = PipelineOrchestrator<MemoryStore, StoreContextProvider<MemoryStore>>;

    fn orchestrator() -> Orchestrator {
        let store = Arc::new(MemoryStore::new());
        let context = Arc::new(StoreContextProvider::new(Arc::clone(&store)));
        let registry = StrategyRegistry::builder()
            .frequency(FrequencyConfig::default())
            .random(RandomConfig::default())
            .build()
            .unwrap();
        let settings = PipelineSettings {
            batch_size: 10,
            seed: Some(5),
            ..PipelineSettings::default()
        };
        PipelineOrchestrator::new(store, context, registry, settings)
    }

    fn outcome(day: u32) -> Outcome {
        Outcome::try_new(
            &GameRules::default(),
            DrawDate::from_ymd(2026, 10, day).unwrap(),
            &[4, 8, 15, 16, 23],
            7,
        )
        .unwrap()
    }

    #[test]
    fn state_labels() {
        assert_eq!(PipelineState::UpdatingWeights.to_string(), "UPDATING_WEIGHTS");
        assert_eq!(PipelineState::Idle.as_str(), "IDLE");
    }

    #[tokio::test]
    async fn second_start_fails_fast() {
        let orchestrator = orchestrator();
        let guard = orchestrator.begin().unwrap();
        assert_eq!(orchestrator.state(), PipelineState::Evaluating);

        let err = orchestrator.run(&outcome(17)).await.unwrap_err();
        assert!(matches!(err, Error::RunInProgress { ref state } if state == "EVALUATING"));

        drop(guard);
        assert_eq!(orchestrator.state(), PipelineState::Idle);
    }

    #[tokio::test]
    async fn first_run_has_no_predictions_then_generates() {
        let orchestrator = orchestrator();
        let result = orchestrator.run(&outcome(17)).await.unwrap();

        let RunResult::Completed(report) = result else {
            panic!("expected a completed run");
        };
        assert_eq!(report.outcome_status, OutcomeStatus::NoPredictions);
        assert_eq!(report.evaluated, 0);
        // 2026-10-17 is a Saturday; the next default draw is Monday.
        assert_eq!(report.target, DrawDate::from_ymd(2026, 10, 19).unwrap());
        assert_eq!(report.tickets, 10);
        assert_eq!(orchestrator.state(), PipelineState::Idle);

        let stored = orchestrator.store().tickets_for(report.target).await.unwrap();
        assert_eq!(stored.len(), 10);
    }

    #[tokio::test]
    async fn second_outcome_evaluates_previous_batch() {
        let orchestrator = orchestrator();
        orchestrator.run(&outcome(17)).await.unwrap();
        let result = orchestrator.run(&outcome(19)).await.unwrap();

        let RunResult::Completed(report) = result else {
            panic!("expected a completed run");
        };
        assert_eq!(report.outcome_status, OutcomeStatus::Evaluated { tickets: 10 });
        assert_eq!(report.evaluated, 10);

        let sum: f64 = orchestrator.registry().weight_vector().iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        let persisted = orchestrator.store().load_weights().await.unwrap();
        assert_eq!(persisted, orchestrator.registry().weights());
    }

    #[tokio::test]
    async fn processed_outcome_is_skipped() {
        let orchestrator = orchestrator();
        orchestrator.run(&outcome(17)).await.unwrap();
        let again = orchestrator.run(&outcome(17)).await.unwrap();
        assert!(matches!(again, RunResult::Skipped { .. }));
    }
}
