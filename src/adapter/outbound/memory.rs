//! In-memory store for tests and ephemeral runs.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;

use crate::domain::{
    DrawDate, EvaluationResult, Outcome, OutcomeStatus, StrategyPerformanceRecord, Ticket,
    TicketId,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{EngineStore, RunCommit};

/// In-memory [`EngineStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    outcomes: RwLock<BTreeMap<DrawDate, (Outcome, OutcomeStatus)>>,
    tickets: RwLock<Vec<Ticket>>,
    evaluations: RwLock<HashMap<TicketId, EvaluationResult>>,
    weights: RwLock<BTreeMap<String, f64>>,
    performance: RwLock<BTreeMap<String, StrategyPerformanceRecord>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert tickets directly, outside any run.
    pub fn insert_tickets(&self, tickets: &[Ticket]) {
        self.tickets.write().extend_from_slice(tickets);
    }

    /// Overwrite the persisted weight vector directly.
    pub fn put_weights(&self, weights: BTreeMap<String, f64>) {
        *self.weights.write() = weights;
    }

    /// Number of stored tickets across all targets.
    #[must_use]
    pub fn ticket_count(&self) -> usize {
        self.tickets.read().len()
    }
}

impl EngineStore for MemoryStore {
    async fn record_outcome(&self, outcome: &Outcome) -> Result<bool> {
        let mut outcomes = self.outcomes.write();
        if outcomes.contains_key(&outcome.draw_date()) {
            return Ok(false);
        }
        outcomes.insert(outcome.draw_date(), (outcome.clone(), OutcomeStatus::Pending));
        Ok(true)
    }

    async fn get_outcome(&self, date: DrawDate) -> Result<Option<Outcome>> {
        Ok(self.outcomes.read().get(&date).map(|(o, _)| o.clone()))
    }

    async fn outcome_status(&self, date: DrawDate) -> Result<Option<OutcomeStatus>> {
        Ok(self.outcomes.read().get(&date).map(|(_, s)| *s))
    }

    async fn list_outcomes(&self) -> Result<Vec<Outcome>> {
        Ok(self.outcomes.read().values().map(|(o, _)| o.clone()).collect())
    }

    async fn tickets_for(&self, target: DrawDate) -> Result<Vec<Ticket>> {
        Ok(self
            .tickets
            .read()
            .iter()
            .filter(|t| t.target() == target)
            .cloned()
            .collect())
    }

    async fn unevaluated_tickets(&self, target: DrawDate) -> Result<Vec<Ticket>> {
        let evaluations = self.evaluations.read();
        Ok(self
            .tickets
            .read()
            .iter()
            .filter(|t| t.target() == target && !evaluations.contains_key(&t.id()))
            .cloned()
            .collect())
    }

    async fn latest_target(&self) -> Result<Option<DrawDate>> {
        Ok(self.tickets.read().iter().map(Ticket::target).max())
    }

    async fn evaluations_for(&self, date: DrawDate) -> Result<Vec<EvaluationResult>> {
        let mut results: Vec<EvaluationResult> = self
            .evaluations
            .read()
            .values()
            .filter(|r| r.draw_date == date)
            .cloned()
            .collect();
        results.sort_by_key(|r| r.evaluated_at);
        Ok(results)
    }

    async fn save_evaluations(&self, results: &[EvaluationResult]) -> Result<usize> {
        let mut evaluations = self.evaluations.write();
        let mut inserted = 0;
        for result in results {
            if !evaluations.contains_key(&result.ticket_id) {
                evaluations.insert(result.ticket_id, result.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn load_weights(&self) -> Result<BTreeMap<String, f64>> {
        Ok(self.weights.read().clone())
    }

    async fn load_performance(&self) -> Result<Vec<StrategyPerformanceRecord>> {
        Ok(self.performance.read().values().cloned().collect())
    }

    async fn commit_run(&self, commit: &RunCommit) -> Result<()> {
        // Take every lock up front, in a fixed order, so the commit is seen whole.
        let mut outcomes = self.outcomes.write();
        let mut tickets = self.tickets.write();
        let mut evaluations = self.evaluations.write();
        let mut weights = self.weights.write();
        let mut performance = self.performance.write();

        let Some(entry) = outcomes.get_mut(&commit.outcome_date) else {
            return Err(Error::Database(format!(
                "outcome {} not recorded",
                commit.outcome_date
            )));
        };
        if entry.1 != OutcomeStatus::Pending {
            return Err(Error::AlreadyProcessed {
                draw_date: commit.outcome_date.to_string(),
            });
        }

        entry.1 = commit.outcome_status;
        for result in &commit.evaluations {
            evaluations
                .entry(result.ticket_id)
                .or_insert_with(|| result.clone());
        }
        *performance = commit
            .performance
            .iter()
            .map(|r| (r.strategy.clone(), r.clone()))
            .collect();
        weights.clone_from(&commit.weights);
        tickets.extend_from_slice(&commit.tickets);
        Ok(())
    }
}
