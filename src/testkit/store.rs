//! Store wrappers for failure-path tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::domain::{
    DrawDate, EvaluationResult, Outcome, OutcomeStatus, StrategyPerformanceRecord, Ticket,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{EngineStore, RunCommit};

pub use crate::adapter::outbound::history::StoreContextProvider;
pub use crate::adapter::outbound::memory::MemoryStore;

/// A [`MemoryStore`] whose `commit_run` can be made to fail.
///
/// A failed commit applies nothing, like a rolled-back transaction.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_commits: AtomicBool,
    commits: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The wrapped store, for seeding and inspection.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Make subsequent commits fail (or succeed again).
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Number of commits that went through.
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

impl EngineStore for FlakyStore {
    async fn record_outcome(&self, outcome: &Outcome) -> Result<bool> {
        self.inner.record_outcome(outcome).await
    }

    async fn get_outcome(&self, date: DrawDate) -> Result<Option<Outcome>> {
        self.inner.get_outcome(date).await
    }

    async fn outcome_status(&self, date: DrawDate) -> Result<Option<OutcomeStatus>> {
        self.inner.outcome_status(date).await
    }

    async fn list_outcomes(&self) -> Result<Vec<Outcome>> {
        self.inner.list_outcomes().await
    }

    async fn tickets_for(&self, target: DrawDate) -> Result<Vec<Ticket>> {
        self.inner.tickets_for(target).await
    }

    async fn unevaluated_tickets(&self, target: DrawDate) -> Result<Vec<Ticket>> {
        self.inner.unevaluated_tickets(target).await
    }

    async fn latest_target(&self) -> Result<Option<DrawDate>> {
        self.inner.latest_target().await
    }

    async fn evaluations_for(&self, date: DrawDate) -> Result<Vec<EvaluationResult>> {
        self.inner.evaluations_for(date).await
    }

    async fn save_evaluations(&self, results: &[EvaluationResult]) -> Result<usize> {
        self.inner.save_evaluations(results).await
    }

    async fn load_weights(&self) -> Result<BTreeMap<String, f64>> {
        self.inner.load_weights().await
    }

    async fn load_performance(&self) -> Result<Vec<StrategyPerformanceRecord>> {
        self.inner.load_performance().await
    }

    async fn commit_run(&self, commit: &RunCommit) -> Result<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(Error::Database("injected commit failure".into()));
        }
        self.inner.commit_run(commit).await?;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
