//! Pipeline fixtures shared by integration tests.

use std::sync::Arc;

use drawbrain::application::pipeline::{
    PipelineOrchestrator, PipelineSettings, RunReport, RunResult,
};
use drawbrain::application::strategy::StrategyRegistry;
use drawbrain::testkit::store::{FlakyStore, MemoryStore, StoreContextProvider};

pub type MemoryPipeline = PipelineOrchestrator<MemoryStore, StoreContextProvider<MemoryStore>>;
pub type FlakyPipeline = PipelineOrchestrator<FlakyStore, StoreContextProvider<FlakyStore>>;

/// Orchestrator over a fresh in-memory store.
pub fn memory_pipeline(registry: StrategyRegistry, settings: PipelineSettings) -> MemoryPipeline {
    let store = Arc::new(MemoryStore::new());
    let context = Arc::new(StoreContextProvider::new(Arc::clone(&store)));
    PipelineOrchestrator::new(store, context, registry, settings)
}

/// Orchestrator over a store whose commits can be made to fail.
pub fn flaky_pipeline(registry: StrategyRegistry, settings: PipelineSettings) -> FlakyPipeline {
    let store = Arc::new(FlakyStore::new());
    let context = Arc::new(StoreContextProvider::new(Arc::clone(&store)));
    PipelineOrchestrator::new(store, context, registry, settings)
}

/// Unwrap a completed run.
pub fn completed(result: RunResult) -> RunReport {
    match result {
        RunResult::Completed(report) => report,
        other => panic!("expected a completed run, got {other:?}"),
    }
}
