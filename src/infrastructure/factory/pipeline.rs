//! Orchestrator factory: store, context provider and registry wired together.

use std::sync::Arc;

use crate::adapter::outbound::history::StoreContextProvider;
use crate::adapter::outbound::sqlite::SqliteStore;
use crate::application::pipeline::PipelineOrchestrator;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::store::EngineStore;

use super::persistence::build_store;
use super::strategy::build_strategy_registry;

/// The orchestrator as the binary runs it.
pub type SqlitePipeline = PipelineOrchestrator<SqliteStore, StoreContextProvider<SqliteStore>>;

/// Build an orchestrator over any store, with snapshots read from that store.
///
/// # Errors
/// Returns an error if the strategy registry cannot be built.
pub fn build_pipeline_with_store<S: EngineStore>(
    config: &Config,
    store: Arc<S>,
) -> Result<PipelineOrchestrator<S, StoreContextProvider<S>>> {
    let registry = build_strategy_registry(config)?;
    let context = Arc::new(StoreContextProvider::new(Arc::clone(&store)));
    Ok(PipelineOrchestrator::new(
        store,
        context,
        registry,
        config.pipeline_settings(),
    ))
}

/// Build the SQLite-backed orchestrator described by `config`.
///
/// # Errors
/// Returns an error if the database or the strategy registry cannot be set up.
pub fn build_pipeline(config: &Config) -> Result<SqlitePipeline> {
    let store = Arc::new(build_store(config)?);
    build_pipeline_with_store(config, store)
}
