//! Application services (use cases).
//!
//! These services move data between the domain types and the ports:
//! generation, evaluation, aggregation, re-weighting, and the pipeline
//! that sequences them.

pub mod aggregator;
pub mod evaluator;
pub mod generator;
pub mod pipeline;
pub mod query;
pub mod strategy;
pub mod weights;

pub use aggregator::PerformanceAggregator;
pub use evaluator::{Evaluation, OutcomeEvaluator};
pub use generator::{BatchStrategyStats, TicketBatch, TicketBatchGenerator};
pub use pipeline::{PipelineOrchestrator, PipelineSettings, PipelineState, RunReport, RunResult};
pub use query::{latest_batch, strategy_performance, StrategyPerformanceView, TicketQuery};
pub use strategy::registry::{StrategyRegistry, WeightBounds};
pub use weights::AdaptiveWeightUpdater;
