//! Trait definitions (hexagonal ports).
//!
//! Outbound ports depend only on domain; the operator port speaks in the
//! application's read models.
//!
//! # Available Ports
//!
//! - [`Strategy`] - Candidate ticket generation (inbound extension point)
//! - [`EngineStore`] - Persistence for outcomes, tickets, evaluations, weights
//! - [`HistoricalContextProvider`] - Immutable historical snapshot
//! - [`OutcomeSource`] - Feed of new outcomes
//! - [`EngineOperator`] - Use-cases the CLI drives

pub mod inbound;
pub mod outbound;

pub use inbound::operator::{EngineOperator, StrategyInfo};
pub use inbound::strategy::{Strategy, StrategyError, StrategyOutput, StrategyRng};
pub use outbound::history::{HistoricalContextProvider, OutcomeSource};
pub use outbound::store::{EngineStore, RunCommit};
