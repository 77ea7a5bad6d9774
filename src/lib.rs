//! Drawbrain - adaptive multi-strategy ticket generation and evaluation.
//!
//! A set of pluggable strategies proposes tickets for the next draw. When
//! a real outcome arrives, the pipeline scores every ticket that targeted
//! it, folds the results into rolling per-strategy performance, and shifts
//! sampling weight toward the strategies that paid off before generating
//! the next batch.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Pure types: game rules, tickets, outcomes, prizes, performance
//! - [`port`] - Traits at the seams: [`port::Strategy`], [`port::EngineStore`],
//!   [`port::HistoricalContextProvider`], [`port::OutcomeSource`]
//! - [`application`] - Registry, generator, evaluator, aggregator, weight
//!   updater, and the [`application::PipelineOrchestrator`] that sequences them
//! - [`adapter`] - SQLite and in-memory stores, JSON outcome feed, CLI
//! - [`infrastructure`] - Configuration loading and component factories
//!
//! # Example
//!
//! ```no_run
//! use drawbrain::infrastructure::config::settings::Config;
//! use drawbrain::infrastructure::factory::pipeline::build_pipeline;
//! use drawbrain::domain::{DrawDate, Outcome};
//!
//! # async fn run() -> drawbrain::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let pipeline = build_pipeline(&config)?;
//! let date = DrawDate::from_ymd(2026, 10, 17).unwrap();
//! let outcome = Outcome::try_new(&config.game, date, &[4, 8, 15, 16, 23], 7)?;
//! pipeline.run(&outcome).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
