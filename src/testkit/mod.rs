//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`]: Builders for rules, dates, outcomes and tickets.
//! - [`config`]: Canonical test settings and registries.
//! - [`store`]: Store wrappers that fail on demand.
//! - [`strategy`]: Strategies that misbehave in controlled ways.

pub mod config;
pub mod domain;
pub mod store;
pub mod strategy;
