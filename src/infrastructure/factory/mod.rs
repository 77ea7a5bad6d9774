//! Factory modules for building infrastructure components.
//!
//! Provides factory functions that construct fully-configured components
//! from application configuration. These factories handle dependency
//! injection and wiring.
//!
//! # Submodules
//!
//! - [`persistence`] - Database store construction
//! - [`pipeline`] - Orchestrator construction
//! - [`strategy`] - Strategy registry construction

pub mod persistence;
pub mod pipeline;
pub mod strategy;
