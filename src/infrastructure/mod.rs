//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! engine logic: configuration loading and component wiring.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`factory`] - Component factory functions
//! - [`operator`] - Operator use-cases for the CLI

pub mod config;
pub mod factory;
pub mod operator;
