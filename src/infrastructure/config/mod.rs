//! Infrastructure configuration modules.

pub mod engine;
pub mod logging;
pub mod settings;
pub mod strategy;
