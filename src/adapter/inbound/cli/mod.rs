//! CLI module graph.

pub mod command;
pub mod operator;
pub mod output;
pub mod performance;
pub mod run;
pub mod strategy;
pub mod tickets;
