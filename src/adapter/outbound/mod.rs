//! Outbound adapters (driven side).

pub mod history;
pub mod memory;
pub mod sqlite;
