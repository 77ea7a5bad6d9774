//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed [`EngineStore`](crate::port::outbound::store::EngineStore)
//! using Diesel ORM with embedded migrations.

pub mod database;
pub mod store;

pub use store::SqliteStore;
