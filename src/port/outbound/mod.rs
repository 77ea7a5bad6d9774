//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the engine's external collaborators: durable
//! storage, the historical snapshot, and the outcome feed.

pub mod history;
pub mod store;
