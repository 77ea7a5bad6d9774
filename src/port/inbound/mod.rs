//! Inbound ports (driving side): extension points the engine drives and
//! the operator surface adapters drive it through.

pub mod operator;
pub mod strategy;
