//! Ticket generation strategies.
//!
//! Concrete generators implementing the
//! [`Strategy`](crate::port::inbound::strategy::Strategy) trait:
//!
//! - [`frequency`]: numbers weighted by all-time draw frequency
//! - [`gap`]: numbers weighted by draws since last seen
//! - [`momentum`]: numbers weighted toward the recent window
//! - [`balanced`]: uniform picks filtered toward an even spread
//! - [`random`]: uniform baseline and the fallback for degraded strategies
//!
//! Use [`registry::StrategyRegistry`] to hold strategies and their weights.

pub mod balanced;
pub mod frequency;
pub mod gap;
pub mod momentum;
pub mod random;
pub mod registry;
mod sampling;

pub use balanced::{BalancedConfig, BalancedStrategy};
pub use frequency::{FrequencyConfig, FrequencyStrategy};
pub use gap::{GapConfig, GapStrategy};
pub use momentum::{MomentumConfig, MomentumStrategy};
pub use random::{RandomConfig, UniformRandomStrategy};
pub use registry::{StrategyRegistry, StrategyRegistryBuilder, WeightBounds, WEIGHT_EPSILON};
