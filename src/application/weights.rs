//! Adaptive weight updates from rolling performance.
//!
//! The rule is a bounded multiplicative step on ROI relative to the mean:
//!
//! ```text
//! mean     = mean ROI over strategies with at least one play
//! relative = clamp((roi - mean) / mean, -1, 1)   if mean > 0, else 0
//! new      = clamp(w * (1 + lr * relative), min, max)
//! ```
//!
//! followed by [`StrategyRegistry::normalize`]. With `lr < 1` a step can
//! never reach zero, and every stage is monotone in ROI.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::application::strategy::registry::StrategyRegistry;
use crate::domain::StrategyPerformanceRecord;
use crate::error::WeightInvariantViolation;

/// Computes the next weight vector.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveWeightUpdater {
    learning_rate: f64,
}

impl AdaptiveWeightUpdater {
    /// `learning_rate` is expected in `(0, 1)`; config validation enforces it.
    #[must_use]
    pub const fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    #[must_use]
    pub const fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Relative performance signal per strategy, in `[-1, 1]`.
    ///
    /// Strategies without plays, or any strategy when the mean ROI is not
    /// positive, get 0.
    #[must_use]
    pub fn relative_performance(
        &self,
        records: &[StrategyPerformanceRecord],
    ) -> BTreeMap<String, f64> {
        let played: Vec<f64> = records
            .iter()
            .filter(|r| r.has_plays())
            .map(|r| r.roi)
            .collect();
        let mean = if played.is_empty() {
            0.0
        } else {
            played.iter().sum::<f64>() / played.len() as f64
        };

        records
            .iter()
            .map(|r| {
                let relative = if r.has_plays() && mean > 0.0 && r.roi.is_finite() {
                    ((r.roi - mean) / mean).clamp(-1.0, 1.0)
                } else {
                    0.0
                };
                (r.strategy.clone(), relative)
            })
            .collect()
    }

    /// Stage the next weights on a copy of `registry`.
    ///
    /// The input registry is untouched so a failed run leaves the live
    /// weights as they were.
    ///
    /// # Errors
    /// Returns a [`WeightInvariantViolation`] if the new vector breaks the
    /// sum or clamp invariant.
    pub fn update_weights(
        &self,
        registry: &StrategyRegistry,
        records: &[StrategyPerformanceRecord],
    ) -> Result<StrategyRegistry, WeightInvariantViolation> {
        let relative = self.relative_performance(records);
        let bounds = registry.bounds();

        let next: Vec<f64> = registry
            .entries()
            .iter()
            .map(|entry| {
                let signal = relative.get(entry.name()).copied().unwrap_or(0.0);
                let stepped = entry.weight() * (1.0 + self.learning_rate * signal);
                debug!(
                    strategy = entry.name(),
                    weight = entry.weight(),
                    relative = signal,
                    stepped,
                    "Weight step"
                );
                bounds.clamp(stepped)
            })
            .collect();

        let mut staged = registry.clone();
        staged.set_weight_vector(next)?;
        info!(weights = ?staged.weights(), "Weights updated");
        Ok(staged)
    }
}
