use std::collections::BTreeMap;
use std::sync::Arc;

use rand::distributions::{Distribution, WeightedIndex};
use tracing::debug;

use crate::error::{Error, Result, WeightInvariantViolation};
use crate::port::inbound::strategy::{Strategy, StrategyRng};

use super::balanced::{BalancedConfig, BalancedStrategy};
use super::frequency::{FrequencyConfig, FrequencyStrategy};
use super::gap::{GapConfig, GapStrategy};
use super::momentum::{MomentumConfig, MomentumStrategy};
use super::random::{RandomConfig, UniformRandomStrategy};

/// Tolerance on the sum-to-one invariant.
pub const WEIGHT_EPSILON: f64 = 1e-6;

/// Slack allowed on the clamp check for floating-point rounding.
const CLAMP_SLACK: f64 = 1e-12;

/// Bisection steps when searching for the water level.
const WATER_LEVEL_ITERATIONS: usize = 200;

/// Inclusive bounds every strategy weight must respect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightBounds {
    pub min: f64,
    pub max: f64,
}

impl WeightBounds {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a weight into the bounds.
    #[must_use]
    pub fn clamp(&self, weight: f64) -> f64 {
        weight.clamp(self.min, self.max)
    }

    /// Whether `count` weights in these bounds can sum to 1.
    #[must_use]
    pub fn feasible_for(&self, count: usize) -> bool {
        let n = count as f64;
        self.min > 0.0
            && self.min <= self.max
            && n * self.min <= 1.0 + WEIGHT_EPSILON
            && n * self.max >= 1.0 - WEIGHT_EPSILON
    }
}

impl Default for WeightBounds {
    fn default() -> Self {
        Self::new(0.02, 0.6)
    }
}

/// A registered strategy and its current share of the sampling mass.
#[derive(Clone)]
pub struct RegisteredStrategy {
    strategy: Arc<dyn Strategy>,
    weight: f64,
}

impl RegisteredStrategy {
    #[must_use]
    pub fn strategy(&self) -> &Arc<dyn Strategy> {
        &self.strategy
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.strategy.name()
    }

    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }
}

/// Registry of strategies and their weights.
///
/// Entries keep registration order; that order breaks sampling ties and
/// seeds per-strategy generators, so it is part of reproducibility.
///
/// Cloning is cheap (strategies are shared behind `Arc`), which lets the
/// orchestrator stage a new weight vector on a copy and swap it in only
/// after the run commits.
#[derive(Clone)]
pub struct StrategyRegistry {
    entries: Vec<RegisteredStrategy>,
    bounds: WeightBounds,
}

impl StrategyRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new(bounds: WeightBounds) -> Self {
        Self {
            entries: Vec::new(),
            bounds,
        }
    }

    /// Create a builder for constructing a registry from config.
    #[must_use]
    pub fn builder() -> StrategyRegistryBuilder {
        StrategyRegistryBuilder::new()
    }

    /// Register a strategy. Weights reset to uniform.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateStrategy`] if the name is taken.
    pub fn register(&mut self, strategy: Arc<dyn Strategy>) -> Result<()> {
        if self.index_of(strategy.name()).is_some() {
            return Err(Error::DuplicateStrategy(strategy.name().to_string()));
        }
        self.entries.push(RegisteredStrategy {
            strategy,
            weight: 0.0,
        });
        let uniform = 1.0 / self.entries.len() as f64;
        for entry in &mut self.entries {
            entry.weight = uniform;
        }
        Ok(())
    }

    /// Get all registered strategies in registration order.
    #[must_use]
    pub fn entries(&self) -> &[RegisteredStrategy] {
        &self.entries
    }

    /// Strategy names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name().to_string()).collect()
    }

    /// Number of registered strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn bounds(&self) -> WeightBounds {
        self.bounds
    }

    /// Position of a strategy by name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name() == name)
    }

    /// Current weight of a strategy by name.
    #[must_use]
    pub fn weight(&self, name: &str) -> Option<f64> {
        self.index_of(name).map(|i| self.entries[i].weight)
    }

    /// Weights in registration order.
    #[must_use]
    pub fn weight_vector(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.weight).collect()
    }

    /// Weights keyed by strategy name.
    #[must_use]
    pub fn weights(&self) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .map(|e| (e.name().to_string(), e.weight))
            .collect()
    }

    /// Load a persisted weight vector.
    ///
    /// Strategies absent from `weights` start at the uniform share; names
    /// in `weights` that are not registered are ignored. The result is
    /// clamped and normalized.
    ///
    /// # Errors
    /// Returns a [`WeightInvariantViolation`] if normalization fails.
    pub fn load_weights(
        &mut self,
        weights: &BTreeMap<String, f64>,
    ) -> std::result::Result<(), WeightInvariantViolation> {
        if self.entries.is_empty() {
            return Ok(());
        }
        let uniform = 1.0 / self.entries.len() as f64;
        let values: Vec<f64> = self
            .entries
            .iter()
            .map(|e| {
                let w = weights.get(e.name()).copied().unwrap_or(uniform);
                self.bounds.clamp(w)
            })
            .collect();
        self.apply(values)
    }

    /// Replace weights in registration order, then normalize.
    ///
    /// # Errors
    /// Returns a [`WeightInvariantViolation`] if the vector has the wrong
    /// length or cannot be normalized.
    pub fn set_weight_vector(
        &mut self,
        values: Vec<f64>,
    ) -> std::result::Result<(), WeightInvariantViolation> {
        if values.len() != self.entries.len() {
            return Err(WeightInvariantViolation::Sum {
                sum: values.iter().sum(),
                epsilon: WEIGHT_EPSILON,
            });
        }
        self.apply(values)
    }

    fn apply(&mut self, values: Vec<f64>) -> std::result::Result<(), WeightInvariantViolation> {
        for (entry, value) in self.entries.iter_mut().zip(values) {
            entry.weight = value;
        }
        self.normalize()
    }

    /// Rescale weights to sum to 1 while respecting the bounds.
    ///
    /// Uses water-filling: finds the level `c` with
    /// `Σ clamp(c·wᵢ, min, max) = 1`, then spreads the remaining mass
    /// exactly over the strategies not pinned to a bound.
    ///
    /// # Errors
    /// Returns a [`WeightInvariantViolation`] if a weight is not finite,
    /// the bounds are infeasible, or the result breaks an invariant.
    pub fn normalize(&mut self) -> std::result::Result<(), WeightInvariantViolation> {
        for entry in &self.entries {
            if !entry.weight.is_finite() {
                return Err(WeightInvariantViolation::NotFinite {
                    strategy: entry.name().to_string(),
                });
            }
        }

        let filled = water_fill(&self.weight_vector(), self.bounds)?;
        for (entry, value) in self.entries.iter_mut().zip(filled) {
            entry.weight = value;
        }
        self.check_invariants()
    }

    /// Verify the sum and clamp invariants.
    ///
    /// # Errors
    /// Returns the first [`WeightInvariantViolation`] found.
    pub fn check_invariants(&self) -> std::result::Result<(), WeightInvariantViolation> {
        if self.entries.is_empty() {
            return Ok(());
        }
        for entry in &self.entries {
            if entry.weight < self.bounds.min - CLAMP_SLACK
                || entry.weight > self.bounds.max + CLAMP_SLACK
            {
                return Err(WeightInvariantViolation::Clamp {
                    strategy: entry.name().to_string(),
                    weight: entry.weight,
                    min: self.bounds.min,
                    max: self.bounds.max,
                });
            }
        }
        let sum: f64 = self.entries.iter().map(|e| e.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_EPSILON {
            return Err(WeightInvariantViolation::Sum {
                sum,
                epsilon: WEIGHT_EPSILON,
            });
        }
        Ok(())
    }

    /// Draw `k` strategy indices with replacement, weighted by current weight.
    ///
    /// # Errors
    /// Returns [`Error::NoStrategies`] on an empty registry, or a weight
    /// invariant error if the weights cannot form a distribution.
    pub fn sample(&self, k: usize, rng: &mut StrategyRng) -> Result<Vec<usize>> {
        if self.entries.is_empty() {
            return Err(Error::NoStrategies);
        }
        let dist = WeightedIndex::new(self.entries.iter().map(|e| e.weight)).map_err(|_| {
            WeightInvariantViolation::Sum {
                sum: self.entries.iter().map(|e| e.weight).sum(),
                epsilon: WEIGHT_EPSILON,
            }
        })?;
        Ok((0..k).map(|_| dist.sample(rng)).collect())
    }
}

/// Water-filling normalization of `values` into `bounds`.
fn water_fill(
    values: &[f64],
    bounds: WeightBounds,
) -> std::result::Result<Vec<f64>, WeightInvariantViolation> {
    let n = values.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if !bounds.feasible_for(n) {
        return Err(WeightInvariantViolation::Infeasible {
            min: bounds.min,
            max: bounds.max,
            count: n,
        });
    }

    // Non-positive weights carry no preference; treat them as the floor.
    let raw: Vec<f64> = values
        .iter()
        .map(|&w| if w > 0.0 { w } else { bounds.min })
        .collect();

    let filled = |c: f64| -> f64 { raw.iter().map(|&w| bounds.clamp(c * w)).sum() };

    let smallest = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let (mut lo, mut hi) = (0.0_f64, bounds.max / smallest);
    for _ in 0..WATER_LEVEL_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if filled(mid) < 1.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let level = 0.5 * (lo + hi);

    let mut result = vec![0.0; n];
    let mut pinned_mass = 0.0;
    let mut free_mass = 0.0;
    let mut free = Vec::with_capacity(n);
    for (i, &w) in raw.iter().enumerate() {
        let scaled = level * w;
        if scaled <= bounds.min {
            result[i] = bounds.min;
            pinned_mass += bounds.min;
        } else if scaled >= bounds.max {
            result[i] = bounds.max;
            pinned_mass += bounds.max;
        } else {
            free.push(i);
            free_mass += w;
        }
    }

    if !free.is_empty() && free_mass > 0.0 {
        let exact = (1.0 - pinned_mass) / free_mass;
        for &i in &free {
            result[i] = bounds.clamp(exact * raw[i]);
        }
    }

    debug!(level, pinned = n - free.len(), free = free.len(), "Water-filled weights");
    Ok(result)
}

/// Builder for constructing a [`StrategyRegistry`] from configuration.
///
/// # Example
///
/// ```ignore
/// let registry = StrategyRegistry::builder()
///     .bounds(WeightBounds::new(0.02, 0.6))
///     .frequency(FrequencyConfig::default())
///     .gap(GapConfig::default())
///     .random(RandomConfig::default())
///     .build()?;
/// ```
#[derive(Default)]
pub struct StrategyRegistryBuilder {
    bounds: Option<WeightBounds>,
    strategies: Vec<Arc<dyn Strategy>>,
}

impl StrategyRegistryBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bounds(mut self, bounds: WeightBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn frequency(self, config: FrequencyConfig) -> Self {
        self.strategy(Arc::new(FrequencyStrategy::new(config)))
    }

    #[must_use]
    pub fn gap(self, config: GapConfig) -> Self {
        self.strategy(Arc::new(GapStrategy::new(config)))
    }

    #[must_use]
    pub fn momentum(self, config: MomentumConfig) -> Self {
        self.strategy(Arc::new(MomentumStrategy::new(config)))
    }

    #[must_use]
    pub fn balanced(self, config: BalancedConfig) -> Self {
        self.strategy(Arc::new(BalancedStrategy::new(config)))
    }

    #[must_use]
    pub fn random(self, config: RandomConfig) -> Self {
        self.strategy(Arc::new(UniformRandomStrategy::new(config)))
    }

    /// Add any strategy, including ones defined outside this crate.
    #[must_use]
    pub fn strategy(mut self, strategy: Arc<dyn Strategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Build the registry with uniform starting weights.
    ///
    /// # Errors
    /// Returns an error on duplicate names, an empty registry, or bounds
    /// that cannot hold the registered strategies.
    pub fn build(self) -> Result<StrategyRegistry> {
        let mut registry = StrategyRegistry::new(self.bounds.unwrap_or_default());
        for strategy in self.strategies {
            registry.register(strategy)?;
        }
        if registry.is_empty() {
            return Err(Error::NoStrategies);
        }
        registry.normalize()?;
        Ok(registry)
    }
}
