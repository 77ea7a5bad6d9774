//! Number-drawing helpers shared by the built-in strategies.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;

use crate::port::inbound::strategy::{StrategyError, StrategyRng};

/// Draw `k` distinct numbers from `1..=max`, weighted by `weights[n]`.
///
/// `weights` is indexed by number; index 0 is ignored.
pub(crate) fn weighted_distinct(
    rng: &mut StrategyRng,
    weights: &[f64],
    max: u8,
    k: usize,
) -> Result<Vec<u8>, StrategyError> {
    let numbers: Vec<u8> = (1..=max).collect();
    let chosen = numbers
        .choose_multiple_weighted(rng, k, |n| weight_at(weights, *n))
        .map_err(|e| StrategyError::Failed(format!("weighted draw: {e}")))?;
    let chosen: Vec<u8> = chosen.copied().collect();
    if chosen.len() != k {
        return Err(StrategyError::Failed(format!(
            "weighted draw returned {} of {k} numbers",
            chosen.len()
        )));
    }
    Ok(chosen)
}

/// Draw one number from `1..=max`, weighted by `weights[n]`.
pub(crate) fn weighted_one(
    rng: &mut StrategyRng,
    weights: &[f64],
    max: u8,
) -> Result<u8, StrategyError> {
    let dist = WeightedIndex::new((1..=max).map(|n| weight_at(weights, n)))
        .map_err(|e| StrategyError::Failed(format!("weighted draw: {e}")))?;
    u8::try_from(dist.sample(rng) + 1)
        .map_err(|_| StrategyError::Failed("secondary number overflow".into()))
}

/// Draw `k` distinct numbers uniformly from `1..=max`.
pub(crate) fn uniform_distinct(rng: &mut StrategyRng, max: u8, k: usize) -> Vec<u8> {
    rand::seq::index::sample(rng, usize::from(max), k)
        .into_iter()
        .filter_map(|i| u8::try_from(i + 1).ok())
        .collect()
}

/// Laplace-smoothed weights from a count table.
pub(crate) fn smoothed(table: &[u32], smoothing: f64) -> Vec<f64> {
    table.iter().map(|&c| f64::from(c) + smoothing).collect()
}

/// Confidence from how far the chosen numbers sit above the average weight.
///
/// A pick of exactly average numbers scores `base`; the lift is capped at
/// 2x and the result clamped to `[0, 1]`.
pub(crate) fn lifted_confidence(base: f64, weights: &[f64], chosen: &[u8]) -> f64 {
    let all: Vec<f64> = weights.iter().skip(1).copied().collect();
    if all.is_empty() || chosen.is_empty() {
        return base.clamp(0.0, 1.0);
    }
    let mean_all = all.iter().sum::<f64>() / all.len() as f64;
    let mean_chosen =
        chosen.iter().map(|&n| weight_at(weights, n)).sum::<f64>() / chosen.len() as f64;
    if mean_all <= 0.0 {
        return base.clamp(0.0, 1.0);
    }
    let lift = (mean_chosen / mean_all).min(2.0);
    (base * lift).clamp(0.0, 1.0)
}

fn weight_at(weights: &[f64], n: u8) -> f64 {
    weights
        .get(usize::from(n))
        .copied()
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(f64::MIN_POSITIVE)
}
