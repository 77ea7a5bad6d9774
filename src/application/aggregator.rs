//! Rolling per-strategy performance.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{EvaluationResult, PerformanceSample, StrategyPerformanceRecord};

/// Folds evaluation results into bounded per-strategy windows.
#[derive(Debug, Clone)]
pub struct PerformanceAggregator {
    window_size: usize,
    stake: Decimal,
}

impl PerformanceAggregator {
    #[must_use]
    pub fn new(window_size: usize, stake: Decimal) -> Self {
        Self {
            window_size: window_size.max(1),
            stake,
        }
    }

    #[must_use]
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    /// Append `results` to one record's window and recompute its rates.
    pub fn update<'a>(
        &self,
        record: &mut StrategyPerformanceRecord,
        results: impl IntoIterator<Item = &'a EvaluationResult>,
    ) {
        let mut added = 0;
        for result in results {
            record.push(PerformanceSample::from(result), self.window_size);
            added += 1;
        }
        record.recompute(self.stake);
        if added > 0 {
            record.last_updated = Utc::now();
        }
    }

    /// Produce updated records for every name in `strategies`.
    ///
    /// Existing records are carried forward; strategies without one start
    /// empty at `default_weight`. Results credited to strategies no longer
    /// registered are ignored.
    #[must_use]
    pub fn aggregate(
        &self,
        strategies: &[String],
        existing: Vec<StrategyPerformanceRecord>,
        results: &[EvaluationResult],
        default_weight: f64,
    ) -> Vec<StrategyPerformanceRecord> {
        let mut by_name: BTreeMap<String, StrategyPerformanceRecord> = existing
            .into_iter()
            .map(|r| (r.strategy.clone(), r))
            .collect();

        let mut grouped: BTreeMap<&str, Vec<&EvaluationResult>> = BTreeMap::new();
        for result in results {
            grouped
                .entry(result.origin_strategy.as_str())
                .or_default()
                .push(result);
        }

        strategies
            .iter()
            .map(|name| {
                let mut record = by_name
                    .remove(name)
                    .unwrap_or_else(|| StrategyPerformanceRecord::new(name.clone(), default_weight));
                let fresh = grouped.remove(name.as_str()).unwrap_or_default();
                if !fresh.is_empty() {
                    debug!(strategy = %name, results = fresh.len(), "Aggregating results");
                }
                self.update(&mut record, fresh);
                record
            })
            .collect()
    }
}
