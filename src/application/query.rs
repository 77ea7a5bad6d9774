//! Read-only projections for outer layers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{DrawDate, Ticket};
use crate::error::Result;
use crate::port::outbound::store::EngineStore;

/// Filter for [`latest_batch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketQuery {
    /// Target draw; the latest targeted draw when unset.
    pub target: Option<DrawDate>,
    pub strategy: Option<String>,
    pub min_confidence: Option<f64>,
    pub limit: Option<usize>,
}

/// Tickets of one batch, highest confidence first.
///
/// Ties keep storage order.
///
/// # Errors
/// Returns an error if the store cannot be read.
pub async fn latest_batch<S: EngineStore>(store: &S, query: &TicketQuery) -> Result<Vec<Ticket>> {
    let target = match query.target {
        Some(target) => target,
        None => match store.latest_target().await? {
            Some(target) => target,
            None => return Ok(Vec::new()),
        },
    };

    let mut tickets: Vec<Ticket> = store
        .tickets_for(target)
        .await?
        .into_iter()
        .filter(|t| {
            query
                .strategy
                .as_deref()
                .map_or(true, |name| t.origin_strategy() == name)
        })
        .filter(|t| query.min_confidence.map_or(true, |min| t.confidence() >= min))
        .collect();

    tickets.sort_by(|a, b| b.confidence().total_cmp(&a.confidence()));
    if let Some(limit) = query.limit {
        tickets.truncate(limit);
    }
    Ok(tickets)
}

/// Per-strategy performance as shown to readers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyPerformanceView {
    pub strategy: String,
    pub weight: f64,
    pub win_rate: f64,
    pub roi: f64,
    pub total_plays: u64,
    pub total_wins: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Projection of the stored performance records and weights.
///
/// Strategies with a persisted weight but no record yet appear with zero
/// plays.
///
/// # Errors
/// Returns an error if the store cannot be read.
pub async fn strategy_performance<S: EngineStore>(
    store: &S,
) -> Result<Vec<StrategyPerformanceView>> {
    let mut weights = store.load_weights().await?;
    let mut views: Vec<StrategyPerformanceView> = store
        .load_performance()
        .await?
        .into_iter()
        .map(|record| StrategyPerformanceView {
            weight: weights
                .remove(&record.strategy)
                .unwrap_or(record.current_weight),
            strategy: record.strategy,
            win_rate: record.win_rate,
            roi: record.roi,
            total_plays: record.total_plays,
            total_wins: record.total_wins,
            last_updated: Some(record.last_updated),
        })
        .collect();

    views.extend(weights.into_iter().map(|(strategy, weight)| StrategyPerformanceView {
        strategy,
        weight,
        win_rate: 0.0,
        roi: 0.0,
        total_plays: 0,
        total_wins: 0,
        last_updated: None,
    }));
    views.sort_by(|a, b| a.strategy.cmp(&b.strategy));
    Ok(views)
}
