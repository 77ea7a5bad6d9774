//! Per-strategy rolling performance.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::evaluation::EvaluationResult;
use super::id::TicketId;

/// One evaluation as remembered by the rolling window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub ticket_id: TicketId,
    pub prize_value: Decimal,
    pub won: bool,
}

impl From<&EvaluationResult> for PerformanceSample {
    fn from(result: &EvaluationResult) -> Self {
        Self {
            ticket_id: result.ticket_id,
            prize_value: result.prize_value,
            won: result.is_win(),
        }
    }
}

/// Rolling-window aggregates for one strategy.
///
/// The window holds at most the most recent `window_size` samples so early
/// results cannot dominate forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPerformanceRecord {
    pub strategy: String,
    pub window: VecDeque<PerformanceSample>,
    pub total_plays: u64,
    pub total_wins: u64,
    /// Total prize over total stake in the window.
    pub roi: f64,
    pub win_rate: f64,
    pub current_weight: f64,
    pub last_updated: DateTime<Utc>,
}

impl StrategyPerformanceRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new(strategy: impl Into<String>, current_weight: f64) -> Self {
        Self {
            strategy: strategy.into(),
            window: VecDeque::new(),
            total_plays: 0,
            total_wins: 0,
            roi: 0.0,
            win_rate: 0.0,
            current_weight,
            last_updated: Utc::now(),
        }
    }

    /// Append a sample, evicting the oldest beyond `window_size`.
    pub fn push(&mut self, sample: PerformanceSample, window_size: usize) {
        self.window.push_back(sample);
        while self.window.len() > window_size {
            self.window.pop_front();
        }
    }

    /// Recompute plays, wins, win rate and ROI from the window.
    pub fn recompute(&mut self, stake: Decimal) {
        let plays = self.window.len();
        let wins = self.window.iter().filter(|s| s.won).count();
        let prize: Decimal = self.window.iter().map(|s| s.prize_value).sum();

        self.total_plays = plays as u64;
        self.total_wins = wins as u64;
        if plays == 0 {
            self.win_rate = 0.0;
            self.roi = 0.0;
        } else {
            self.win_rate = wins as f64 / plays as f64;
            let staked = stake * Decimal::from(plays);
            self.roi = if staked > Decimal::ZERO {
                (prize / staked).to_f64().unwrap_or(0.0)
            } else {
                0.0
            };
        }
    }

    /// Whether the window holds any evaluations.
    #[must_use]
    pub fn has_plays(&self) -> bool {
        self.total_plays > 0
    }
}
