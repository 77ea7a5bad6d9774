//! Scored tickets.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{DrawDate, TicketId};
use super::prize::PrizeTier;

/// Result of scoring one ticket against the outcome it targeted.
///
/// At most one exists per ticket; `ticket_id` is the idempotency key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub ticket_id: TicketId,
    pub draw_date: DrawDate,
    /// Strategy credited with the ticket, copied for aggregation.
    pub origin_strategy: String,
    pub primary_matches: usize,
    pub secondary_match: bool,
    pub prize_tier: PrizeTier,
    pub prize_value: Decimal,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationResult {
    /// Whether the ticket won anything.
    #[must_use]
    pub const fn is_win(&self) -> bool {
        self.prize_tier.is_win()
    }
}
