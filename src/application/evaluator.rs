//! Scoring of stored tickets against a recorded outcome.

use chrono::Utc;
use tracing::info;

use crate::domain::{EvaluationResult, Outcome, PrizeTable, Ticket};
use crate::error::Result;
use crate::port::outbound::store::EngineStore;

/// What evaluating one outcome produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Results for every previously unevaluated ticket targeting the draw.
    Scored(Vec<EvaluationResult>),
    /// No unevaluated tickets targeted the draw.
    NoPredictions,
}

impl Evaluation {
    /// Results, empty when there were no predictions.
    #[must_use]
    pub fn results(&self) -> &[EvaluationResult] {
        match self {
            Self::Scored(results) => results,
            Self::NoPredictions => &[],
        }
    }
}

/// Scores tickets against outcomes using a fixed prize table.
#[derive(Debug, Clone)]
pub struct OutcomeEvaluator {
    prizes: PrizeTable,
}

impl OutcomeEvaluator {
    #[must_use]
    pub const fn new(prizes: PrizeTable) -> Self {
        Self { prizes }
    }

    #[must_use]
    pub const fn prizes(&self) -> &PrizeTable {
        &self.prizes
    }

    /// Score one ticket. Pure; does not touch storage.
    #[must_use]
    pub fn evaluate_ticket(&self, ticket: &Ticket, outcome: &Outcome) -> EvaluationResult {
        let primary_matches = outcome.primary_matches(ticket.primary_numbers());
        let secondary_match = ticket.secondary_number() == outcome.secondary_number();
        let (prize_tier, prize_value) = self.prizes.lookup(primary_matches, secondary_match);

        EvaluationResult {
            ticket_id: ticket.id(),
            draw_date: outcome.draw_date(),
            origin_strategy: ticket.origin_strategy().to_string(),
            primary_matches,
            secondary_match,
            prize_tier,
            prize_value,
            evaluated_at: Utc::now(),
        }
    }

    /// Score every ticket targeting `outcome` that has no result yet.
    ///
    /// Results are returned, not saved; the caller persists them.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub async fn evaluate<S: EngineStore>(&self, store: &S, outcome: &Outcome) -> Result<Evaluation> {
        let tickets = store.unevaluated_tickets(outcome.draw_date()).await?;
        if tickets.is_empty() {
            info!(draw_date = %outcome.draw_date(), "No predictions for outcome");
            return Ok(Evaluation::NoPredictions);
        }

        let results: Vec<EvaluationResult> = tickets
            .iter()
            .map(|ticket| self.evaluate_ticket(ticket, outcome))
            .collect();
        let wins = results.iter().filter(|r| r.is_win()).count();
        info!(
            draw_date = %outcome.draw_date(),
            tickets = results.len(),
            wins,
            "Outcome evaluated"
        );
        Ok(Evaluation::Scored(results))
    }
}
