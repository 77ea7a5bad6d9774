//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{evaluations, outcomes, strategy_performance, strategy_weights, tickets};

/// Database row for a recorded outcome.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = outcomes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OutcomeRow {
    pub draw_date: String,
    /// JSON array of sorted primary numbers.
    pub primary_numbers: String,
    pub secondary_number: i32,
    pub status: String,
    pub evaluated_tickets: i32,
    pub recorded_at: String,
}

/// Database row for a generated ticket.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TicketRow {
    pub id: String,
    pub target: String,
    pub primary_numbers: String,
    pub secondary_number: i32,
    pub origin_strategy: String,
    pub confidence: f64,
    pub generation_mode: String,
    pub created_at: String,
}

/// Database row for an evaluation result.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = evaluations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EvaluationRow {
    pub ticket_id: String,
    pub draw_date: String,
    pub origin_strategy: String,
    pub primary_matches: i32,
    pub secondary_match: bool,
    pub prize_tier: String,
    /// Decimal rendered as text to keep it exact.
    pub prize_value: String,
    pub evaluated_at: String,
}

/// Database row for one strategy weight.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = strategy_weights)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WeightRow {
    pub strategy: String,
    pub weight: f64,
    pub updated_at: String,
}

/// Database row for a strategy performance record.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = strategy_performance)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PerformanceRow {
    pub strategy: String,
    /// JSON array of the rolling window's samples.
    pub window_samples: String,
    pub total_plays: i64,
    pub total_wins: i64,
    pub roi: f64,
    pub win_rate: f64,
    pub current_weight: f64,
    pub last_updated: String,
}
