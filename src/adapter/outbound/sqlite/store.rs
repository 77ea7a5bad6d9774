//! SQLite engine store implementation.
//!
//! Provides persistent storage for outcomes, tickets, evaluations, weights
//! and performance records using SQLite and Diesel ORM.

use std::collections::{BTreeMap, VecDeque};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::adapter::outbound::sqlite::database::connection::{configure_sqlite_connection, DbPool};
use crate::adapter::outbound::sqlite::database::model::{
    EvaluationRow, OutcomeRow, PerformanceRow, TicketRow, WeightRow,
};
use crate::adapter::outbound::sqlite::database::schema::{
    evaluations, outcomes, strategy_performance, strategy_weights, tickets,
};
use crate::domain::{
    DrawDate, EvaluationResult, GameRules, GenerationMode, Outcome, OutcomeStatus,
    PerformanceSample, PrizeTier, StrategyPerformanceRecord, Ticket, TicketId,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{EngineStore, RunCommit};

type Conn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite-backed [`EngineStore`].
///
/// Rows are validated against the game rules when read back, so a store
/// opened with different rules than it was written with reports parse
/// errors instead of returning malformed tickets.
pub struct SqliteStore {
    /// Database connection pool.
    pool: DbPool,
    rules: GameRules,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool, rules: GameRules) -> Self {
        Self { pool, rules }
    }

    fn conn(&self) -> Result<Conn> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        configure_sqlite_connection(&mut conn)?;
        Ok(conn)
    }

    fn outcome_to_row(outcome: &Outcome) -> Result<OutcomeRow> {
        Ok(OutcomeRow {
            draw_date: outcome.draw_date().to_string(),
            primary_numbers: serde_json::to_string(outcome.primary_numbers())?,
            secondary_number: i32::from(outcome.secondary_number()),
            status: OutcomeStatus::Pending.as_str().to_string(),
            evaluated_tickets: 0,
            recorded_at: Utc::now().to_rfc3339(),
        })
    }

    fn outcome_from_row(&self, row: &OutcomeRow) -> Result<Outcome> {
        let primary: Vec<u8> = serde_json::from_str(&row.primary_numbers)?;
        let outcome = Outcome::try_new(
            &self.rules,
            parse_date(&row.draw_date)?,
            &primary,
            to_u8(row.secondary_number)?,
        )?;
        Ok(outcome)
    }

    fn ticket_to_row(ticket: &Ticket) -> Result<TicketRow> {
        Ok(TicketRow {
            id: ticket.id().to_string(),
            target: ticket.target().to_string(),
            primary_numbers: serde_json::to_string(ticket.primary_numbers())?,
            secondary_number: i32::from(ticket.secondary_number()),
            origin_strategy: ticket.origin_strategy().to_string(),
            confidence: ticket.confidence(),
            generation_mode: ticket.generation_mode().as_str().to_string(),
            created_at: ticket.created_at().to_rfc3339(),
        })
    }

    fn ticket_from_row(&self, row: TicketRow) -> Result<Ticket> {
        let ticket = Ticket::restore(
            &self.rules,
            TicketId::from_str(&row.id).map_err(|e| Error::Parse(e.to_string()))?,
            serde_json::from_str(&row.primary_numbers)?,
            to_u8(row.secondary_number)?,
            row.origin_strategy,
            row.confidence,
            GenerationMode::from_str(&row.generation_mode)?,
            parse_date(&row.target)?,
            parse_timestamp(&row.created_at)?,
        )?;
        Ok(ticket)
    }

    fn evaluation_to_row(result: &EvaluationResult) -> Result<EvaluationRow> {
        Ok(EvaluationRow {
            ticket_id: result.ticket_id.to_string(),
            draw_date: result.draw_date.to_string(),
            origin_strategy: result.origin_strategy.clone(),
            primary_matches: i32::try_from(result.primary_matches)
                .map_err(|e| Error::Parse(e.to_string()))?,
            secondary_match: result.secondary_match,
            prize_tier: result.prize_tier.to_string(),
            prize_value: result.prize_value.to_string(),
            evaluated_at: result.evaluated_at.to_rfc3339(),
        })
    }

    fn evaluation_from_row(row: EvaluationRow) -> Result<EvaluationResult> {
        Ok(EvaluationResult {
            ticket_id: TicketId::from_str(&row.ticket_id)
                .map_err(|e| Error::Parse(e.to_string()))?,
            draw_date: parse_date(&row.draw_date)?,
            origin_strategy: row.origin_strategy,
            primary_matches: usize::try_from(row.primary_matches)
                .map_err(|e| Error::Parse(e.to_string()))?,
            secondary_match: row.secondary_match,
            prize_tier: PrizeTier::from_str(&row.prize_tier)?,
            prize_value: Decimal::from_str(&row.prize_value)
                .map_err(|e| Error::Parse(e.to_string()))?,
            evaluated_at: parse_timestamp(&row.evaluated_at)?,
        })
    }

    fn performance_to_row(record: &StrategyPerformanceRecord) -> Result<PerformanceRow> {
        Ok(PerformanceRow {
            strategy: record.strategy.clone(),
            window_samples: serde_json::to_string(&record.window)?,
            total_plays: i64::try_from(record.total_plays)
                .map_err(|e| Error::Parse(e.to_string()))?,
            total_wins: i64::try_from(record.total_wins)
                .map_err(|e| Error::Parse(e.to_string()))?,
            roi: record.roi,
            win_rate: record.win_rate,
            current_weight: record.current_weight,
            last_updated: record.last_updated.to_rfc3339(),
        })
    }

    fn performance_from_row(row: PerformanceRow) -> Result<StrategyPerformanceRecord> {
        let window: VecDeque<PerformanceSample> = serde_json::from_str(&row.window_samples)?;
        Ok(StrategyPerformanceRecord {
            strategy: row.strategy,
            window,
            total_plays: u64::try_from(row.total_plays).map_err(|e| Error::Parse(e.to_string()))?,
            total_wins: u64::try_from(row.total_wins).map_err(|e| Error::Parse(e.to_string()))?,
            roi: row.roi,
            win_rate: row.win_rate,
            current_weight: row.current_weight,
            last_updated: parse_timestamp(&row.last_updated)?,
        })
    }
}

fn parse_date(raw: &str) -> Result<DrawDate> {
    DrawDate::from_str(raw).map_err(|e| Error::Parse(format!("draw date '{raw}': {e}")))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(format!("timestamp '{raw}': {e}")))
}

fn to_u8(value: i32) -> Result<u8> {
    u8::try_from(value).map_err(|_| Error::Parse(format!("number {value} out of range")))
}

fn db_err(e: diesel::result::Error) -> Error {
    Error::Database(e.to_string())
}

impl EngineStore for SqliteStore {
    async fn record_outcome(&self, outcome: &Outcome) -> Result<bool> {
        let row = Self::outcome_to_row(outcome)?;
        let mut conn = self.conn()?;
        let inserted = diesel::insert_or_ignore_into(outcomes::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(db_err)?;
        Ok(inserted > 0)
    }

    async fn get_outcome(&self, date: DrawDate) -> Result<Option<Outcome>> {
        let mut conn = self.conn()?;
        let row: Option<OutcomeRow> = outcomes::table
            .find(date.to_string())
            .select(OutcomeRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(db_err)?;
        row.map(|r| self.outcome_from_row(&r)).transpose()
    }

    async fn outcome_status(&self, date: DrawDate) -> Result<Option<OutcomeStatus>> {
        let mut conn = self.conn()?;
        let row: Option<(String, i32)> = outcomes::table
            .find(date.to_string())
            .select((outcomes::status, outcomes::evaluated_tickets))
            .first(&mut conn)
            .optional()
            .map_err(db_err)?;

        row.map(|(label, tickets)| {
            let tickets = usize::try_from(tickets).map_err(|e| Error::Parse(e.to_string()))?;
            OutcomeStatus::from_parts(&label, tickets)
                .ok_or_else(|| Error::Parse(format!("unknown outcome status '{label}'")))
        })
        .transpose()
    }

    async fn list_outcomes(&self) -> Result<Vec<Outcome>> {
        let mut conn = self.conn()?;
        let rows: Vec<OutcomeRow> = outcomes::table
            .order(outcomes::draw_date.asc())
            .select(OutcomeRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;
        rows.iter().map(|r| self.outcome_from_row(r)).collect()
    }

    async fn tickets_for(&self, target: DrawDate) -> Result<Vec<Ticket>> {
        let mut conn = self.conn()?;
        let rows: Vec<TicketRow> = tickets::table
            .filter(tickets::target.eq(target.to_string()))
            .order(tickets::created_at.asc())
            .select(TicketRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;
        rows.into_iter().map(|r| self.ticket_from_row(r)).collect()
    }

    async fn unevaluated_tickets(&self, target: DrawDate) -> Result<Vec<Ticket>> {
        let mut conn = self.conn()?;
        let rows: Vec<TicketRow> = tickets::table
            .left_join(evaluations::table)
            .filter(tickets::target.eq(target.to_string()))
            .filter(evaluations::ticket_id.nullable().is_null())
            .order(tickets::created_at.asc())
            .select(TicketRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;
        rows.into_iter().map(|r| self.ticket_from_row(r)).collect()
    }

    async fn latest_target(&self) -> Result<Option<DrawDate>> {
        let mut conn = self.conn()?;
        let latest: Option<String> = tickets::table
            .select(diesel::dsl::max(tickets::target))
            .first(&mut conn)
            .map_err(db_err)?;
        latest.as_deref().map(parse_date).transpose()
    }

    async fn evaluations_for(&self, date: DrawDate) -> Result<Vec<EvaluationResult>> {
        let mut conn = self.conn()?;
        let rows: Vec<EvaluationRow> = evaluations::table
            .filter(evaluations::draw_date.eq(date.to_string()))
            .order(evaluations::evaluated_at.asc())
            .select(EvaluationRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;
        rows.into_iter().map(Self::evaluation_from_row).collect()
    }

    async fn save_evaluations(&self, results: &[EvaluationResult]) -> Result<usize> {
        let rows = results
            .iter()
            .map(Self::evaluation_to_row)
            .collect::<Result<Vec<_>>>()?;
        let mut conn = self.conn()?;
        let inserted = conn
            .transaction(|conn| {
                let mut inserted = 0;
                for row in &rows {
                    inserted += diesel::insert_or_ignore_into(evaluations::table)
                        .values(row)
                        .execute(conn)?;
                }
                Ok::<usize, diesel::result::Error>(inserted)
            })
            .map_err(db_err)?;
        if inserted < rows.len() {
            debug!(
                skipped = rows.len() - inserted,
                "Ignored evaluations for already-evaluated tickets"
            );
        }
        Ok(inserted)
    }

    async fn load_weights(&self) -> Result<BTreeMap<String, f64>> {
        let mut conn = self.conn()?;
        let rows: Vec<WeightRow> = strategy_weights::table
            .select(WeightRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;
        Ok(rows.into_iter().map(|r| (r.strategy, r.weight)).collect())
    }

    async fn load_performance(&self) -> Result<Vec<StrategyPerformanceRecord>> {
        let mut conn = self.conn()?;
        let rows: Vec<PerformanceRow> = strategy_performance::table
            .order(strategy_performance::strategy.asc())
            .select(PerformanceRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;
        rows.into_iter().map(Self::performance_from_row).collect()
    }

    async fn commit_run(&self, commit: &RunCommit) -> Result<()> {
        let evaluation_rows = commit
            .evaluations
            .iter()
            .map(Self::evaluation_to_row)
            .collect::<Result<Vec<_>>>()?;
        let performance_rows = commit
            .performance
            .iter()
            .map(Self::performance_to_row)
            .collect::<Result<Vec<_>>>()?;
        let ticket_rows = commit
            .tickets
            .iter()
            .map(Self::ticket_to_row)
            .collect::<Result<Vec<_>>>()?;
        let now = Utc::now().to_rfc3339();
        let weight_rows: Vec<WeightRow> = commit
            .weights
            .iter()
            .map(|(strategy, &weight)| WeightRow {
                strategy: strategy.clone(),
                weight,
                updated_at: now.clone(),
            })
            .collect();
        let evaluated_tickets = match commit.outcome_status {
            OutcomeStatus::Evaluated { tickets } => {
                i32::try_from(tickets).map_err(|e| Error::Parse(e.to_string()))?
            }
            OutcomeStatus::Pending | OutcomeStatus::NoPredictions => 0,
        };

        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            // Claim the outcome: only a pending row may be moved on.
            let key = commit.outcome_date.to_string();
            let updated = diesel::update(
                outcomes::table
                    .find(key.as_str())
                    .filter(outcomes::status.eq(OutcomeStatus::Pending.as_str())),
            )
            .set((
                outcomes::status.eq(commit.outcome_status.as_str()),
                outcomes::evaluated_tickets.eq(evaluated_tickets),
            ))
            .execute(conn)?;
            if updated == 0 {
                let recorded: i64 = outcomes::table.find(key.as_str()).count().get_result(conn)?;
                return Err(if recorded > 0 {
                    diesel::result::Error::RollbackTransaction
                } else {
                    diesel::result::Error::NotFound
                });
            }

            for row in &evaluation_rows {
                diesel::insert_or_ignore_into(evaluations::table)
                    .values(row)
                    .execute(conn)?;
            }

            diesel::delete(strategy_performance::table).execute(conn)?;
            for row in &performance_rows {
                diesel::insert_into(strategy_performance::table)
                    .values(row)
                    .execute(conn)?;
            }

            diesel::delete(strategy_weights::table).execute(conn)?;
            for row in &weight_rows {
                diesel::insert_into(strategy_weights::table)
                    .values(row)
                    .execute(conn)?;
            }

            for row in &ticket_rows {
                diesel::insert_into(tickets::table).values(row).execute(conn)?;
            }
            Ok::<(), diesel::result::Error>(())
        })
        .map_err(|e| {
            warn!(error = %e, outcome = %commit.outcome_date, "Run commit rolled back");
            match e {
                diesel::result::Error::RollbackTransaction => Error::AlreadyProcessed {
                    draw_date: commit.outcome_date.to_string(),
                },
                diesel::result::Error::NotFound => Error::Database(format!(
                    "outcome {} not recorded",
                    commit.outcome_date
                )),
                other => db_err(other),
            }
        })?;

        debug!(
            outcome = %commit.outcome_date,
            evaluations = evaluation_rows.len(),
            tickets = ticket_rows.len(),
            "Run committed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
    use crate::domain::CandidateTicket;
    use rust_decimal_macros::dec;

    fn store() -> SqliteStore {
        let pool = create_pool(":memory:").unwrap();
        run_migrations(&pool).unwrap();
        SqliteStore::new(pool, GameRules::default())
    }

    fn date(day: u32) -> DrawDate {
        DrawDate::from_ymd(2026, 10, day).unwrap()
    }

    fn outcome(day: u32) -> Outcome {
        Outcome::try_new(&GameRules::default(), date(day), &[4, 8, 15, 16, 23], 7).unwrap()
    }

    fn ticket(primary: [u8; 5], target: DrawDate) -> Ticket {
        Ticket::from_candidate(
            &GameRules::default(),
            &CandidateTicket::new(primary.to_vec(), 7, 0.4),
            "gap",
            GenerationMode::Fallback,
            target,
        )
        .unwrap()
    }

    fn commit(tickets: Vec<Ticket>) -> RunCommit {
        RunCommit {
            outcome_date: date(17),
            outcome_status: OutcomeStatus::NoPredictions,
            evaluations: Vec::new(),
            performance: vec![StrategyPerformanceRecord::new("gap", 1.0)],
            weights: BTreeMap::from([("gap".to_string(), 1.0)]),
            tickets,
        }
    }

    #[tokio::test]
    async fn outcomes_round_trip() {
        let store = store();
        assert!(store.record_outcome(&outcome(17)).await.unwrap());
        assert!(!store.record_outcome(&outcome(17)).await.unwrap());

        assert_eq!(store.get_outcome(date(17)).await.unwrap(), Some(outcome(17)));
        assert_eq!(
            store.outcome_status(date(17)).await.unwrap(),
            Some(OutcomeStatus::Pending)
        );
        assert_eq!(store.get_outcome(date(19)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn commit_persists_everything() {
        let store = store();
        store.record_outcome(&outcome(17)).await.unwrap();
        let batch = vec![
            ticket([1, 2, 3, 4, 5], date(19)),
            ticket([4, 8, 15, 16, 23], date(19)),
        ];
        store.commit_run(&commit(batch.clone())).await.unwrap();

        let stored = store.tickets_for(date(19)).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.contains(&batch[1]));
        assert_eq!(store.latest_target().await.unwrap(), Some(date(19)));
        assert_eq!(store.load_weights().await.unwrap()["gap"], 1.0);
        assert_eq!(store.load_performance().await.unwrap().len(), 1);
        assert_eq!(
            store.outcome_status(date(17)).await.unwrap(),
            Some(OutcomeStatus::NoPredictions)
        );
    }

    #[tokio::test]
    async fn failed_commit_leaves_nothing_behind() {
        let store = store();
        // Outcome never recorded, so the status update finds no row.
        let result = store
            .commit_run(&commit(vec![ticket([1, 2, 3, 4, 5], date(19))]))
            .await;
        assert!(matches!(result, Err(Error::Database(_))));
        assert!(store.tickets_for(date(19)).await.unwrap().is_empty());
        assert!(store.load_weights().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn evaluations_insert_once() {
        let store = store();
        store.record_outcome(&outcome(17)).await.unwrap();
        let winner = ticket([4, 8, 15, 16, 23], date(17));
        store.commit_run(&commit(vec![winner.clone()])).await.unwrap();
        assert_eq!(store.unevaluated_tickets(date(17)).await.unwrap().len(), 1);

        let result = EvaluationResult {
            ticket_id: winner.id(),
            draw_date: date(17),
            origin_strategy: "gap".into(),
            primary_matches: 5,
            secondary_match: true,
            prize_tier: PrizeTier::Tier(1),
            prize_value: dec!(20000000),
            evaluated_at: Utc::now(),
        };
        assert_eq!(store.save_evaluations(&[result.clone()]).await.unwrap(), 1);
        assert_eq!(store.save_evaluations(&[result.clone()]).await.unwrap(), 0);

        assert!(store.unevaluated_tickets(date(17)).await.unwrap().is_empty());
        let stored = store.evaluations_for(date(17)).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].prize_value, dec!(20000000));
        assert_eq!(stored[0].prize_tier, PrizeTier::Tier(1));
    }
}
