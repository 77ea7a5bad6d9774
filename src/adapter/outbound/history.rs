//! History adapters: snapshots from the store and outcomes from JSON files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{DrawDate, GameRules, HistoricalContext, Outcome};
use crate::error::Result;
use crate::port::outbound::history::{HistoricalContextProvider, OutcomeSource};
use crate::port::outbound::store::EngineStore;

/// Builds snapshots from the outcomes recorded in an [`EngineStore`].
pub struct StoreContextProvider<S> {
    store: Arc<S>,
}

impl<S> StoreContextProvider<S> {
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: EngineStore> HistoricalContextProvider for StoreContextProvider<S> {
    async fn snapshot(&self, rules: GameRules, momentum_window: usize) -> Result<HistoricalContext> {
        let outcomes = self.store.list_outcomes().await?;
        let ctx = HistoricalContext::from_outcomes(rules, &outcomes, momentum_window);
        debug!(
            draws = ctx.draws(),
            latest = ?ctx.latest_draw().map(|d| d.to_string()),
            "Historical snapshot built"
        );
        Ok(ctx)
    }
}

/// Wire shape of one outcome in a JSON feed.
#[derive(Debug, Deserialize)]
struct OutcomeDto {
    draw_date: DrawDate,
    primary_numbers: Vec<u8>,
    secondary_number: u8,
}

/// Reads outcomes from a JSON array on disk.
///
/// ```json
/// [{ "draw_date": "2026-10-17", "primary_numbers": [4, 8, 15, 16, 23], "secondary_number": 7 }]
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileOutcomeSource {
    path: PathBuf,
}

impl JsonFileOutcomeSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OutcomeSource for JsonFileOutcomeSource {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn outcomes_after(
        &self,
        rules: &GameRules,
        after: Option<DrawDate>,
    ) -> Result<Vec<Outcome>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let dtos: Vec<OutcomeDto> = serde_json::from_str(&raw)?;

        let mut outcomes = Vec::with_capacity(dtos.len());
        for dto in dtos {
            if after.is_some_and(|after| dto.draw_date <= after) {
                continue;
            }
            match Outcome::try_new(rules, dto.draw_date, &dto.primary_numbers, dto.secondary_number)
            {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    warn!(draw_date = %dto.draw_date, error = %e, "Skipping invalid outcome");
                }
            }
        }
        outcomes.sort_by_key(Outcome::draw_date);
        outcomes.dedup_by_key(|o| o.draw_date());
        Ok(outcomes)
    }
}
