//! Strategies that misbehave in controlled ways.

use std::time::Duration;

use crate::domain::{CandidateTicket, HistoricalContext};
use crate::port::inbound::strategy::{Strategy, StrategyError, StrategyRng};

/// Always returns an error.
pub struct FailingStrategy {
    pub name: &'static str,
    pub base_confidence: f64,
}

impl Strategy for FailingStrategy {
    fn name(&self) -> &str {
        self.name
    }

    fn base_confidence(&self) -> f64 {
        self.base_confidence
    }

    fn generate(
        &self,
        _ctx: &HistoricalContext,
        _count: usize,
        _rng: &mut StrategyRng,
    ) -> Result<Vec<CandidateTicket>, StrategyError> {
        Err(StrategyError::Failed("scripted failure".into()))
    }
}

/// Sleeps past any reasonable timeout before answering.
pub struct SlowStrategy {
    pub name: &'static str,
    pub delay: Duration,
}

impl Strategy for SlowStrategy {
    fn name(&self) -> &str {
        self.name
    }

    fn base_confidence(&self) -> f64 {
        0.2
    }

    fn generate(
        &self,
        ctx: &HistoricalContext,
        count: usize,
        _rng: &mut StrategyRng,
    ) -> Result<Vec<CandidateTicket>, StrategyError> {
        std::thread::sleep(self.delay);
        let k = u8::try_from(ctx.rules().primary_count).unwrap_or(1);
        Ok((0..count)
            .map(|_| CandidateTicket::new((1..=k).collect(), 1, 0.2))
            .collect())
    }
}
