//! Ticket batch generation.
//!
//! Samples strategies by weight, runs each sampled strategy on the blocking
//! pool under a timeout, and merges the candidates into a deduplicated batch.
//!
//! # Determinism
//!
//! Every random draw comes from a [`StrategyRng`] derived from the run
//! seed: stream 0 drives strategy sampling, and each `(round, strategy)`
//! pair gets its own stream. Candidates are merged in sampling order, not
//! completion order, so the same seed and snapshot give the same batch.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::strategy::random::UniformRandomStrategy;
use crate::application::strategy::registry::StrategyRegistry;
use crate::domain::{
    CandidateTicket, DomainError, DrawDate, GameRules, GenerationMode, HistoricalContext, Ticket,
    TicketKey,
};
use crate::error::Result;
use crate::port::inbound::strategy::{Strategy, StrategyError, StrategyOutput, StrategyRng};

/// Stream bit reserved for fallback generators.
const FALLBACK_STREAM: u64 = 1 << 63;

/// Per-strategy counters for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStrategyStats {
    /// Times the strategy was sampled.
    pub sampled: usize,
    /// Tickets accepted into the batch.
    pub accepted: usize,
    /// Accepted tickets that came from the fallback.
    pub fallback: usize,
    /// Invocations that degraded.
    pub degraded_calls: usize,
}

/// A generated batch for one target draw.
#[derive(Debug, Clone)]
pub struct TicketBatch {
    pub target: DrawDate,
    /// Unique tickets in acceptance order.
    pub tickets: Vec<Ticket>,
    /// Strategy identities sampled in total.
    pub attempts: usize,
    /// Whether the attempt cap ended generation early.
    pub exhausted: bool,
    /// Counters keyed by strategy name.
    pub strategies: BTreeMap<String, BatchStrategyStats>,
}

impl TicketBatch {
    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Tickets produced by the fallback.
    #[must_use]
    pub fn fallback_count(&self) -> usize {
        self.tickets
            .iter()
            .filter(|t| t.generation_mode() == GenerationMode::Fallback)
            .count()
    }
}

/// Raw result of one strategy call before failure handling.
enum Invocation {
    Finished(std::result::Result<Vec<CandidateTicket>, StrategyError>),
    Panicked,
    TimedOut,
}

/// Produces deduplicated ticket batches from a weighted strategy registry.
#[derive(Debug, Clone)]
pub struct TicketBatchGenerator {
    max_attempts_factor: usize,
    strategy_timeout: Duration,
}

impl TicketBatchGenerator {
    #[must_use]
    pub fn new(max_attempts_factor: usize, strategy_timeout: Duration) -> Self {
        Self {
            max_attempts_factor: max_attempts_factor.max(1),
            strategy_timeout,
        }
    }

    /// Generate up to `target_size` unique tickets for `target`.
    ///
    /// Strategy failures never surface here: they degrade to fallback
    /// candidates attributed to the failing strategy. A batch smaller than
    /// `target_size` is returned when the attempt cap runs out.
    ///
    /// # Errors
    /// Returns an error if the registry is empty or its weights cannot be
    /// sampled.
    pub async fn generate_batch(
        &self,
        registry: &StrategyRegistry,
        ctx: Arc<HistoricalContext>,
        target: DrawDate,
        target_size: usize,
        seed: u64,
    ) -> Result<TicketBatch> {
        let rules = *ctx.rules();
        let max_attempts = target_size.saturating_mul(self.max_attempts_factor);
        let mut sampler = StrategyRng::seed_from_u64(seed);

        let mut tickets: Vec<Ticket> = Vec::with_capacity(target_size);
        let mut seen: HashSet<TicketKey> = HashSet::with_capacity(target_size);
        let mut stats: BTreeMap<String, BatchStrategyStats> = registry
            .entries()
            .iter()
            .map(|e| (e.name().to_string(), BatchStrategyStats::default()))
            .collect();
        let mut attempts = 0;
        let mut round: u32 = 0;

        while tickets.len() < target_size && attempts < max_attempts {
            let wanted = (target_size - tickets.len()).min(max_attempts - attempts);
            let picks = registry.sample(wanted, &mut sampler)?;
            attempts += picks.len();

            let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
            for &index in &picks {
                *counts.entry(index).or_default() += 1;
            }

            // Launch every sampled strategy before awaiting any of them.
            let mut handles = Vec::with_capacity(counts.len());
            for (&index, &count) in &counts {
                let strategy = Arc::clone(registry.entries()[index].strategy());
                let rng = strategy_rng(seed, round, index, 0);
                handles.push((
                    index,
                    count,
                    self.spawn_invocation(strategy, Arc::clone(&ctx), count, rng),
                ));
            }

            let mut produced: BTreeMap<usize, std::vec::IntoIter<Ticket>> = BTreeMap::new();
            for (index, count, handle) in handles {
                let strategy = registry.entries()[index].strategy();
                let invocation = handle.await.unwrap_or(Invocation::Panicked);
                let mut fallback_rng = strategy_rng(seed, round, index, FALLBACK_STREAM);
                let output = settle(
                    strategy.as_ref(),
                    &ctx,
                    count,
                    invocation,
                    &mut fallback_rng,
                );

                let entry = stats.entry(strategy.name().to_string()).or_default();
                entry.sampled += count;
                if let StrategyOutput::Degraded { reason, .. } = &output {
                    entry.degraded_calls += 1;
                    warn!(
                        strategy = strategy.name(),
                        round,
                        count,
                        reason = %reason,
                        "Strategy degraded to fallback"
                    );
                }

                produced.insert(
                    index,
                    into_tickets(&rules, strategy.name(), &output, target).into_iter(),
                );
            }

            // Merge in sampling order so completion order cannot leak in.
            for &index in &picks {
                if tickets.len() >= target_size {
                    break;
                }
                let Some(ticket) = produced.get_mut(&index).and_then(Iterator::next) else {
                    continue;
                };
                if seen.insert(ticket.key()) {
                    let entry = stats.entry(ticket.origin_strategy().to_string()).or_default();
                    entry.accepted += 1;
                    if ticket.generation_mode() == GenerationMode::Fallback {
                        entry.fallback += 1;
                    }
                    tickets.push(ticket);
                }
            }

            debug!(round, sampled = picks.len(), unique = tickets.len(), "Generation round");
            round += 1;
        }

        let exhausted = tickets.len() < target_size;
        if exhausted {
            warn!(
                target = %target,
                requested = target_size,
                generated = tickets.len(),
                attempts,
                "Attempt cap reached before batch filled"
            );
        } else {
            info!(target = %target, tickets = tickets.len(), attempts, "Batch generated");
        }

        Ok(TicketBatch {
            target,
            tickets,
            attempts,
            exhausted,
            strategies: stats,
        })
    }

    fn spawn_invocation(
        &self,
        strategy: Arc<dyn Strategy>,
        ctx: Arc<HistoricalContext>,
        count: usize,
        mut rng: StrategyRng,
    ) -> tokio::task::JoinHandle<Invocation> {
        let limit = self.strategy_timeout;
        tokio::spawn(async move {
            let call =
                tokio::task::spawn_blocking(move || strategy.generate(&ctx, count, &mut rng));
            match tokio::time::timeout(limit, call).await {
                Ok(Ok(result)) => Invocation::Finished(result),
                Ok(Err(_)) => Invocation::Panicked,
                Err(_) => Invocation::TimedOut,
            }
        })
    }
}

/// Seeded generator for one strategy call in one round.
fn strategy_rng(seed: u64, round: u32, index: usize, flags: u64) -> StrategyRng {
    let mut rng = StrategyRng::seed_from_u64(seed);
    rng.set_stream(flags | (u64::from(round) + 1) << 32 | index as u64);
    rng
}

/// Turn a raw invocation into a [`StrategyOutput`], substituting fallback
/// candidates for anything short of `count` valid candidates.
fn settle(
    strategy: &dyn Strategy,
    ctx: &HistoricalContext,
    count: usize,
    invocation: Invocation,
    fallback_rng: &mut StrategyRng,
) -> StrategyOutput {
    let reason = match invocation {
        Invocation::Finished(Ok(candidates)) if candidates.len() != count => {
            format!("returned {} of {count} candidates", candidates.len())
        }
        Invocation::Finished(Ok(candidates)) => {
            match candidates.iter().try_for_each(|c| check_candidate(ctx.rules(), c)) {
                Ok(()) => return StrategyOutput::Ok(candidates),
                Err(e) => format!("invalid candidate: {e}"),
            }
        }
        Invocation::Finished(Err(e)) => e.to_string(),
        Invocation::Panicked => "strategy panicked".to_string(),
        Invocation::TimedOut => "strategy timed out".to_string(),
    };

    StrategyOutput::Degraded {
        reason,
        candidates: UniformRandomStrategy::fallback(
            ctx,
            count,
            strategy.base_confidence(),
            fallback_rng,
        ),
    }
}

fn check_candidate(
    rules: &GameRules,
    candidate: &CandidateTicket,
) -> std::result::Result<(), DomainError> {
    rules.canonical_primary(&candidate.primary_numbers)?;
    rules.check_secondary(candidate.secondary_number)?;
    if !(0.0..=1.0).contains(&candidate.confidence) {
        return Err(DomainError::ConfidenceOutOfRange {
            confidence: candidate.confidence,
        });
    }
    Ok(())
}

fn into_tickets(
    rules: &GameRules,
    origin: &str,
    output: &StrategyOutput,
    target: DrawDate,
) -> Vec<Ticket> {
    let mode = if output.is_degraded() {
        GenerationMode::Fallback
    } else {
        GenerationMode::Normal
    };
    output
        .candidates()
        .iter()
        .filter_map(|candidate| {
            Ticket::from_candidate(rules, candidate, origin, mode, target)
                .map_err(|e| warn!(strategy = origin, error = %e, "Dropped invalid candidate"))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::strategy::registry::WeightBounds;
    use crate::application::strategy::{FrequencyConfig, FrequencyStrategy, RandomConfig};
    use crate::testkit::strategy::SlowStrategy;

    struct Failing;

    impl Strategy for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn base_confidence(&self) -> f64 {
            0.42
        }

        fn generate(
            &self,
            _ctx: &HistoricalContext,
            _count: usize,
            _rng: &mut StrategyRng,
        ) -> std::result::Result<Vec<CandidateTicket>, StrategyError> {
            Err(StrategyError::Failed("always".into()))
        }
    }

    struct Sleepy;

    impl Strategy for Sleepy {
        fn name(&self) -> &str {
            "sleepy"
        }

        fn base_confidence(&self) -> f64 {
            0.2
        }

        fn generate(
            &self,
            _ctx: &HistoricalContext,
            _count: usize,
            _rng: &mut StrategyRng,
        ) -> std::result::Result<Vec<CandidateTicket>, StrategyError> {
            std::thread::sleep(Duration::from_millis(200));
            Ok(vec![])
        }
    }

    struct Panicky;

    impl Strategy for Panicky {
        fn name(&self) -> &str {
            "panicky"
        }

        fn base_confidence(&self) -> f64 {
            0.3
        }

        fn generate(
            &self,
            _ctx: &HistoricalContext,
            _count: usize,
            _rng: &mut StrategyRng,
        ) -> std::result::Result<Vec<CandidateTicket>, StrategyError> {
            panic!("boom")
        }
    }

    /// Always emits the same ticket, so only one can ever be unique.
    struct Stuck;

    impl Strategy for Stuck {
        fn name(&self) -> &str {
            "stuck"
        }

        fn base_confidence(&self) -> f64 {
            0.1
        }

        fn generate(
            &self,
            _ctx: &HistoricalContext,
            count: usize,
            _rng: &mut StrategyRng,
        ) -> std::result::Result<Vec<CandidateTicket>, StrategyError> {
            Ok(vec![CandidateTicket::new(vec![1, 2, 3, 4, 5], 1, 0.5); count])
        }
    }

    fn target() -> DrawDate {
        DrawDate::from_ymd(2026, 10, 19).unwrap()
    }

    fn ctx() -> Arc<HistoricalContext> {
        Arc::new(HistoricalContext::empty(GameRules::default()))
    }

    fn generator() -> TicketBatchGenerator {
        TicketBatchGenerator::new(10, Duration::from_millis(500))
    }

    fn single(strategy: Arc<dyn Strategy>) -> StrategyRegistry {
        let mut registry = StrategyRegistry::new(WeightBounds::new(0.01, 1.0));
        registry.register(strategy).unwrap();
        registry
    }

    fn assert_valid(batch: &TicketBatch) {
        let mut keys = HashSet::new();
        for ticket in &batch.tickets {
            let primary = ticket.primary_numbers();
            assert_eq!(primary.len(), 5);
            assert!(primary.windows(2).all(|w| w[0] < w[1]));
            assert!(primary.iter().all(|&n| (1..=69).contains(&n)));
            assert!((1..=26).contains(&ticket.secondary_number()));
            assert!((0.0..=1.0).contains(&ticket.confidence()));
            assert_eq!(ticket.target(), batch.target);
            assert!(keys.insert(ticket.key()), "duplicate {ticket}");
        }
    }

    #[tokio::test]
    async fn failing_strategy_is_attributed_as_fallback() {
        let registry = single(Arc::new(Failing));
        let batch = generator()
            .generate_batch(&registry, ctx(), target(), 20, 7)
            .await
            .unwrap();

        assert_eq!(batch.len(), 20);
        assert_valid(&batch);
        for ticket in &batch.tickets {
            assert_eq!(ticket.origin_strategy(), "failing");
            assert_eq!(ticket.generation_mode(), GenerationMode::Fallback);
            assert!((ticket.confidence() - 0.42).abs() < 1e-12);
        }
        let stats = &batch.strategies["failing"];
        assert_eq!(stats.accepted, 20);
        assert_eq!(stats.fallback, 20);
        assert!(stats.degraded_calls >= 1);
    }

    #[tokio::test]
    async fn timed_out_strategy_degrades() {
        let registry = single(Arc::new(Sleepy));
        let generator = TicketBatchGenerator::new(10, Duration::from_millis(20));
        let batch = generator
            .generate_batch(&registry, ctx(), target(), 5, 1)
            .await
            .unwrap();

        assert_eq!(batch.len(), 5);
        assert_eq!(batch.fallback_count(), 5);
        assert!(batch.tickets.iter().all(|t| t.origin_strategy() == "sleepy"));
    }

    #[test]
    fn overrun_strategy_does_not_block_runtime_shutdown() {
        let registry = single(Arc::new(SlowStrategy {
            name: "hung",
            delay: Duration::from_secs(5),
        }));
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let started = std::time::Instant::now();
        let batch = runtime
            .block_on(
                TicketBatchGenerator::new(1, Duration::from_millis(20))
                    .generate_batch(&registry, ctx(), target(), 3, 1),
            )
            .unwrap();
        assert_eq!(batch.fallback_count(), batch.len());

        runtime.shutdown_timeout(Duration::from_millis(100));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn panicking_strategy_degrades() {
        let registry = single(Arc::new(Panicky));
        let batch = generator()
            .generate_batch(&registry, ctx(), target(), 5, 1)
            .await
            .unwrap();

        assert_eq!(batch.len(), 5);
        assert_eq!(batch.fallback_count(), 5);
    }

    #[tokio::test]
    async fn attempt_cap_bounds_generation() {
        let registry = single(Arc::new(Stuck));
        let generator = TicketBatchGenerator::new(3, Duration::from_millis(500));
        let batch = generator
            .generate_batch(&registry, ctx(), target(), 10, 1)
            .await
            .unwrap();

        assert_eq!(batch.len(), 1);
        assert!(batch.exhausted);
        assert_eq!(batch.attempts, 30);
    }

    #[tokio::test]
    async fn mixed_registry_yields_unique_valid_tickets() {
        let registry = StrategyRegistry::builder()
            .frequency(FrequencyConfig::default())
            .random(RandomConfig::default())
            .strategy(Arc::new(Failing))
            .build()
            .unwrap();
        let batch = generator()
            .generate_batch(&registry, ctx(), target(), 200, 11)
            .await
            .unwrap();

        assert_eq!(batch.len(), 200);
        assert!(!batch.exhausted);
        assert_valid(&batch);
        let accepted: usize = batch.strategies.values().map(|s| s.accepted).sum();
        assert_eq!(accepted, 200);
    }

    #[tokio::test]
    async fn same_seed_same_batch() {
        let registry = StrategyRegistry::builder()
            .strategy(Arc::new(FrequencyStrategy::new(FrequencyConfig::default())))
            .random(RandomConfig::default())
            .build()
            .unwrap();

        let summary = |batch: &TicketBatch| -> Vec<(TicketKey, String)> {
            batch
                .tickets
                .iter()
                .map(|t| (t.key(), t.origin_strategy().to_string()))
                .collect()
        };

        let a = generator()
            .generate_batch(&registry, ctx(), target(), 50, 99)
            .await
            .unwrap();
        let b = generator()
            .generate_batch(&registry, ctx(), target(), 50, 99)
            .await
            .unwrap();
        let c = generator()
            .generate_batch(&registry, ctx(), target(), 50, 100)
            .await
            .unwrap();

        assert_eq!(summary(&a), summary(&b));
        assert_ne!(summary(&a), summary(&c));
    }
}
