//! End-to-end pipeline runs over the in-memory store.

mod support;

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

use drawbrain::adapter::outbound::history::JsonFileOutcomeSource;
use drawbrain::application::pipeline::{PipelineState, RunResult};
use drawbrain::application::strategy::{RandomConfig, StrategyRegistry, WeightBounds};
use drawbrain::domain::{DomainError, GenerationMode, OutcomeStatus, Ticket};
use drawbrain::error::Error;
use drawbrain::port::outbound::store::EngineStore;
use drawbrain::testkit::config::{registry, settings};
use drawbrain::testkit::domain::{october, outcome, outcome_series};
use drawbrain::testkit::strategy::FailingStrategy;

use support::fixtures::{completed, memory_pipeline};

const EPSILON: f64 = 1e-6;

#[tokio::test]
async fn first_outcome_has_nothing_to_score_but_seeds_a_batch() {
    let pipeline = memory_pipeline(registry(), settings());
    let first = &outcome_series(1)[0];

    let report = completed(pipeline.run(first).await.unwrap());

    assert_eq!(report.outcome_status, OutcomeStatus::NoPredictions);
    assert_eq!(report.evaluated, 0);
    assert_eq!(report.tickets, 20);
    assert!(report.target > first.draw_date());

    let tickets = pipeline.store().tickets_for(report.target).await.unwrap();
    assert_eq!(tickets.len(), 20);

    let keys: HashSet<_> = tickets.iter().map(|t| t.key()).collect();
    assert_eq!(keys.len(), tickets.len(), "batch must not repeat a ticket");

    let names: HashSet<String> = pipeline.registry().names().into_iter().collect();
    for ticket in &tickets {
        assert_eq!(ticket.target(), report.target);
        assert!(names.contains(ticket.origin_strategy()));
        assert!((0.0..=1.0).contains(&ticket.confidence()));
    }
    assert_eq!(pipeline.state(), PipelineState::Idle);
}

#[tokio::test]
async fn next_outcome_scores_the_batch_that_targeted_it() {
    let pipeline = memory_pipeline(registry(), settings());
    let series = outcome_series(2);

    let first = completed(pipeline.run(&series[0]).await.unwrap());
    assert_eq!(first.target, series[1].draw_date());

    let second = completed(pipeline.run(&series[1]).await.unwrap());
    assert_eq!(
        second.outcome_status,
        OutcomeStatus::Evaluated {
            tickets: first.tickets
        }
    );
    assert_eq!(second.evaluated, first.tickets);

    let evaluations = pipeline
        .store()
        .evaluations_for(series[1].draw_date())
        .await
        .unwrap();
    assert_eq!(evaluations.len(), first.tickets);
    assert!(pipeline
        .store()
        .unevaluated_tickets(series[1].draw_date())
        .await
        .unwrap()
        .is_empty());

    let performance = pipeline.store().load_performance().await.unwrap();
    let plays: u64 = performance.iter().map(|r| r.total_plays).sum();
    assert_eq!(plays, first.tickets as u64);
}

#[tokio::test]
async fn weights_stay_normalized_and_bounded_across_runs() {
    let pipeline = memory_pipeline(registry(), settings());
    let bounds = pipeline.registry().bounds();

    for item in outcome_series(12) {
        let report = completed(pipeline.run(&item).await.unwrap());

        let sum: f64 = report.weights.values().sum();
        assert!((sum - 1.0).abs() < EPSILON, "weights sum to {sum}");
        for (name, weight) in &report.weights {
            assert!(
                *weight >= bounds.min - EPSILON && *weight <= bounds.max + EPSILON,
                "{name} drifted out of bounds: {weight}"
            );
        }
        assert_eq!(report.weights, pipeline.registry().weights());
    }

    let persisted = pipeline.store().load_weights().await.unwrap();
    assert_eq!(persisted, pipeline.registry().weights());
}

#[tokio::test]
async fn losing_strategies_keep_their_floor_weight() {
    let pipeline = memory_pipeline(registry(), settings());
    for item in outcome_series(10) {
        pipeline.run(&item).await.unwrap();
    }

    let performance = pipeline.store().load_performance().await.unwrap();
    assert_eq!(performance.len(), 5);
    for record in &performance {
        assert!(record.current_weight >= 0.05 - EPSILON);
    }
}

#[tokio::test]
async fn failing_strategy_degrades_to_attributed_fallback() {
    let registry = StrategyRegistry::builder()
        .bounds(WeightBounds::new(0.2, 0.8))
        .strategy(Arc::new(FailingStrategy {
            name: "broken",
            base_confidence: 0.3,
        }))
        .random(RandomConfig::default())
        .build()
        .unwrap();
    let pipeline = memory_pipeline(registry, settings());

    let report = completed(pipeline.run(&outcome_series(1)[0]).await.unwrap());
    let tickets = pipeline.store().tickets_for(report.target).await.unwrap();

    let broken: Vec<_> = tickets
        .iter()
        .filter(|t| t.origin_strategy() == "broken")
        .collect();
    assert!(!broken.is_empty(), "seeded sampling should pick the failing strategy");
    for ticket in &broken {
        assert_eq!(ticket.generation_mode(), GenerationMode::Fallback);
        assert!((ticket.confidence() - 0.3).abs() < EPSILON);
    }
    assert_eq!(report.fallback_tickets, broken.len());
    assert_eq!(report.tickets, 20);
}

#[tokio::test]
async fn reprocessing_an_outcome_is_skipped() {
    let pipeline = memory_pipeline(registry(), settings());
    let first = &outcome_series(1)[0];

    let report = completed(pipeline.run(first).await.unwrap());
    let again = pipeline.run(first).await.unwrap();

    assert_eq!(
        again,
        RunResult::Skipped {
            draw_date: first.draw_date(),
            status: OutcomeStatus::NoPredictions,
        }
    );
    assert_eq!(
        pipeline.store().tickets_for(report.target).await.unwrap().len(),
        report.tickets
    );
}

#[tokio::test]
async fn same_seed_generates_the_same_batch() {
    let first = memory_pipeline(registry(), settings());
    let second = memory_pipeline(registry(), settings());
    let item = &outcome_series(1)[0];

    let a = completed(first.run(item).await.unwrap());
    let b = completed(second.run(item).await.unwrap());
    assert_eq!(a.seed, b.seed);

    let keys = |tickets: Vec<Ticket>| {
        tickets.iter().map(|t| t.key()).collect::<Vec<_>>()
    };
    assert_eq!(
        keys(first.store().tickets_for(a.target).await.unwrap()),
        keys(second.store().tickets_for(b.target).await.unwrap())
    );
}

#[tokio::test]
async fn run_pending_drains_a_json_source_once() {
    let series = outcome_series(3);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let entries: Vec<String> = series
        .iter()
        .map(|o| {
            format!(
                r#"{{"draw_date":"{}","primary_numbers":{:?},"secondary_number":{}}}"#,
                o.draw_date(),
                o.primary_numbers(),
                o.secondary_number()
            )
        })
        .collect();
    write!(file, "[{}]", entries.join(",")).unwrap();

    let pipeline = memory_pipeline(registry(), settings());
    let source = JsonFileOutcomeSource::new(file.path());

    let results = pipeline.run_pending(&source).await.unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| matches!(r, RunResult::Completed(_))));

    let again = pipeline.run_pending(&source).await.unwrap();
    assert!(again.is_empty());
}

#[tokio::test]
async fn outcome_between_batches_is_recorded_without_predictions() {
    let pipeline = memory_pipeline(registry(), settings());
    let series = outcome_series(1);
    let first = completed(pipeline.run(&series[0]).await.unwrap());

    // A draw nobody targeted: the earlier batch stays unevaluated.
    let off_target = outcome(october(20), &[2, 4, 6, 8, 10], 3);
    assert_ne!(off_target.draw_date(), first.target);
    let report = completed(pipeline.run(&off_target).await.unwrap());

    assert_eq!(report.outcome_status, OutcomeStatus::NoPredictions);
    assert_eq!(
        pipeline
            .store()
            .unevaluated_tickets(first.target)
            .await
            .unwrap()
            .len(),
        first.tickets
    );
}

#[tokio::test]
async fn outcomes_sharing_a_target_generate_one_batch() {
    let pipeline = memory_pipeline(registry(), settings());

    // Saturday and the off-schedule Sunday both precede Monday's draw.
    let saturday = completed(
        pipeline
            .run(&outcome(october(17), &[4, 8, 15, 16, 23], 7))
            .await
            .unwrap(),
    );
    let sunday = completed(
        pipeline
            .run(&outcome(october(18), &[2, 4, 6, 8, 10], 3))
            .await
            .unwrap(),
    );

    assert_eq!(saturday.target, october(19));
    assert_eq!(sunday.target, october(19));
    assert!(!saturday.batch_exists);
    assert!(sunday.batch_exists);
    assert_eq!(sunday.tickets, 0);
    assert_eq!(sunday.seed, None);

    let tickets = pipeline.store().tickets_for(october(19)).await.unwrap();
    assert_eq!(tickets.len(), saturday.tickets);
    let keys: HashSet<_> = tickets.iter().map(|t| t.key()).collect();
    assert_eq!(keys.len(), tickets.len());
}

#[tokio::test]
async fn recorded_outcome_cannot_be_replaced() {
    let pipeline = memory_pipeline(registry(), settings());
    let recorded = outcome(october(17), &[1, 2, 3, 4, 5], 1);
    pipeline.store().record_outcome(&recorded).await.unwrap();

    let rival = outcome(october(17), &[20, 21, 22, 23, 24], 9);
    let err = pipeline.run(&rival).await.unwrap_err();
    assert!(
        matches!(err, Error::Domain(DomainError::ConflictingOutcome { .. })),
        "got {err:?}"
    );
    assert_eq!(
        pipeline.store().outcome_status(october(17)).await.unwrap(),
        Some(OutcomeStatus::Pending)
    );
    assert_eq!(
        pipeline.store().get_outcome(october(17)).await.unwrap(),
        Some(recorded.clone())
    );
    assert_eq!(pipeline.state(), PipelineState::Idle);

    // The same numbers again are a plain retry.
    completed(pipeline.run(&recorded).await.unwrap());
}
