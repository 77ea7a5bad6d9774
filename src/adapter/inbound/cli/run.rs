//! Handlers for the `run` and `sync` commands.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::{RunArgs, SyncArgs};
use crate::adapter::inbound::cli::{operator, output};
use crate::application::pipeline::{RunReport, RunResult};
use crate::domain::Outcome;
use crate::error::Result;

#[derive(Tabled)]
struct WeightRow {
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let service = operator::operator();
    let outcome = Outcome::try_new(
        &service.rules(),
        args.draw_date,
        &args.primary,
        args.secondary,
    )?;
    let result = service.run_outcome(&outcome).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "run",
            "run": serde_json::to_value(&result)?,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    print_result(&result);
    Ok(())
}

/// Execute the sync command.
pub async fn sync(args: &SyncArgs) -> Result<()> {
    let results = operator::operator()
        .sync(&args.source.to_string_lossy())
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "sync",
            "source": args.source.to_string_lossy(),
            "runs": serde_json::to_value(&results)?,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    if results.is_empty() {
        output::success("Already up to date");
        return Ok(());
    }
    for result in &results {
        print_result(result);
    }
    output::success(&format!("Processed {} outcome(s)", results.len()));
    Ok(())
}

fn print_result(result: &RunResult) {
    match result {
        RunResult::Completed(report) => print_report(report),
        RunResult::Skipped { draw_date, status } => {
            output::warning(&format!("{draw_date} already processed ({status}), skipped"));
        }
    }
}

fn print_report(report: &RunReport) {
    output::section(&format!("Outcome {}", report.outcome_date));
    output::field("Status", report.outcome_status);
    output::field("Evaluated", report.evaluated);
    let wins = if report.wins > 0 {
        output::positive(report.wins)
    } else {
        output::muted(report.wins)
    };
    output::field("Wins", wins);
    output::field("Target", output::highlight(report.target));
    output::field("Tickets", report.tickets);
    if let Some(seed) = report.seed {
        output::field("Seed", output::muted(seed));
    }
    if report.batch_exists {
        output::hint(&format!("{} already has a batch; none generated", report.target));
    }

    if report.fallback_tickets > 0 {
        output::warning(&format!(
            "{} ticket(s) came from the fallback generator",
            report.fallback_tickets
        ));
    }
    if report.exhausted {
        output::warning("Attempt cap reached; the batch is short");
    }

    let rows: Vec<WeightRow> = report
        .weights
        .iter()
        .map(|(strategy, weight)| WeightRow {
            strategy: strategy.clone(),
            weight: format!("{weight:.4}"),
        })
        .collect();
    output::lines(&Table::new(rows).to_string());
}
