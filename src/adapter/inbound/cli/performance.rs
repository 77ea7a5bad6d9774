//! Handler for the `performance` command.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::{operator, output};
use crate::application::query::StrategyPerformanceView;
use crate::error::Result;

#[derive(Tabled)]
struct PerformanceRow {
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Plays")]
    plays: u64,
    #[tabled(rename = "Wins")]
    wins: u64,
    #[tabled(rename = "Win Rate")]
    win_rate: String,
    #[tabled(rename = "ROI")]
    roi: String,
}

impl From<&StrategyPerformanceView> for PerformanceRow {
    fn from(view: &StrategyPerformanceView) -> Self {
        let roi = format!("{:+.3}", view.roi);
        Self {
            strategy: view.strategy.clone(),
            weight: format!("{:.4}", view.weight),
            plays: view.total_plays,
            wins: view.total_wins,
            win_rate: format!("{:.2}%", view.win_rate * 100.0),
            roi: if view.roi >= 0.0 {
                output::positive(roi)
            } else {
                output::negative(roi)
            },
        }
    }
}

/// Execute the performance command.
pub async fn execute() -> Result<()> {
    let views = operator::operator().performance().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "performance",
            "strategies": serde_json::to_value(&views)?,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    if views.is_empty() {
        output::warning("No runs recorded yet");
        return Ok(());
    }

    output::section("Strategy performance");
    let rows: Vec<PerformanceRow> = views.iter().map(PerformanceRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}
