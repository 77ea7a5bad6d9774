//! Strategy listing.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::StrategyInfo;

#[derive(Tabled)]
struct StrategyRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Base Confidence")]
    base_confidence: String,
    #[tabled(rename = "Signal")]
    signal: String,
}

impl From<StrategyInfo> for StrategyRow {
    fn from(info: StrategyInfo) -> Self {
        Self {
            enabled: if info.enabled {
                output::positive("yes")
            } else {
                output::muted("no")
            },
            base_confidence: format!("{:.2}", info.base_confidence),
            name: info.name,
            signal: info.signal,
        }
    }
}

/// List built-in strategies.
pub fn list() -> Result<()> {
    if output::is_quiet() && !output::is_json() {
        return Ok(());
    }

    let strategies = operator::operator().strategies();

    if output::is_json() {
        output::json_output(json!({
            "command": "strategies",
            "strategies": serde_json::to_value(&strategies)?,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Available strategies");

    let rows: Vec<StrategyRow> = strategies.into_iter().map(StrategyRow::from).collect();
    output::lines(&Table::new(rows).to_string());

    output::hint(&format!(
        "enable or disable them under {}",
        output::highlight("[strategies] enabled")
    ));
    Ok(())
}
