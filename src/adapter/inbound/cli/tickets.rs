//! Handler for the `tickets` command.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::TicketsArgs;
use crate::adapter::inbound::cli::{operator, output};
use crate::application::query::TicketQuery;
use crate::domain::{GenerationMode, Ticket};
use crate::error::Result;

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "Numbers")]
    numbers: String,
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Mode")]
    mode: String,
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        let primary: Vec<String> = ticket
            .primary_numbers()
            .iter()
            .map(|n| format!("{n:02}"))
            .collect();
        let mode = match ticket.generation_mode() {
            GenerationMode::Normal => ticket.generation_mode().to_string(),
            GenerationMode::Fallback => output::negative(ticket.generation_mode()),
        };
        Self {
            numbers: format!("{} | {:02}", primary.join(" "), ticket.secondary_number()),
            strategy: ticket.origin_strategy().to_string(),
            confidence: format!("{:.3}", ticket.confidence()),
            mode,
        }
    }
}

/// Execute the tickets command.
pub async fn execute(args: &TicketsArgs) -> Result<()> {
    let query = TicketQuery {
        target: args.target,
        strategy: args.strategy.clone(),
        min_confidence: args.min_confidence,
        limit: args.limit,
    };
    let tickets = operator::operator().tickets(&query).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "tickets",
            "target": tickets.first().map(|t| t.target().to_string()),
            "tickets": serde_json::to_value(&tickets)?,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    let Some(first) = tickets.first() else {
        output::warning("No tickets match");
        output::hint(&format!(
            "run {} to generate a batch",
            output::highlight("drawbrain run")
        ));
        return Ok(());
    };

    output::section(&format!("Tickets for {}", first.target()));
    let rows: Vec<TicketRow> = tickets.iter().map(TicketRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}
