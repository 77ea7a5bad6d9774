//! Inbound operator accessor for CLI handlers.

use std::sync::OnceLock;

use crate::port::inbound::operator::EngineOperator;

static OPERATOR: OnceLock<Box<dyn EngineOperator>> = OnceLock::new();

/// Installs the operator implementation used by CLI handlers.
pub fn install(
    operator: Box<dyn EngineOperator>,
) -> std::result::Result<(), Box<dyn EngineOperator>> {
    OPERATOR.set(operator)
}

/// Returns the configured operator capability surface for CLI handlers.
#[must_use]
pub fn operator() -> &'static dyn EngineOperator {
    OPERATOR
        .get()
        .expect("CLI operator not installed; call cli::operator::install from main")
        .as_ref()
}
