use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// The weight vector broke the sum or clamp invariant.
///
/// Fatal to a pipeline run: sampling correctness depends on it, so the run
/// aborts before any batch is generated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightInvariantViolation {
    #[error("weights sum to {sum}, expected 1 ± {epsilon}")]
    Sum { sum: f64, epsilon: f64 },

    #[error("weight {weight} of '{strategy}' outside [{min}, {max}]")]
    Clamp {
        strategy: String,
        weight: f64,
        min: f64,
        max: f64,
    },

    #[error("bounds [{min}, {max}] cannot hold {count} weights summing to 1")]
    Infeasible { min: f64, max: f64, count: usize },

    #[error("weight of '{strategy}' is not finite")]
    NotFinite { strategy: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    WeightInvariant(#[from] WeightInvariantViolation),

    #[error("pipeline run already in progress (state: {state})")]
    RunInProgress { state: String },

    #[error("outcome {draw_date} was processed by another run")]
    AlreadyProcessed { draw_date: String },

    #[error("pipeline run exceeded {seconds}s")]
    RunTimedOut { seconds: u64 },

    #[error("historical context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("no strategies registered")]
    NoStrategies,

    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("strategy '{0}' registered twice")]
    DuplicateStrategy(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
