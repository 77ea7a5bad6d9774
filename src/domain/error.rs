//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated.
//! These errors are returned by constructors that validate inputs.
//!
//! # Examples
//!
//! ```
//! use drawbrain::domain::{DomainError, GameRules};
//!
//! let rules = GameRules::default();
//! let result = rules.canonical_primary(&[1, 2, 3]);
//!
//! assert!(matches!(result, Err(DomainError::WrongPrimaryCount { expected: 5, actual: 3 })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Game rules are internally inconsistent.
    #[error("invalid game rules: {reason}")]
    InvalidRules {
        /// Why the rules were rejected.
        reason: String,
    },

    /// A ticket or outcome has the wrong number of primary numbers.
    #[error("expected {expected} primary numbers, got {actual}")]
    WrongPrimaryCount {
        /// Numbers required by the game.
        expected: usize,
        /// Numbers provided.
        actual: usize,
    },

    /// A primary number falls outside `[1, max]`.
    #[error("primary number {number} outside 1..={max}")]
    PrimaryOutOfRange {
        /// The offending number.
        number: u8,
        /// Upper bound of the primary range.
        max: u8,
    },

    /// A primary number appears more than once.
    #[error("primary number {number} repeated")]
    DuplicatePrimary {
        /// The repeated number.
        number: u8,
    },

    /// The secondary number falls outside `[1, max]`.
    #[error("secondary number {number} outside 1..={max}")]
    SecondaryOutOfRange {
        /// The offending number.
        number: u8,
        /// Upper bound of the secondary range.
        max: u8,
    },

    /// Confidence must lie in `[0, 1]`.
    #[error("confidence {confidence} outside [0, 1]")]
    ConfidenceOutOfRange {
        /// The invalid confidence.
        confidence: f64,
    },

    /// A draw date was already recorded with different numbers.
    #[error("outcome {draw_date} already recorded with different numbers")]
    ConflictingOutcome {
        /// The draw date both outcomes claim.
        draw_date: String,
    },

    /// An unknown generation mode label was read back from storage.
    #[error("unknown generation mode '{0}'")]
    UnknownGenerationMode(String),

    /// An unknown prize tier label was read back from storage.
    #[error("unknown prize tier '{0}'")]
    UnknownPrizeTier(String),
}
