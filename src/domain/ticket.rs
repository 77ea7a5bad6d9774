//! Ticket types: raw strategy candidates and canonical, immutable tickets.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::game::GameRules;
use super::id::{DrawDate, TicketId};

/// How a ticket was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// The origin strategy produced the numbers itself.
    Normal,
    /// The origin strategy failed and the uniform fallback stood in for it.
    Fallback,
}

impl GenerationMode {
    /// Stable label used in storage and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "fallback" => Ok(Self::Fallback),
            other => Err(DomainError::UnknownGenerationMode(other.to_string())),
        }
    }
}

/// Raw output of a strategy before canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTicket {
    /// Primary numbers in any order.
    pub primary_numbers: Vec<u8>,
    /// Secondary number.
    pub secondary_number: u8,
    /// Self-reported confidence in `[0, 1]`.
    pub confidence: f64,
}

impl CandidateTicket {
    /// Create a candidate.
    #[must_use]
    pub fn new(primary_numbers: Vec<u8>, secondary_number: u8, confidence: f64) -> Self {
        Self {
            primary_numbers,
            secondary_number,
            confidence,
        }
    }
}

/// Deduplication key of a ticket within one batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketKey {
    primary: Vec<u8>,
    secondary: u8,
}

/// A canonical ticket: sorted, range-checked, and attributed.
///
/// Tickets are immutable after construction; all fields are exposed
/// through accessors only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    primary_numbers: Vec<u8>,
    secondary_number: u8,
    origin_strategy: String,
    confidence: f64,
    generation_mode: GenerationMode,
    target: DrawDate,
    created_at: DateTime<Utc>,
}

impl Ticket {
    /// Canonicalize a candidate into a ticket for `target`.
    ///
    /// # Errors
    /// Returns a [`DomainError`] if the numbers violate `rules` or the
    /// confidence lies outside `[0, 1]`.
    pub fn from_candidate(
        rules: &GameRules,
        candidate: &CandidateTicket,
        origin_strategy: impl Into<String>,
        generation_mode: GenerationMode,
        target: DrawDate,
    ) -> Result<Self, DomainError> {
        let primary_numbers = rules.canonical_primary(&candidate.primary_numbers)?;
        let secondary_number = rules.check_secondary(candidate.secondary_number)?;
        if !(0.0..=1.0).contains(&candidate.confidence) {
            return Err(DomainError::ConfidenceOutOfRange {
                confidence: candidate.confidence,
            });
        }

        Ok(Self {
            id: TicketId::new(),
            primary_numbers,
            secondary_number,
            origin_strategy: origin_strategy.into(),
            confidence: candidate.confidence,
            generation_mode,
            target,
            created_at: Utc::now(),
        })
    }

    /// Rebuild a ticket from stored fields without re-generating its ID.
    ///
    /// # Errors
    /// Returns a [`DomainError`] if the stored numbers are not canonical.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        rules: &GameRules,
        id: TicketId,
        primary_numbers: Vec<u8>,
        secondary_number: u8,
        origin_strategy: String,
        confidence: f64,
        generation_mode: GenerationMode,
        target: DrawDate,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let primary_numbers = rules.canonical_primary(&primary_numbers)?;
        let secondary_number = rules.check_secondary(secondary_number)?;
        Ok(Self {
            id,
            primary_numbers,
            secondary_number,
            origin_strategy,
            confidence,
            generation_mode,
            target,
            created_at,
        })
    }

    #[must_use]
    pub const fn id(&self) -> TicketId {
        self.id
    }

    /// Primary numbers, sorted ascending.
    #[must_use]
    pub fn primary_numbers(&self) -> &[u8] {
        &self.primary_numbers
    }

    #[must_use]
    pub const fn secondary_number(&self) -> u8 {
        self.secondary_number
    }

    /// Name of the strategy credited with this ticket.
    #[must_use]
    pub fn origin_strategy(&self) -> &str {
        &self.origin_strategy
    }

    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub const fn generation_mode(&self) -> GenerationMode {
        self.generation_mode
    }

    /// The draw this ticket is a bet against.
    #[must_use]
    pub const fn target(&self) -> DrawDate {
        self.target
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Deduplication key: `(primary_numbers, secondary_number)`.
    #[must_use]
    pub fn key(&self) -> TicketKey {
        TicketKey {
            primary: self.primary_numbers.clone(),
            secondary: self.secondary_number,
        }
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let primary: Vec<String> = self.primary_numbers.iter().map(u8::to_string).collect();
        write!(f, "{} + {}", primary.join(" "), self.secondary_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> DrawDate {
        DrawDate::from_ymd(2026, 10, 19).unwrap()
    }

    #[test]
    fn from_candidate_sorts_numbers() {
        let rules = GameRules::default();
        let candidate = CandidateTicket::new(vec![23, 16, 15, 8, 4], 7, 0.4);
        let ticket =
            Ticket::from_candidate(&rules, &candidate, "frequency", GenerationMode::Normal, target())
                .unwrap();

        assert_eq!(ticket.primary_numbers(), &[4, 8, 15, 16, 23]);
        assert_eq!(ticket.secondary_number(), 7);
        assert_eq!(ticket.origin_strategy(), "frequency");
        assert_eq!(ticket.generation_mode(), GenerationMode::Normal);
        assert_eq!(ticket.target(), target());
        assert_eq!(ticket.to_string(), "4 8 15 16 23 + 7");
    }

    #[test]
    fn from_candidate_rejects_bad_confidence() {
        let rules = GameRules::default();
        let candidate = CandidateTicket::new(vec![1, 2, 3, 4, 5], 1, 1.5);
        let result =
            Ticket::from_candidate(&rules, &candidate, "x", GenerationMode::Normal, target());
        assert!(matches!(
            result,
            Err(DomainError::ConfidenceOutOfRange { .. })
        ));
    }

    #[test]
    fn key_ignores_input_order() {
        let rules = GameRules::default();
        let a = Ticket::from_candidate(
            &rules,
            &CandidateTicket::new(vec![5, 4, 3, 2, 1], 9, 0.1),
            "a",
            GenerationMode::Normal,
            target(),
        )
        .unwrap();
        let b = Ticket::from_candidate(
            &rules,
            &CandidateTicket::new(vec![1, 2, 3, 4, 5], 9, 0.9),
            "b",
            GenerationMode::Fallback,
            target(),
        )
        .unwrap();

        assert_eq!(a.key(), b.key());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn generation_mode_labels() {
        assert_eq!(GenerationMode::Fallback.to_string(), "fallback");
        assert_eq!("normal".parse::<GenerationMode>(), Ok(GenerationMode::Normal));
        assert!("degraded".parse::<GenerationMode>().is_err());
    }
}
