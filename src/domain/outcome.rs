//! Real-world draw results.

use std::fmt;

use serde::Serialize;

use super::error::DomainError;
use super::game::GameRules;
use super::id::DrawDate;

/// The recorded result of one draw. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    draw_date: DrawDate,
    primary_numbers: Vec<u8>,
    secondary_number: u8,
}

impl Outcome {
    /// Create a validated outcome; primary numbers are stored sorted.
    ///
    /// # Errors
    /// Returns a [`DomainError`] if the numbers violate `rules`.
    pub fn try_new(
        rules: &GameRules,
        draw_date: DrawDate,
        primary_numbers: &[u8],
        secondary_number: u8,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            draw_date,
            primary_numbers: rules.canonical_primary(primary_numbers)?,
            secondary_number: rules.check_secondary(secondary_number)?,
        })
    }

    #[must_use]
    pub const fn draw_date(&self) -> DrawDate {
        self.draw_date
    }

    /// Winning primary numbers, sorted ascending.
    #[must_use]
    pub fn primary_numbers(&self) -> &[u8] {
        &self.primary_numbers
    }

    #[must_use]
    pub const fn secondary_number(&self) -> u8 {
        self.secondary_number
    }

    /// Count primary numbers shared with `numbers`.
    ///
    /// Both slices are sorted, so this is a linear merge.
    #[must_use]
    pub fn primary_matches(&self, numbers: &[u8]) -> usize {
        let (mut i, mut j, mut matches) = (0, 0, 0);
        while i < self.primary_numbers.len() && j < numbers.len() {
            match self.primary_numbers[i].cmp(&numbers[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    matches += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        matches
    }
}

/// Evaluation state of a recorded outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Recorded but no pipeline run has processed it yet.
    Pending,
    /// Tickets targeting this draw were scored.
    Evaluated {
        /// Number of tickets scored.
        tickets: usize,
    },
    /// No tickets targeted this draw. A normal state, e.g. on first deployment.
    NoPredictions,
}

impl OutcomeStatus {
    /// Stable label used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Evaluated { .. } => "evaluated",
            Self::NoPredictions => "no_predictions",
        }
    }

    /// Rebuild from a storage label and ticket count.
    #[must_use]
    pub fn from_parts(label: &str, tickets: usize) -> Option<Self> {
        match label {
            "pending" => Some(Self::Pending),
            "evaluated" => Some(Self::Evaluated { tickets }),
            "no_predictions" => Some(Self::NoPredictions),
            _ => None,
        }
    }

    /// Whether a pipeline run already consumed this outcome.
    #[must_use]
    pub const fn is_processed(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> DrawDate {
        DrawDate::from_ymd(2026, 10, 17).unwrap()
    }

    #[test]
    fn try_new_sorts_primary() {
        let outcome = Outcome::try_new(&GameRules::default(), date(), &[23, 4, 8, 16, 15], 7)
            .unwrap();
        assert_eq!(outcome.primary_numbers(), &[4, 8, 15, 16, 23]);
        assert_eq!(outcome.secondary_number(), 7);
    }

    #[test]
    fn try_new_rejects_invalid_numbers() {
        let rules = GameRules::default();
        assert!(Outcome::try_new(&rules, date(), &[1, 2, 3, 4], 7).is_err());
        assert!(Outcome::try_new(&rules, date(), &[1, 2, 3, 4, 5], 27).is_err());
    }

    #[test]
    fn primary_matches_counts_intersection() {
        let outcome =
            Outcome::try_new(&GameRules::default(), date(), &[4, 8, 15, 16, 23], 7).unwrap();
        assert_eq!(outcome.primary_matches(&[4, 8, 15, 16, 23]), 5);
        assert_eq!(outcome.primary_matches(&[1, 4, 9, 16, 42]), 2);
        assert_eq!(outcome.primary_matches(&[1, 2, 3, 5, 6]), 0);
    }

    #[test]
    fn status_labels_round_trip() {
        for status in [
            OutcomeStatus::Pending,
            OutcomeStatus::Evaluated { tickets: 3 },
            OutcomeStatus::NoPredictions,
        ] {
            let tickets = match status {
                OutcomeStatus::Evaluated { tickets } => tickets,
                _ => 0,
            };
            assert_eq!(OutcomeStatus::from_parts(status.as_str(), tickets), Some(status));
        }
        assert!(!OutcomeStatus::Pending.is_processed());
        assert!(OutcomeStatus::NoPredictions.is_processed());
    }
}
