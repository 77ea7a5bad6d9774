//! Number-space rules of the game being played.

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Shape of a ticket: `primary_count` unique numbers from `1..=primary_max`
/// plus one secondary number from `1..=secondary_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// Upper bound M of the primary range.
    #[serde(default = "default_primary_max")]
    pub primary_max: u8,
    /// Number k of primary numbers per ticket.
    #[serde(default = "default_primary_count")]
    pub primary_count: usize,
    /// Upper bound S of the secondary range.
    #[serde(default = "default_secondary_max")]
    pub secondary_max: u8,
}

const fn default_primary_max() -> u8 {
    69
}

const fn default_primary_count() -> usize {
    5
}

const fn default_secondary_max() -> u8 {
    26
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            primary_max: default_primary_max(),
            primary_count: default_primary_count(),
            secondary_max: default_secondary_max(),
        }
    }
}

impl GameRules {
    /// Create validated rules.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidRules`] if the number space is empty or
    /// cannot hold `primary_count` distinct numbers.
    pub fn try_new(
        primary_max: u8,
        primary_count: usize,
        secondary_max: u8,
    ) -> Result<Self, DomainError> {
        let rules = Self {
            primary_max,
            primary_count,
            secondary_max,
        };
        rules.validate()?;
        Ok(rules)
    }

    /// Check the rules are internally consistent.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidRules`] describing the first problem found.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.primary_count == 0 {
            return Err(DomainError::InvalidRules {
                reason: "primary_count must be at least 1".into(),
            });
        }
        if self.primary_count > usize::from(self.primary_max) {
            return Err(DomainError::InvalidRules {
                reason: format!(
                    "cannot draw {} distinct numbers from 1..={}",
                    self.primary_count, self.primary_max
                ),
            });
        }
        if self.secondary_max == 0 {
            return Err(DomainError::InvalidRules {
                reason: "secondary_max must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Iterate over every valid primary number.
    pub fn primary_range(&self) -> impl Iterator<Item = u8> {
        1..=self.primary_max
    }

    /// Iterate over every valid secondary number.
    pub fn secondary_range(&self) -> impl Iterator<Item = u8> {
        1..=self.secondary_max
    }

    /// Validate primary numbers and return them sorted ascending.
    ///
    /// # Errors
    /// Returns a [`DomainError`] if the count is wrong, a number is out of
    /// range, or a number repeats.
    pub fn canonical_primary(&self, numbers: &[u8]) -> Result<Vec<u8>, DomainError> {
        if numbers.len() != self.primary_count {
            return Err(DomainError::WrongPrimaryCount {
                expected: self.primary_count,
                actual: numbers.len(),
            });
        }

        let mut sorted = numbers.to_vec();
        sorted.sort_unstable();

        for window in sorted.windows(2) {
            if window[0] == window[1] {
                return Err(DomainError::DuplicatePrimary { number: window[0] });
            }
        }
        if let Some(&number) = sorted
            .iter()
            .find(|&&n| n == 0 || n > self.primary_max)
        {
            return Err(DomainError::PrimaryOutOfRange {
                number,
                max: self.primary_max,
            });
        }

        Ok(sorted)
    }

    /// Validate a secondary number.
    ///
    /// # Errors
    /// Returns [`DomainError::SecondaryOutOfRange`] if outside `1..=secondary_max`.
    pub fn check_secondary(&self, number: u8) -> Result<u8, DomainError> {
        if number == 0 || number > self.secondary_max {
            return Err(DomainError::SecondaryOutOfRange {
                number,
                max: self.secondary_max,
            });
        }
        Ok(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_are_valid() {
        let rules = GameRules::default();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.primary_max, 69);
        assert_eq!(rules.primary_count, 5);
        assert_eq!(rules.secondary_max, 26);
    }

    #[test]
    fn rejects_impossible_rules() {
        assert!(GameRules::try_new(4, 5, 10).is_err());
        assert!(GameRules::try_new(10, 0, 10).is_err());
        assert!(GameRules::try_new(10, 3, 0).is_err());
        assert!(GameRules::try_new(5, 5, 1).is_ok());
    }

    #[test]
    fn canonical_primary_sorts() {
        let rules = GameRules::default();
        let sorted = rules.canonical_primary(&[23, 4, 16, 8, 15]).unwrap();
        assert_eq!(sorted, vec![4, 8, 15, 16, 23]);
    }

    #[test]
    fn canonical_primary_rejects_duplicates_and_range() {
        let rules = GameRules::default();
        assert_eq!(
            rules.canonical_primary(&[1, 1, 2, 3, 4]),
            Err(DomainError::DuplicatePrimary { number: 1 })
        );
        assert_eq!(
            rules.canonical_primary(&[0, 1, 2, 3, 4]),
            Err(DomainError::PrimaryOutOfRange { number: 0, max: 69 })
        );
        assert_eq!(
            rules.canonical_primary(&[1, 2, 3, 4, 70]),
            Err(DomainError::PrimaryOutOfRange { number: 70, max: 69 })
        );
    }

    #[test]
    fn check_secondary_bounds() {
        let rules = GameRules::default();
        assert!(rules.check_secondary(1).is_ok());
        assert!(rules.check_secondary(26).is_ok());
        assert!(rules.check_secondary(0).is_err());
        assert!(rules.check_secondary(27).is_err());
    }
}
