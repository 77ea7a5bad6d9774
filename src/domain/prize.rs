//! Prize tiers and the fixed lookup table keyed by match shape.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Prize tier of a scored ticket. `Tier(1)` is the top prize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrizeTier {
    /// A winning tier, ranked from 1 (best).
    Tier(u8),
    /// No prize.
    None,
}

impl PrizeTier {
    /// Whether this tier pays out.
    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, Self::Tier(_))
    }
}

impl fmt::Display for PrizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tier(rank) => write!(f, "tier-{rank}"),
            Self::None => f.write_str("none"),
        }
    }
}

impl FromStr for PrizeTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "none" {
            return Ok(Self::None);
        }
        s.strip_prefix("tier-")
            .and_then(|rank| rank.parse::<u8>().ok())
            .filter(|rank| *rank > 0)
            .map(Self::Tier)
            .ok_or_else(|| DomainError::UnknownPrizeTier(s.to_string()))
    }
}

/// One row of the prize table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeRule {
    /// Primary numbers matched.
    pub primary_matches: usize,
    /// Whether the secondary number matched.
    pub secondary_match: bool,
    /// Prize paid per ticket.
    pub prize: Decimal,
}

impl PrizeRule {
    const fn new(primary_matches: usize, secondary_match: bool, prize: Decimal) -> Self {
        Self {
            primary_matches,
            secondary_match,
            prize,
        }
    }
}

/// Fixed lookup from `(primary_matches, secondary_match)` to tier and value.
///
/// Tiers are ranked in table order: the first rule is `Tier(1)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeTable {
    /// Assumed cost of one ticket, the ROI denominator.
    #[serde(default = "default_stake")]
    pub stake: Decimal,
    /// Winning rules, best first.
    #[serde(default = "default_rules")]
    pub tiers: Vec<PrizeRule>,
}

fn default_stake() -> Decimal {
    dec!(2)
}

fn default_rules() -> Vec<PrizeRule> {
    vec![
        PrizeRule::new(5, true, dec!(20000000)),
        PrizeRule::new(5, false, dec!(1000000)),
        PrizeRule::new(4, true, dec!(50000)),
        PrizeRule::new(4, false, dec!(100)),
        PrizeRule::new(3, true, dec!(100)),
        PrizeRule::new(3, false, dec!(7)),
        PrizeRule::new(2, true, dec!(7)),
        PrizeRule::new(1, true, dec!(4)),
        PrizeRule::new(0, true, dec!(4)),
    ]
}

impl Default for PrizeTable {
    fn default() -> Self {
        Self {
            stake: default_stake(),
            tiers: default_rules(),
        }
    }
}

impl PrizeTable {
    /// Check the table for duplicates, negative prizes and a non-positive stake.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidRules`] describing the problem.
    pub fn validate(&self, primary_count: usize) -> Result<(), DomainError> {
        if self.stake <= Decimal::ZERO {
            return Err(DomainError::InvalidRules {
                reason: format!("stake must be positive, got {}", self.stake),
            });
        }
        if self.tiers.len() > usize::from(u8::MAX) {
            return Err(DomainError::InvalidRules {
                reason: "too many prize tiers".into(),
            });
        }
        for (i, rule) in self.tiers.iter().enumerate() {
            if rule.primary_matches > primary_count {
                return Err(DomainError::InvalidRules {
                    reason: format!(
                        "prize tier {} needs {} matches but tickets hold {}",
                        i + 1,
                        rule.primary_matches,
                        primary_count
                    ),
                });
            }
            if rule.prize < Decimal::ZERO {
                return Err(DomainError::InvalidRules {
                    reason: format!("prize tier {} is negative", i + 1),
                });
            }
            let duplicate = self.tiers[..i].iter().any(|other| {
                other.primary_matches == rule.primary_matches
                    && other.secondary_match == rule.secondary_match
            });
            if duplicate {
                return Err(DomainError::InvalidRules {
                    reason: format!(
                        "duplicate prize rule for {} matches (secondary: {})",
                        rule.primary_matches, rule.secondary_match
                    ),
                });
            }
        }
        Ok(())
    }

    /// Look up tier and prize for a match shape.
    #[must_use]
    pub fn lookup(&self, primary_matches: usize, secondary_match: bool) -> (PrizeTier, Decimal) {
        self.tiers
            .iter()
            .position(|rule| {
                rule.primary_matches == primary_matches && rule.secondary_match == secondary_match
            })
            .and_then(|i| {
                let rank = u8::try_from(i + 1).ok()?;
                Some((PrizeTier::Tier(rank), self.tiers[i].prize))
            })
            .unwrap_or((PrizeTier::None, Decimal::ZERO))
    }
}
