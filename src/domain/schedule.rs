//! Draw calendar used to find the next target draw.

use chrono::{Datelike, Days, Weekday};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::DrawDate;

/// Weekdays on which draws happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSchedule {
    #[serde(default = "default_weekdays")]
    pub weekdays: Vec<Weekday>,
}

fn default_weekdays() -> Vec<Weekday> {
    vec![Weekday::Mon, Weekday::Wed, Weekday::Sat]
}

impl Default for DrawSchedule {
    fn default() -> Self {
        Self {
            weekdays: default_weekdays(),
        }
    }
}

impl DrawSchedule {
    /// # Errors
    /// Returns [`DomainError::InvalidRules`] if no weekday is configured.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.weekdays.is_empty() {
            return Err(DomainError::InvalidRules {
                reason: "draw schedule has no weekdays".into(),
            });
        }
        Ok(())
    }

    /// First scheduled draw strictly after `date`.
    ///
    /// An empty schedule falls back to the following day.
    #[must_use]
    pub fn next_after(&self, date: DrawDate) -> DrawDate {
        let start = date.date();
        (1..=7)
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .find(|candidate| self.weekdays.contains(&candidate.weekday()))
            .or_else(|| start.checked_add_days(Days::new(1)))
            .map_or(date, DrawDate::new)
    }
}
