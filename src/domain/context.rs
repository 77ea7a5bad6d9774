//! Immutable historical snapshot shared by all strategies in a run.

use serde::Serialize;

use super::game::GameRules;
use super::id::DrawDate;
use super::outcome::Outcome;

/// Frequency, momentum and gap tables computed from past outcomes.
///
/// Built once per run and shared read-only (behind an `Arc`) across
/// concurrent strategy calls. Tables are indexed by number; index 0 is
/// unused so `table[n]` is the entry for number `n`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalContext {
    rules: GameRules,
    draws: usize,
    latest_draw: Option<DrawDate>,
    momentum_window: usize,
    primary_frequency: Vec<u32>,
    secondary_frequency: Vec<u32>,
    recent_primary_frequency: Vec<u32>,
    recent_secondary_frequency: Vec<u32>,
    primary_gap: Vec<u32>,
    secondary_gap: Vec<u32>,
}

impl HistoricalContext {
    /// Build a snapshot from outcomes in any order.
    ///
    /// The most recent `momentum_window` draws feed the recent tables.
    /// Outcomes whose numbers do not fit `rules` are skipped.
    #[must_use]
    pub fn from_outcomes(rules: GameRules, outcomes: &[Outcome], momentum_window: usize) -> Self {
        let primary_len = usize::from(rules.primary_max) + 1;
        let secondary_len = usize::from(rules.secondary_max) + 1;

        let mut ordered: Vec<&Outcome> = outcomes
            .iter()
            .filter(|o| {
                o.primary_numbers().len() == rules.primary_count
                    && o.primary_numbers().iter().all(|&n| n >= 1 && n <= rules.primary_max)
                    && (1..=rules.secondary_max).contains(&o.secondary_number())
            })
            .collect();
        ordered.sort_by_key(|o| o.draw_date());

        let draws = ordered.len();
        let never_seen = u32::try_from(draws).unwrap_or(u32::MAX);

        let mut ctx = Self {
            rules,
            draws,
            latest_draw: ordered.last().map(|o| o.draw_date()),
            momentum_window,
            primary_frequency: vec![0; primary_len],
            secondary_frequency: vec![0; secondary_len],
            recent_primary_frequency: vec![0; primary_len],
            recent_secondary_frequency: vec![0; secondary_len],
            primary_gap: vec![never_seen; primary_len],
            secondary_gap: vec![never_seen; secondary_len],
        };

        let recent_from = draws.saturating_sub(momentum_window);
        for (i, outcome) in ordered.iter().enumerate() {
            let since = u32::try_from(draws - 1 - i).unwrap_or(u32::MAX);
            let recent = i >= recent_from;

            for &n in outcome.primary_numbers() {
                let n = usize::from(n);
                ctx.primary_frequency[n] += 1;
                ctx.primary_gap[n] = since;
                if recent {
                    ctx.recent_primary_frequency[n] += 1;
                }
            }

            let s = usize::from(outcome.secondary_number());
            ctx.secondary_frequency[s] += 1;
            ctx.secondary_gap[s] = since;
            if recent {
                ctx.recent_secondary_frequency[s] += 1;
            }
        }

        ctx
    }

    /// A snapshot with no history; every table is flat.
    #[must_use]
    pub fn empty(rules: GameRules) -> Self {
        Self::from_outcomes(rules, &[], 0)
    }

    #[must_use]
    pub const fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Number of outcomes the snapshot was built from.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.draws
    }

    #[must_use]
    pub const fn latest_draw(&self) -> Option<DrawDate> {
        self.latest_draw
    }

    #[must_use]
    pub const fn momentum_window(&self) -> usize {
        self.momentum_window
    }

    /// All-time primary frequency, indexed by number.
    #[must_use]
    pub fn primary_frequency(&self) -> &[u32] {
        &self.primary_frequency
    }

    /// All-time secondary frequency, indexed by number.
    #[must_use]
    pub fn secondary_frequency(&self) -> &[u32] {
        &self.secondary_frequency
    }

    /// Primary frequency over the momentum window.
    #[must_use]
    pub fn recent_primary_frequency(&self) -> &[u32] {
        &self.recent_primary_frequency
    }

    /// Secondary frequency over the momentum window.
    #[must_use]
    pub fn recent_secondary_frequency(&self) -> &[u32] {
        &self.recent_secondary_frequency
    }

    /// Draws since each primary number last appeared (`draws()` if never).
    #[must_use]
    pub fn primary_gap(&self) -> &[u32] {
        &self.primary_gap
    }

    /// Draws since each secondary number last appeared (`draws()` if never).
    #[must_use]
    pub fn secondary_gap(&self) -> &[u32] {
        &self.secondary_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> GameRules {
        GameRules::try_new(10, 3, 4).unwrap()
    }

    fn outcome(day: u32, primary: &[u8], secondary: u8) -> Outcome {
        Outcome::try_new(
            &rules(),
            DrawDate::from_ymd(2026, 1, day).unwrap(),
            primary,
            secondary,
        )
        .unwrap()
    }

    #[test]
    fn empty_context_is_flat() {
        let ctx = HistoricalContext::empty(rules());
        assert_eq!(ctx.draws(), 0);
        assert!(ctx.latest_draw().is_none());
        assert_eq!(ctx.primary_frequency().len(), 11);
        assert!(ctx.primary_frequency().iter().all(|&f| f == 0));
        assert!(ctx.primary_gap().iter().all(|&g| g == 0));
    }

    #[test]
    fn tables_follow_history() {
        let outcomes = vec![
            outcome(5, &[1, 2, 3], 1),
            outcome(1, &[1, 4, 5], 2),
            outcome(3, &[1, 2, 6], 1),
        ];
        let ctx = HistoricalContext::from_outcomes(rules(), &outcomes, 2);

        assert_eq!(ctx.draws(), 3);
        assert_eq!(ctx.latest_draw(), DrawDate::from_ymd(2026, 1, 5));
        assert_eq!(ctx.primary_frequency()[1], 3);
        assert_eq!(ctx.primary_frequency()[2], 2);
        assert_eq!(ctx.primary_frequency()[4], 1);
        assert_eq!(ctx.secondary_frequency()[1], 2);

        // Only the draws of the 3rd and 5th feed the momentum window.
        assert_eq!(ctx.recent_primary_frequency()[1], 2);
        assert_eq!(ctx.recent_primary_frequency()[4], 0);
        assert_eq!(ctx.recent_secondary_frequency()[2], 0);

        assert_eq!(ctx.primary_gap()[3], 0);
        assert_eq!(ctx.primary_gap()[6], 1);
        assert_eq!(ctx.primary_gap()[4], 2);
        assert_eq!(ctx.primary_gap()[9], 3);
        assert_eq!(ctx.secondary_gap()[2], 2);
    }
}
