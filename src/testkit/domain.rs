//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for [`DrawDate`], [`Outcome`] and
//! [`Ticket`] so tests focus on assertions rather than construction
//! boilerplate. All of them assume the default [`GameRules`] and panic on
//! invalid input.

use crate::domain::{CandidateTicket, DrawDate, GameRules, GenerationMode, Outcome, Ticket};

/// Default game rules: 5 of 1..=69 plus 1 of 1..=26.
pub fn rules() -> GameRules {
    GameRules::default()
}

/// A draw date in October 2026.
pub fn october(day: u32) -> DrawDate {
    DrawDate::from_ymd(2026, 10, day).expect("valid October date")
}

/// A validated outcome.
pub fn outcome(date: DrawDate, primary: &[u8], secondary: u8) -> Outcome {
    Outcome::try_new(&rules(), date, primary, secondary).expect("valid outcome")
}

/// Outcomes on consecutive scheduled draw days from Saturday 2026-10-03,
/// each shifting the numbers up by one.
pub fn outcome_series(count: usize) -> Vec<Outcome> {
    let schedule = crate::domain::DrawSchedule::default();
    let mut date = october(3);
    (0..count)
        .map(|i| {
            let shift = u8::try_from(i % 40).expect("small shift");
            let primary: Vec<u8> = [1, 7, 13, 19, 25].iter().map(|n| n + shift).collect();
            let result = outcome(date, &primary, 1 + shift % 26);
            date = schedule.next_after(date);
            result
        })
        .collect()
}

/// A canonical ticket credited to `strategy`.
pub fn ticket(primary: &[u8], secondary: u8, strategy: &str, target: DrawDate) -> Ticket {
    Ticket::from_candidate(
        &rules(),
        &CandidateTicket::new(primary.to_vec(), secondary, 0.5),
        strategy,
        GenerationMode::Normal,
        target,
    )
    .expect("valid ticket")
}
