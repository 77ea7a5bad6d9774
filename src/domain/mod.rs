//! Core domain types: game rules, tickets, outcomes, prizes, performance.
//!
//! Everything here is pure data plus validation. Services that move data
//! between these types live in the application layer.

pub mod context;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod id;
pub mod outcome;
pub mod performance;
pub mod prize;
pub mod schedule;
pub mod ticket;

pub use context::HistoricalContext;
pub use error::DomainError;
pub use evaluation::EvaluationResult;
pub use game::GameRules;
pub use id::{DrawDate, TicketId};
pub use outcome::{Outcome, OutcomeStatus};
pub use performance::{PerformanceSample, StrategyPerformanceRecord};
pub use prize::{PrizeRule, PrizeTable, PrizeTier};
pub use schedule::DrawSchedule;
pub use ticket::{CandidateTicket, GenerationMode, Ticket, TicketKey};
