//! Rotation scheduling engine.
//!
//! - **streak**: per-player play/rest streaks and eligibility
//! - **history**: teammate/opponent pairing counters
//! - **selector**: per-round candidate filter with the widening fallback
//! - **former**: randomized 2v2 team search scored by pairing repeats
//! - **builder**: the round loop tying the above together
//!
//! The free functions below are the boundary the hosts (CLI, HTTP) call.

pub mod builder;
pub mod former;
pub mod history;
pub mod selector;
pub mod streak;

pub use builder::ScheduleBuilder;
pub use former::{Formation, TeamFormer};
pub use history::{PairCounts, PairHistory};
pub use selector::CandidatePool;
pub use streak::{Outcome, StreakRules, StreakState, StreakTracker};

use crate::calculate;
use crate::config::SchedulerConfig;
use crate::models::{PerformanceTable, Roster, Schedule, SchedulingError};

/// Players on court each round (two teams of two).
pub const PLAYERS_PER_ROUND: usize = 4;

/// Generate a schedule with the default policy.
pub fn generate_schedule<S: AsRef<str>>(
    players: &[S],
    num_rounds: u32,
    seed: u64,
) -> Result<Schedule, SchedulingError> {
    generate_schedule_with(&SchedulerConfig::default(), players, num_rounds, seed)
}

/// Generate a schedule under `config`.
///
/// Rejects rosters that are too small or contain duplicates, and round counts
/// below one. Nothing is built unless every input is valid.
pub fn generate_schedule_with<S: AsRef<str>>(
    config: &SchedulerConfig,
    players: &[S],
    num_rounds: u32,
    seed: u64,
) -> Result<Schedule, SchedulingError> {
    round_count(i64::from(num_rounds))?;
    let roster = Roster::with_minimum(
        players.iter().map(|p| p.as_ref().to_string()),
        config.min_roster_size,
    )?;
    ScheduleBuilder::new(config.clone()).build_seeded(roster, num_rounds, seed)
}

/// Record the winner (1 or 2) of the round at `round_index` (0-based).
pub fn set_winner(
    schedule: &mut Schedule,
    round_index: usize,
    winner: u8,
) -> Result<(), SchedulingError> {
    schedule.set_winner(round_index, winner)
}

/// Rank players over the decided rounds. Always recomputed from scratch.
pub fn compute_performance(schedule: &Schedule) -> PerformanceTable {
    calculate::aggregate(schedule)
}

/// Parse a user-supplied round count.
pub fn parse_round_count(text: &str) -> Result<u32, SchedulingError> {
    let value: i64 = text.trim().parse().map_err(|_| {
        SchedulingError::InvalidRoundCount(format!("not a number: {:?}", text.trim()))
    })?;
    round_count(value)
}

/// Narrow a signed round count, rejecting anything below one.
pub fn round_count(value: i64) -> Result<u32, SchedulingError> {
    if value < 1 {
        return Err(SchedulingError::InvalidRoundCount(format!(
            "must be a positive number, got {}",
            value
        )));
    }
    u32::try_from(value)
        .map_err(|_| SchedulingError::InvalidRoundCount(format!("too many rounds: {}", value)))
}
