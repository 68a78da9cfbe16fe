//! Boundary validation errors.

use thiserror::Error;

/// Errors raised when scheduling inputs are rejected.
///
/// All of these are raised before any engine state is touched, so a failed
/// call never leaves a partially built or partially updated schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Invalid round count: {0}")]
    InvalidRoundCount(String),

    #[error("Invalid winner: {0}")]
    InvalidWinner(String),
}
