//! Core data models for the rotation scheduler.

mod error;
mod ids;
mod performance;
mod player;
mod round;
mod schedule;

pub use error::*;
pub use ids::*;
pub use performance::*;
pub use player::*;
pub use round::*;
pub use schedule::*;
