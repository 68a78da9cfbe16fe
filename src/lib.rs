//! # Court Rotation
//!
//! Rotation scheduling for 2v2 games played from a roster of six or more.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, rounds, schedules, results)
//! - **engine**: Streak tracking, pair history and the randomized team search
//! - **calculate**: Win-rate aggregation and round-count suggestions
//! - **session**: Terminal rendering and the interactive result entry loop
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod engine;
pub mod models;
pub mod session;

pub use engine::{compute_performance, generate_schedule, set_winner};
pub use models::*;
