//! Derived per-player performance models.

use serde::Serialize;

use super::Player;

/// One player's results across the decided rounds of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub player: Player,

    /// Decided rounds this player took part in
    pub games_played: u32,

    pub wins: u32,

    /// Win rate (0.0 to 1.0); 0.0 when no games were played
    pub win_rate: f64,
}

impl PerformanceRecord {
    pub fn losses(&self) -> u32 {
        self.games_played - self.wins
    }
}

/// A ranked performance table and the schedule revision it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceTable {
    pub revision: u64,
    pub records: Vec<PerformanceRecord>,
}

impl PerformanceTable {
    pub fn total_games(&self) -> u32 {
        self.records.iter().map(|r| r.games_played).sum()
    }

    pub fn total_wins(&self) -> u32 {
        self.records.iter().map(|r| r.wins).sum()
    }
}
