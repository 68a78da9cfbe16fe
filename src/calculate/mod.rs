//! Statistics calculation.
//!
//! Computes derived metrics from a schedule:
//! - Per-player games, wins and win rate over decided rounds
//! - The ranked performance table
//! - Suggested round counts for even participation

use std::collections::HashMap;

use crate::engine::PLAYERS_PER_ROUND;
use crate::models::{PerformanceRecord, PerformanceTable, Player, Schedule};

/// Calculate win rate from wins and games played.
pub fn calculate_win_rate(wins: u32, games_played: u32) -> f64 {
    if games_played == 0 {
        0.0
    } else {
        wins as f64 / games_played as f64
    }
}

/// Build the ranked performance table for a schedule.
///
/// Only rounds with a recorded winner count. Sorted by win rate, then games
/// played (both descending), then roster order.
pub fn aggregate(schedule: &Schedule) -> PerformanceTable {
    let mut tallies: HashMap<&Player, (u32, u32)> = HashMap::new();

    for round in schedule.rounds() {
        let Some(winning_team) = round.winning_team() else {
            continue;
        };
        for player in round.participants() {
            let entry = tallies.entry(player).or_default();
            entry.0 += 1;
            if winning_team.contains(player) {
                entry.1 += 1;
            }
        }
    }

    let mut records: Vec<(usize, PerformanceRecord)> = schedule
        .roster()
        .iter()
        .enumerate()
        .map(|(position, player)| {
            let (games_played, wins) = tallies.get(player).copied().unwrap_or_default();
            let record = PerformanceRecord {
                player: player.clone(),
                games_played,
                wins,
                win_rate: calculate_win_rate(wins, games_played),
            };
            (position, record)
        })
        .collect();

    records.sort_by(|(pos_a, a), (pos_b, b)| {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then_with(|| b.games_played.cmp(&a.games_played))
            .then_with(|| pos_a.cmp(pos_b))
    });

    PerformanceTable {
        revision: schedule.revision(),
        records: records.into_iter().map(|(_, r)| r).collect(),
    }
}

/// Smallest round count in which every player can play equally often.
pub fn suggested_round_count(players: usize) -> u32 {
    if players == 0 {
        return 0;
    }
    let lcm = players / gcd(players, PLAYERS_PER_ROUND) * PLAYERS_PER_ROUND;
    (lcm / PLAYERS_PER_ROUND) as u32
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
