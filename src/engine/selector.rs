//! Per-round eligibility filter and seat ranking.
//!
//! Eligible players are ranked for the four seats: overdue players first,
//! then fewest games played, then longest current rest. Everyone ranked
//! strictly ahead of the fourth seat is locked in; the players tied with the
//! fourth seat contend for what is left, and the team search only chooses
//! among them.

use std::cmp::Reverse;

use crate::models::{Player, Roster};

use super::streak::StreakTracker;
use super::PLAYERS_PER_ROUND;

/// Lower sorts first.
type SeatKey = (bool, u32, Reverse<u32>);

/// Players a round may be drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    /// Candidates in roster order
    pub players: Vec<Player>,

    /// Candidates who rested too often recently
    pub overdue: Vec<Player>,

    /// Candidates ranked ahead of the last seat; they always play
    pub locked: Vec<Player>,

    /// Candidates tied for the remaining seats
    pub contenders: Vec<Player>,

    /// True when the eligibility filter left fewer than four players and the
    /// whole roster was used instead
    pub widened: bool,
}

impl CandidatePool {
    /// Seats to fill from `contenders`.
    pub fn open_seats(&self) -> usize {
        PLAYERS_PER_ROUND.saturating_sub(self.locked.len())
    }

    /// More players are overdue than there are seats.
    pub fn overflow(&self) -> bool {
        self.overdue.len() > PLAYERS_PER_ROUND
    }
}

fn seat_key(tracker: &StreakTracker, player: &Player) -> SeatKey {
    let (games, rested) = tracker
        .state(player)
        .map_or((0, 0), |s| (s.games_played, s.consecutive_rested));
    (!tracker.overdue(player), games, Reverse(rested))
}

/// Filter the roster down to eligible players and rank them for the seats.
///
/// Falls back to the whole roster when fewer than four are eligible. Reads
/// tracker state only.
pub fn select(roster: &Roster, tracker: &StreakTracker) -> CandidatePool {
    let eligible: Vec<Player> = roster
        .iter()
        .filter(|p| tracker.eligible(p))
        .cloned()
        .collect();

    let (players, widened) = if eligible.len() < PLAYERS_PER_ROUND {
        (roster.players().to_vec(), true)
    } else {
        (eligible, false)
    };

    let keys: Vec<SeatKey> = players.iter().map(|p| seat_key(tracker, p)).collect();
    let mut ranked = keys.clone();
    ranked.sort();

    let (mut locked, mut contenders, mut overdue) = (Vec::new(), Vec::new(), Vec::new());
    let cutoff = ranked.get(PLAYERS_PER_ROUND - 1);
    for (player, key) in players.iter().zip(&keys) {
        if !key.0 {
            overdue.push(player.clone());
        }
        match cutoff {
            Some(cut) if key == cut => contenders.push(player.clone()),
            Some(cut) if key > cut => {}
            _ => locked.push(player.clone()),
        }
    }

    CandidatePool {
        players,
        overdue,
        locked,
        contenders,
        widened,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::streak::StreakRules;

    fn players(names: &[&str]) -> Vec<Player> {
        names.iter().map(|n| Player::from(*n)).collect()
    }

    #[test]
    fn test_fresh_roster_all_contend() {
        let roster = Roster::new(["A", "B", "C", "D", "E", "F"]).unwrap();
        let tracker = StreakTracker::new(&roster, StreakRules::default());

        let pool = select(&roster, &tracker);
        assert_eq!(pool.players, roster.players());
        assert!(pool.overdue.is_empty());
        assert!(pool.locked.is_empty());
        assert_eq!(pool.contenders, roster.players());
        assert_eq!(pool.open_seats(), 4);
        assert!(!pool.widened);
    }

    #[test]
    fn test_play_streak_filters() {
        let roster = Roster::new(["A", "B", "C", "D", "E", "F"]).unwrap();
        let mut tracker = StreakTracker::new(&roster, StreakRules::default());
        tracker.record(&players(&["A", "B", "C", "D"]));
        tracker.record(&players(&["A", "B", "E", "F"]));

        let pool = select(&roster, &tracker);
        assert_eq!(pool.players, players(&["C", "D", "E", "F"]));
        // C and D have rested longer than E and F
        assert_eq!(pool.locked, players(&["C", "D"]));
        assert_eq!(pool.contenders, players(&["E", "F"]));
        assert!(!pool.widened);
    }

    #[test]
    fn test_overdue_players_locked_in() {
        let roster = Roster::new(["A", "B", "C", "D", "E", "F", "G"]).unwrap();
        let mut tracker = StreakTracker::new(&roster, StreakRules::default());
        tracker.record(&players(&["A", "B", "C", "D"]));
        tracker.record(&players(&["A", "B", "E", "G"]));

        let pool = select(&roster, &tracker);
        assert_eq!(pool.players, players(&["C", "D", "E", "F", "G"]));
        assert_eq!(pool.overdue, players(&["F"]));
        assert_eq!(pool.locked, players(&["C", "D", "F"]));
        assert_eq!(pool.contenders, players(&["E", "G"]));
        assert!(!pool.overflow());
    }

    #[test]
    fn test_fewest_games_locked_in() {
        let roster = Roster::new(["A", "B", "C", "D", "E", "F", "G", "H", "I"]).unwrap();
        let rules = StreakRules {
            max_rests_in_window: 3,
            ..StreakRules::default()
        };
        let mut tracker = StreakTracker::new(&roster, rules);
        tracker.record(&players(&["A", "B", "C", "D"]));
        tracker.record(&players(&["E", "F", "G", "H"]));

        let pool = select(&roster, &tracker);
        assert!(pool.overdue.is_empty());
        assert_eq!(pool.locked, players(&["I"]));
        assert_eq!(pool.contenders, players(&["A", "B", "C", "D"]));
        assert_eq!(pool.open_seats(), 3);
    }

    #[test]
    fn test_overflow_when_more_overdue_than_seats() {
        let roster = Roster::new(["A", "B", "C", "D", "E", "F", "G", "H", "I"]).unwrap();
        let mut tracker = StreakTracker::new(&roster, StreakRules::default());
        tracker.record(&players(&["A", "B", "C", "D"]));
        tracker.record(&players(&["A", "B", "C", "D"]));

        // A-D are benched and E-I all rested twice
        let pool = select(&roster, &tracker);
        assert_eq!(pool.overdue, players(&["E", "F", "G", "H", "I"]));
        assert!(pool.overflow());
        assert!(pool.locked.is_empty());
        assert_eq!(pool.contenders.len(), 5);
    }

    #[test]
    fn test_widens_when_too_few_eligible() {
        let roster = Roster::new(["A", "B", "C", "D", "E", "F"]).unwrap();
        let rules = StreakRules {
            max_consecutive_played: 1,
            ..StreakRules::default()
        };
        let mut tracker = StreakTracker::new(&roster, rules);
        // Three players benched leaves only three eligible
        tracker.record(&players(&["A", "B", "C"]));

        let pool = select(&roster, &tracker);
        assert!(pool.widened);
        assert_eq!(pool.players, roster.players());
        // the three who sat out still come first
        assert_eq!(pool.locked, players(&["D", "E", "F"]));
        assert_eq!(pool.contenders, players(&["A", "B", "C"]));
    }

    #[test]
    fn test_select_does_not_mutate() {
        let roster = Roster::new(["A", "B", "C", "D", "E", "F"]).unwrap();
        let mut tracker = StreakTracker::new(&roster, StreakRules::default());
        tracker.record(&players(&["A", "B", "C", "D"]));

        let first = select(&roster, &tracker);
        let second = select(&roster, &tracker);
        assert_eq!(first, second);
    }
}
