//! Per-player play/rest streak tracking.
//!
//! Two rules pull in opposite directions:
//! - a player who has played `max_consecutive_played` rounds in a row is
//!   benched (not [`eligible`](StreakTracker::eligible));
//! - a player who rested `max_rests_in_window` of the last `rest_window`
//!   rounds is owed a game ([`overdue`](StreakTracker::overdue)).
//!
//! Games played are counted alongside so seats can go to whoever has played
//! least.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::config::SchedulerConfig;
use crate::models::{Player, Roster};

/// What a player did in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Played,
    Rested,
}

/// Limits applied by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakRules {
    pub max_consecutive_played: u32,
    pub rest_window: usize,
    pub max_rests_in_window: usize,
}

impl Default for StreakRules {
    fn default() -> Self {
        Self::from(&SchedulerConfig::default())
    }
}

impl From<&SchedulerConfig> for StreakRules {
    fn from(config: &SchedulerConfig) -> Self {
        Self {
            max_consecutive_played: config.max_consecutive_played,
            rest_window: config.rest_window,
            max_rests_in_window: config.max_rests_in_window,
        }
    }
}

/// Streak state for one player.
///
/// After the first recorded round exactly one of the two streak counters is
/// non-zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreakState {
    pub consecutive_played: u32,
    pub consecutive_rested: u32,

    /// Rounds played since the start of the schedule
    pub games_played: u32,
    recent: VecDeque<Outcome>,
}

impl StreakState {
    fn record(&mut self, outcome: Outcome, window: usize) {
        match outcome {
            Outcome::Played => {
                self.consecutive_played += 1;
                self.consecutive_rested = 0;
                self.games_played += 1;
            }
            Outcome::Rested => {
                self.consecutive_rested += 1;
                self.consecutive_played = 0;
            }
        }

        self.recent.push_back(outcome);
        while self.recent.len() > window {
            self.recent.pop_front();
        }
    }

    /// Rests among the trailing window of recorded outcomes.
    pub fn rests_in_window(&self) -> usize {
        self.recent
            .iter()
            .filter(|o| **o == Outcome::Rested)
            .count()
    }

    /// Trailing outcomes, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = Outcome> + '_ {
        self.recent.iter().copied()
    }
}

/// Streak state for a whole roster.
#[derive(Debug, Clone)]
pub struct StreakTracker {
    rules: StreakRules,
    states: HashMap<Player, StreakState>,
}

impl StreakTracker {
    pub fn new(roster: &Roster, rules: StreakRules) -> Self {
        let states = roster
            .iter()
            .map(|p| (p.clone(), StreakState::default()))
            .collect();
        Self { rules, states }
    }

    pub fn state(&self, player: &Player) -> Option<&StreakState> {
        self.states.get(player)
    }

    /// Whether `player` may be put on court. Players outside the roster are
    /// never eligible.
    pub fn eligible(&self, player: &Player) -> bool {
        self.states
            .get(player)
            .is_some_and(|s| s.consecutive_played < self.rules.max_consecutive_played)
    }

    /// Whether `player` has rested too often recently and must not rest again.
    pub fn overdue(&self, player: &Player) -> bool {
        self.states
            .get(player)
            .is_some_and(|s| s.rests_in_window() >= self.rules.max_rests_in_window)
    }

    /// Advance every roster player by one round: those in `played` played,
    /// everyone else rested.
    pub fn record(&mut self, played: &[Player]) {
        let played: HashSet<&Player> = played.iter().collect();
        let window = self.rules.rest_window;

        for (player, state) in self.states.iter_mut() {
            let outcome = if played.contains(player) {
                Outcome::Played
            } else {
                Outcome::Rested
            };
            state.record(outcome, window);
        }
    }

    /// Forget all streaks, as if no round had been played yet. Games played
    /// are kept so seat balancing survives the reset.
    pub fn reset(&mut self) {
        for state in self.states.values_mut() {
            *state = StreakState {
                games_played: state.games_played,
                ..StreakState::default()
            };
        }
    }
}
