//! Symmetric teammate/opponent pairing counters.

use serde::Serialize;
use std::collections::{HashMap, VecDeque};

use crate::config::HistoryScope;
use crate::models::{Player, Team};

/// How often two players have shared a side or faced each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PairCounts {
    pub teammate: u32,
    pub opponent: u32,
}

/// Unordered pair of distinct players.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PairKey(Player, Player);

impl PairKey {
    /// `None` for a self-pair.
    fn new(a: &Player, b: &Player) -> Option<Self> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Some(Self(a.clone(), b.clone())),
            std::cmp::Ordering::Greater => Some(Self(b.clone(), a.clone())),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Pairs touched by one round, kept so a trailing scope can expire them.
#[derive(Debug, Clone, Default)]
struct RoundPairs {
    teammates: Vec<PairKey>,
    opponents: Vec<PairKey>,
}

/// Pairing history across the rounds generated so far.
///
/// Only biases team formation; nothing here ever blocks a pairing.
#[derive(Debug, Clone, Default)]
pub struct PairHistory {
    scope: HistoryScope,
    counts: HashMap<PairKey, PairCounts>,
    rounds: VecDeque<RoundPairs>,
}

impl PairHistory {
    pub fn new(scope: HistoryScope) -> Self {
        Self {
            scope,
            counts: HashMap::new(),
            rounds: VecDeque::new(),
        }
    }

    pub fn counts(&self, a: &Player, b: &Player) -> PairCounts {
        PairKey::new(a, b)
            .and_then(|key| self.counts.get(&key).copied())
            .unwrap_or_default()
    }

    pub fn teammate_count(&self, a: &Player, b: &Player) -> u32 {
        self.counts(a, b).teammate
    }

    pub fn opponent_count(&self, a: &Player, b: &Player) -> u32 {
        self.counts(a, b).opponent
    }

    /// Rounds currently contributing to the counts.
    pub fn rounds_tracked(&self) -> usize {
        self.rounds.len()
    }

    /// Count one round: each team's internal pair as teammates and the four
    /// cross pairs as opponents.
    pub fn record_round(&mut self, team1: &Team, team2: &Team) {
        let mut pairs = RoundPairs::default();
        for team in [team1, team2] {
            pairs.teammates.extend(PairKey::new(&team[0], &team[1]));
        }
        for a in team1 {
            for b in team2 {
                pairs.opponents.extend(PairKey::new(a, b));
            }
        }

        for key in &pairs.teammates {
            self.counts.entry(key.clone()).or_default().teammate += 1;
        }
        for key in &pairs.opponents {
            self.counts.entry(key.clone()).or_default().opponent += 1;
        }
        self.rounds.push_back(pairs);

        match self.scope {
            HistoryScope::Full => {}
            HistoryScope::Trailing(window) => {
                while self.rounds.len() > window {
                    if let Some(expired) = self.rounds.pop_front() {
                        self.forget(&expired);
                    }
                }
            }
        }
    }

    fn forget(&mut self, pairs: &RoundPairs) {
        for key in &pairs.teammates {
            if let Some(c) = self.counts.get_mut(key) {
                c.teammate = c.teammate.saturating_sub(1);
            }
        }
        for key in &pairs.opponents {
            if let Some(c) = self.counts.get_mut(key) {
                c.opponent = c.opponent.saturating_sub(1);
            }
        }
        self.counts.retain(|_, c| *c != PairCounts::default());
    }
}
