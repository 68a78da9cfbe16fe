//! Team formation: pick four players and split them 2v2 with the fewest
//! pairing repeats.
//!
//! The search completes the locked seats with random draws from the
//! contenders, scores each of the three possible 2v2 splits against
//! [`PairHistory`], and keeps the cheapest. It stops early on a zero-penalty
//! split. When only one group is possible its three splits are enumerated
//! directly.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::PenaltyMode;
use crate::models::{Player, Roster, Team};

use super::history::PairHistory;
use super::selector::CandidatePool;
use super::PLAYERS_PER_ROUND;

/// Fixed enumeration order of the three ways to split four players into two
/// pairs. Ties keep the earliest split.
const SPLITS: [([usize; 2], [usize; 2]); 3] = [
    ([0, 1], [2, 3]),
    ([0, 2], [1, 3]),
    ([0, 3], [1, 2]),
];

/// Repeat penalty of a 2v2 split.
pub fn penalty(team1: &Team, team2: &Team, history: &PairHistory, mode: PenaltyMode) -> u32 {
    let teammates = history.teammate_count(&team1[0], &team1[1])
        + history.teammate_count(&team2[0], &team2[1]);

    match mode {
        PenaltyMode::TeammatesOnly => teammates,
        PenaltyMode::Full => {
            let opponents: u32 = team1
                .iter()
                .flat_map(|a| team2.iter().map(move |b| (a, b)))
                .map(|(a, b)| history.opponent_count(a, b))
                .sum();
            teammates + opponents
        }
    }
}

/// The chosen four and their split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formation {
    pub team1: Team,
    pub team2: Team,
    pub penalty: u32,

    /// Groups evaluated before settling
    pub trials: usize,

    /// More players were overdue than seats available
    pub overflow: bool,
}

impl Formation {
    /// The four players on court.
    pub fn players(&self) -> Vec<Player> {
        self.team1.iter().chain(self.team2.iter()).cloned().collect()
    }

    /// Roster members not on court, in roster order.
    pub fn resting(&self, roster: &Roster) -> Vec<Player> {
        roster
            .iter()
            .filter(|p| !self.team1.contains(p) && !self.team2.contains(p))
            .cloned()
            .collect()
    }
}

/// Bounded randomized search over candidate groups.
#[derive(Debug, Clone, Copy)]
pub struct TeamFormer {
    trial_budget: usize,
    mode: PenaltyMode,
}

impl TeamFormer {
    pub fn new(trial_budget: usize, mode: PenaltyMode) -> Self {
        Self {
            trial_budget: trial_budget.max(1),
            mode,
        }
    }

    /// Form a round from `pool`.
    ///
    /// Locked players seed every sampled group; the open seats are drawn at
    /// random from the contenders, so every candidate group is equally
    /// balanced and only the repeat penalty decides between them.
    ///
    /// Returns `None` if the pool cannot fill four seats.
    pub fn form<R: Rng + ?Sized>(
        &self,
        pool: &CandidatePool,
        history: &PairHistory,
        rng: &mut R,
    ) -> Option<Formation> {
        let overflow = pool.overflow();
        let seeded = &pool.locked;
        let drawable = &pool.contenders;

        let open = pool.open_seats();
        if drawable.len() < open {
            return None;
        }

        // Nothing to sample: only one possible group
        if open == 0 || drawable.len() == open {
            let group = to_group(seeded.iter().chain(drawable.iter().take(open)).cloned())?;
            let (team1, team2, penalty) = self.best_split(&group, history);
            return Some(Formation {
                team1,
                team2,
                penalty,
                trials: 1,
                overflow,
            });
        }

        let mut best: Option<Formation> = None;
        for trial in 1..=self.trial_budget {
            let drawn = drawable.choose_multiple(rng, open).cloned();
            let group = to_group(seeded.iter().cloned().chain(drawn))?;
            let (team1, team2, penalty) = self.best_split(&group, history);

            if best.as_ref().map_or(true, |b| penalty < b.penalty) {
                best = Some(Formation {
                    team1,
                    team2,
                    penalty,
                    trials: trial,
                    overflow,
                });
            }
            if penalty == 0 {
                break;
            }
        }

        if let Some(formation) = best.as_ref() {
            tracing::trace!(
                penalty = formation.penalty,
                found_at = formation.trials,
                budget = self.trial_budget,
                "Team search finished"
            );
        }
        best
    }

    /// Lowest-penalty split of four players, earliest split on ties.
    fn best_split(&self, group: &[Player; 4], history: &PairHistory) -> (Team, Team, u32) {
        let split = |(left, right): ([usize; 2], [usize; 2])| {
            let team1 = [group[left[0]].clone(), group[left[1]].clone()];
            let team2 = [group[right[0]].clone(), group[right[1]].clone()];
            let score = penalty(&team1, &team2, history, self.mode);
            (team1, team2, score)
        };

        let mut best = split(SPLITS[0]);
        for candidate in SPLITS.into_iter().skip(1) {
            if best.2 == 0 {
                break;
            }
            let candidate = split(candidate);
            if candidate.2 < best.2 {
                best = candidate;
            }
        }
        best
    }
}

fn to_group(players: impl Iterator<Item = Player>) -> Option<[Player; 4]> {
    let players: Vec<Player> = players.take(PLAYERS_PER_ROUND).collect();
    players.try_into().ok()
}
