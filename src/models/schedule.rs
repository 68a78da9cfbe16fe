//! Schedule model: the ordered rounds generated for one roster.

use serde::Serialize;

use super::{Fingerprint, PerformanceTable, Player, Roster, Round, SchedulingError, Winner};

/// A complete rotation for one roster.
///
/// Round composition is fixed at generation time. The only mutation point is
/// [`Schedule::set_winner`], which bumps `revision` so previously computed
/// performance tables can be recognised as stale.
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    roster: Roster,
    rounds: Vec<Round>,
    seed: u64,
    revision: u64,
}

impl Schedule {
    pub(crate) fn new(roster: Roster, rounds: Vec<Round>, seed: u64) -> Self {
        Self {
            roster,
            rounds,
            seed,
            revision: 0,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Seed the sampling source was initialised with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Record (or overwrite) the winner of the round at `round_index`
    /// (0-based). `winner` must be 1 or 2.
    pub fn set_winner(&mut self, round_index: usize, winner: u8) -> Result<(), SchedulingError> {
        let winner = Winner::try_from(winner)?;
        let total = self.rounds.len();
        let round = self.rounds.get_mut(round_index).ok_or_else(|| {
            SchedulingError::InvalidWinner(format!(
                "round index {} out of range (schedule has {} rounds)",
                round_index, total
            ))
        })?;

        round.winner = Some(winner);
        self.revision += 1;
        Ok(())
    }

    /// Number of decided rounds.
    pub fn decided(&self) -> usize {
        self.rounds.iter().filter(|r| r.winner.is_some()).count()
    }

    /// Whether a performance table reflects the current set of winners.
    pub fn is_current(&self, table: &PerformanceTable) -> bool {
        table.revision == self.revision
    }

    /// Scheduled games per player, in roster order (winners not required).
    pub fn games_per_player(&self) -> Vec<(Player, u32)> {
        self.roster
            .iter()
            .map(|player| {
                let games = self.rounds.iter().filter(|r| r.plays(player)).count() as u32;
                (player.clone(), games)
            })
            .collect()
    }

    /// Digest of the round composition (teams, resting sets, penalties).
    /// Winners are not included.
    pub fn fingerprint(&self) -> Fingerprint {
        let lines: Vec<String> = self
            .rounds
            .iter()
            .map(|round| {
                let names = |players: &[Player]| {
                    players
                        .iter()
                        .map(Player::as_str)
                        .collect::<Vec<_>>()
                        .join(",")
                };
                format!(
                    "{}:{}:{}:{}:{}:{:?}",
                    round.index,
                    names(round.team1.as_slice()),
                    names(round.team2.as_slice()),
                    names(round.resting.as_slice()),
                    round.penalty,
                    round.fallback,
                )
            })
            .collect();
        let chunks: Vec<&[u8]> = lines.iter().map(|l| l.as_bytes()).collect();
        Fingerprint::of(&chunks)
    }
}
