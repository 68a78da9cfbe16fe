//! Round model: one scheduled 2v2 game and who sits it out.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Player, SchedulingError};

/// Two players sharing a side.
pub type Team = [Player; 2];

/// Which side won a round. Serialised as the integer `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Winner {
    Team1,
    Team2,
}

impl TryFrom<u8> for Winner {
    type Error = SchedulingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Winner::Team1),
            2 => Ok(Winner::Team2),
            other => Err(SchedulingError::InvalidWinner(format!(
                "winner must be 1 or 2, got {}",
                other
            ))),
        }
    }
}

impl From<Winner> for u8 {
    fn from(winner: Winner) -> Self {
        match winner {
            Winner::Team1 => 1,
            Winner::Team2 => 2,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team {}", u8::from(*self))
    }
}

/// Why a round could not honour every streak rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Fewer than four players were eligible, so the whole roster was used.
    WidenedPool,
    /// More than four players were owed a game; some had to rest again.
    OverdueOverflow,
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::WidenedPool => write!(f, "widened pool"),
            Fallback::OverdueOverflow => write!(f, "overdue overflow"),
        }
    }
}

/// A single scheduled game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Round number (1-based)
    pub index: u32,

    pub team1: Team,

    pub team2: Team,

    /// Everyone not on court, in roster order
    pub resting: Vec<Player>,

    /// Recorded result, if any
    pub winner: Option<Winner>,

    /// Pairing-repeat penalty of the chosen split when it was formed
    pub penalty: u32,

    /// Set when a streak rule had to be relaxed for this round
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Fallback>,
}

impl Round {
    /// The four players on court, team 1 first.
    pub fn participants(&self) -> impl Iterator<Item = &Player> {
        self.team1.iter().chain(self.team2.iter())
    }

    pub fn plays(&self, player: &Player) -> bool {
        self.participants().any(|p| p == player)
    }

    pub fn rests(&self, player: &Player) -> bool {
        self.resting.contains(player)
    }

    pub fn winning_team(&self) -> Option<&Team> {
        self.winner.map(|w| match w {
            Winner::Team1 => &self.team1,
            Winner::Team2 => &self.team2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_round() -> Round {
        Round {
            index: 1,
            team1: [Player::from("A"), Player::from("B")],
            team2: [Player::from("C"), Player::from("D")],
            resting: vec![Player::from("E"), Player::from("F")],
            winner: None,
            penalty: 0,
            fallback: None,
        }
    }

    #[test]
    fn test_winner_try_from() {
        assert_eq!(Winner::try_from(1).unwrap(), Winner::Team1);
        assert_eq!(Winner::try_from(2).unwrap(), Winner::Team2);
        assert!(matches!(
            Winner::try_from(3),
            Err(SchedulingError::InvalidWinner(_))
        ));
        assert!(Winner::try_from(0).is_err());
    }

    #[test]
    fn test_winner_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Winner::Team2).unwrap(), "2");
        let w: Winner = serde_json::from_str("1").unwrap();
        assert_eq!(w, Winner::Team1);
        assert!(serde_json::from_str::<Winner>("7").is_err());
    }

    #[test]
    fn test_round_membership() {
        let round = make_round();
        assert!(round.plays(&Player::from("A")));
        assert!(round.rests(&Player::from("F")));
        assert!(!round.plays(&Player::from("E")));
        assert_eq!(round.participants().count(), 4);
    }

    #[test]
    fn test_winning_team() {
        let mut round = make_round();
        assert!(round.winning_team().is_none());
        round.winner = Some(Winner::Team2);
        assert_eq!(round.winning_team().unwrap()[0], Player::from("C"));
    }

    #[test]
    fn test_round_serialization_omits_empty_fallback() {
        let round = make_round();
        let json = serde_json::to_value(&round).unwrap();
        assert!(json.get("fallback").is_none());
        assert!(json["winner"].is_null());

        let mut round = make_round();
        round.fallback = Some(Fallback::WidenedPool);
        let json = serde_json::to_value(&round).unwrap();
        assert_eq!(json["fallback"], "widened_pool");
    }
}
