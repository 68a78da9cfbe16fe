//! Players and the validated roster they are drawn from.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::SchedulingError;

/// An opaque player identifier (their display name).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Player(String);

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player({})", self.0)
    }
}

impl From<&str> for Player {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Player {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An ordered list of unique players.
///
/// Order carries no meaning beyond deterministic iteration; it is used as the
/// final tie-breaker when ranking and to order resting players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Smallest roster a schedule can be generated for: one 2v2 game plus at
    /// least two resting players.
    pub const MIN_PLAYERS: usize = 6;

    /// Build a roster with the default minimum size.
    pub fn new<I, S>(names: I) -> Result<Self, SchedulingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_minimum(names, Self::MIN_PLAYERS)
    }

    /// Build a roster, rejecting blank names, duplicates, and rosters smaller
    /// than `min_players`. Names are trimmed.
    pub fn with_minimum<I, S>(names: I, min_players: usize) -> Result<Self, SchedulingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut players = Vec::new();

        for name in names {
            let name: String = name.into();
            let name = name.trim();
            if name.is_empty() {
                return Err(SchedulingError::InvalidRoster(
                    "player name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(name.to_string()) {
                return Err(SchedulingError::InvalidRoster(format!(
                    "duplicate player: {}",
                    name
                )));
            }
            players.push(Player::new(name));
        }

        if players.len() < min_players {
            return Err(SchedulingError::InvalidRoster(format!(
                "need at least {} players, got {}",
                min_players,
                players.len()
            )));
        }

        Ok(Self { players })
    }

    /// Parse a comma-separated name list such as `"Ann, Bo, Cy"`.
    ///
    /// Blank entries (e.g. a trailing comma) are skipped; duplicates are
    /// rejected rather than silently merged.
    pub fn parse(text: &str) -> Result<Self, SchedulingError> {
        Self::parse_with_minimum(text, Self::MIN_PLAYERS)
    }

    pub fn parse_with_minimum(text: &str, min_players: usize) -> Result<Self, SchedulingError> {
        let names = text
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty());
        Self::with_minimum(names, min_players)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    /// Position of a player in roster order.
    pub fn position(&self, player: &Player) -> Option<usize> {
        self.players.iter().position(|p| p == player)
    }

    pub fn contains(&self, player: &Player) -> bool {
        self.position(player).is_some()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_creation() {
        let roster = Roster::new(["A", "B", "C", "D", "E", "F"]).unwrap();
        assert_eq!(roster.len(), 6);
        assert_eq!(roster.players()[0], Player::from("A"));
        assert_eq!(roster.position(&Player::from("F")), Some(5));
    }

    #[test]
    fn test_roster_too_small() {
        let err = Roster::new(["A", "B", "C", "D", "E"]).unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidRoster(_)));
    }

    #[test]
    fn test_roster_duplicate() {
        let err = Roster::new(["A", "B", "C", "D", "E", "A"]).unwrap_err();
        assert_eq!(
            err,
            SchedulingError::InvalidRoster("duplicate player: A".to_string())
        );
    }

    #[test]
    fn test_roster_duplicate_after_trim() {
        let err = Roster::new(["A", "B", "C", "D", "E", " A "]).unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidRoster(_)));
    }

    #[test]
    fn test_roster_blank_name() {
        let err = Roster::new(["A", "B", "C", "D", "E", "  "]).unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidRoster(_)));
    }

    #[test]
    fn test_roster_parse() {
        let roster = Roster::parse(" Ann, Bo ,Cy,Di, Ed,Flo, ").unwrap();
        let names: Vec<&str> = roster.iter().map(Player::as_str).collect();
        assert_eq!(names, vec!["Ann", "Bo", "Cy", "Di", "Ed", "Flo"]);
    }

    #[test]
    fn test_roster_parse_rejects_short_list() {
        assert!(Roster::parse("A,B,C,,D,E").is_err());
    }

    #[test]
    fn test_roster_custom_minimum() {
        assert!(Roster::with_minimum(["A", "B", "C", "D", "E"], 5).is_ok());
        assert!(Roster::with_minimum(["A", "B", "C", "D"], 5).is_err());
    }

    #[test]
    fn test_player_serialization() {
        let json = serde_json::to_string(&Player::from("Ann")).unwrap();
        assert_eq!(json, "\"Ann\"");
        let roster = Roster::new(["A", "B", "C", "D", "E", "F"]).unwrap();
        let json = serde_json::to_string(&roster).unwrap();
        assert_eq!(json, r#"["A","B","C","D","E","F"]"#);
    }
}
