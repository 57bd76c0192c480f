//! Riot identifiers and game modes.

use crate::error::LolError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Separator between game name and tag line in a Riot ID.
pub const RIOT_ID_SEPARATOR: char = '#';

/// Player-facing identity in the form `GameName#TagLine`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RiotId {
    pub game_name: String,
    pub tag_line: String,
}

impl RiotId {
    pub fn new(game_name: impl Into<String>, tag_line: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
            tag_line: tag_line.into(),
        }
    }
}

impl FromStr for RiotId {
    type Err = LolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            LolError::InvalidInput(format!(
                "Invalid Riot ID '{}': use format GameName#TagLine",
                s
            ))
        };

        let (game_name, tag_line) = s.split_once(RIOT_ID_SEPARATOR).ok_or_else(invalid)?;
        if game_name.is_empty() || tag_line.is_empty() || tag_line.contains(RIOT_ID_SEPARATOR) {
            return Err(invalid());
        }

        Ok(Self::new(game_name, tag_line))
    }
}

impl std::fmt::Display for RiotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.game_name, RIOT_ID_SEPARATOR, self.tag_line)
    }
}

/// Opaque, stable player identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Puuid(pub String);

impl Puuid {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Puuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of a completed match, e.g. `NA1_4923786457`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game whose ranked and match resources are addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// League of Legends
    Lol,
    /// Teamfight Tactics
    Tft,
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::Lol => write!(f, "lol"),
            GameMode::Tft => write!(f, "tft"),
        }
    }
}
