//! Tournament document and bracket errors.

use crate::models::activity::ActivityEntry;
use crate::models::game::{Bracket, Format, MatchId};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coarse error classes shared by the engine and the HTTP layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    InvalidConfiguration,
    StaleWrite,
    NotFound,
    Unavailable,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidConfiguration => "invalid-configuration",
            ErrorKind::StaleWrite => "stale-write",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Unavailable => "unavailable",
        }
    }
}

/// Errors that can occur during bracket and tournament operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BracketError {
    /// Malformed input to bracket generation (too few players, unknown format).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("match {0} not found")]
    MatchNotFound(MatchId),
    /// Both competitors are not known yet, or the match is a bye.
    #[error("match {0} is not ready for a score")]
    MatchNotReady(MatchId),
    /// Ties, double walkovers and other impossible results.
    #[error("invalid score: {0}")]
    InvalidScore(String),
    /// A different result was submitted for a match that is already final.
    #[error("match {match_id} is already final; result not changed")]
    StaleWrite { match_id: MatchId },
    #[error("player not found")]
    PlayerNotFound(PlayerId),
    /// Names are unique per tournament (case-insensitive).
    #[error("a player with this name already exists")]
    DuplicatePlayerName,
    #[error("the bracket has already been generated")]
    BracketLocked,
    #[error("no bracket has been generated")]
    NoBracket,
    #[error("{0}")]
    PlacementsUnavailable(String),
    #[error("circuit points have already been applied")]
    PointsAlreadyApplied,
}

impl BracketError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BracketError::StaleWrite { .. } | BracketError::PointsAlreadyApplied => {
                ErrorKind::StaleWrite
            }
            BracketError::MatchNotFound(_)
            | BracketError::PlayerNotFound(_)
            | BracketError::NoBracket => ErrorKind::NotFound,
            BracketError::PlacementsUnavailable(_) => ErrorKind::Unavailable,
            _ => ErrorKind::InvalidConfiguration,
        }
    }
}

/// One row of a circuit points scheme.
///
/// A `below` row awards `points` to every placement at or beyond `place`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsRule {
    pub place: u32,
    pub points: f64,
    #[serde(default)]
    pub below: bool,
}

/// Full tournament document as stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub bracket: Option<Bracket>,
    /// Owning circuit, if any.
    #[serde(default)]
    pub circuit_slug: Option<String>,
    #[serde(default)]
    pub is_circuit_final: bool,
    /// Leaderboard places that qualify for this final; <= 0 disables gating.
    #[serde(default)]
    pub circuit_qualify_count: Option<i64>,
    #[serde(default)]
    pub circuit_points: Vec<PointsRule>,
    /// Circuit points earned here, by leaderboard key.
    #[serde(default)]
    pub points_ledger: BTreeMap<String, f64>,
    #[serde(default)]
    pub circuit_points_applied: bool,
    /// Chosen maps; empty means the ladder defaults.
    #[serde(default)]
    pub map_pool: Vec<String>,
    /// Append-only match activity log.
    #[serde(default)]
    pub activity: Vec<ActivityEntry>,
    #[serde(default)]
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl Tournament {
    /// Create an unpublished tournament with no players.
    pub fn new(slug: impl Into<String>, format: Format) -> Self {
        let slug = slug.into();
        Self {
            name: slug.clone(),
            slug,
            format,
            players: Vec::new(),
            bracket: None,
            circuit_slug: None,
            is_circuit_final: false,
            circuit_qualify_count: None,
            circuit_points: Vec::new(),
            points_ledger: BTreeMap::new(),
            circuit_points_applied: false,
            map_pool: Vec::new(),
            activity: Vec::new(),
            is_published: false,
            created_at: Utc::now(),
            created_by: None,
        }
    }

    /// Create a tournament with initial players.
    pub fn with_players(slug: impl Into<String>, format: Format, players: Vec<Player>) -> Self {
        Self {
            players,
            ..Self::new(slug, format)
        }
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_name(&self, id: PlayerId) -> Option<&str> {
        self.get_player(id).map(|p| p.name.as_str())
    }

    /// Add a player before the bracket exists. Names must be unique (case-insensitive).
    pub fn add_player(&mut self, player: Player) -> Result<PlayerId, BracketError> {
        if self.bracket.is_some() {
            return Err(BracketError::BracketLocked);
        }
        let name = player.name.trim();
        if name.is_empty() {
            return Err(BracketError::InvalidConfiguration(
                "player name must not be empty".to_string(),
            ));
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name));
        if is_duplicate {
            return Err(BracketError::DuplicatePlayerName);
        }
        let player = Player {
            name: name.to_string(),
            ..player
        };
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player by id (only before the bracket exists).
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), BracketError> {
        if self.bracket.is_some() {
            return Err(BracketError::BracketLocked);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(BracketError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        Ok(())
    }

    /// Qualification threshold when this is a gated circuit final.
    pub fn qualify_threshold(&self) -> Option<usize> {
        if !self.is_circuit_final {
            return None;
        }
        match self.circuit_qualify_count {
            Some(n) if n > 0 => usize::try_from(n).ok(),
            _ => None,
        }
    }
}
