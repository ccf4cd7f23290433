//! Player data and the competitor keys used by circuit leaderboards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in match slots and lookups).
pub type PlayerId = Uuid;

/// A registered competitor in a tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Profile link; part of the legacy competitor key.
    #[serde(default)]
    pub link: Option<String>,
    /// Authenticated account id, when the player registered while signed in.
    #[serde(default)]
    pub uid: Option<String>,
    /// Circuit points carried into this tournament (used for seeding).
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub mmr: u32,
    #[serde(default)]
    pub seed: Option<u32>,
}

impl Player {
    /// Create a new player with the given name. Other fields start empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            link: None,
            uid: None,
            points: 0.0,
            mmr: 0,
            seed: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = points;
        self
    }

    pub fn with_mmr(mut self, mmr: u32) -> Self {
        self.mmr = mmr;
        self
    }

    pub fn leaderboard_key(&self) -> LeaderboardKey {
        LeaderboardKey::new(self.uid.as_deref(), &self.name, self.link.as_deref())
    }
}

/// Lowercase `name` (and `link`, if any) and collapse every run of characters
/// outside `[a-z0-9]` into a single `-`.
pub fn player_key(name: &str, link: Option<&str>) -> String {
    let base = slugify(name);
    match link.map(str::trim).filter(|l| !l.is_empty()) {
        Some(link) => format!("{}-{}", base, slugify(link)),
        None => base,
    }
}

fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_gap = false;
    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            in_gap = false;
        } else if !in_gap {
            out.push('-');
            in_gap = true;
        }
    }
    out
}

/// Competitor identity on a circuit leaderboard.
///
/// `key` prefers the authenticated `uid:<id>` form; `legacy_key` is always the
/// name+link composite so entries recorded before account linking still match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardKey {
    pub key: String,
    pub legacy_key: String,
}

impl LeaderboardKey {
    pub fn new(uid: Option<&str>, name: &str, link: Option<&str>) -> Self {
        let legacy_key = player_key(name, link);
        let key = match uid.map(str::trim).filter(|u| !u.is_empty()) {
            Some(uid) => format!("uid:{uid}"),
            None => legacy_key.clone(),
        };
        Self { key, legacy_key }
    }

    /// True when either form equals `candidate`.
    pub fn matches(&self, candidate: &str) -> bool {
        !candidate.is_empty() && (self.key == candidate || self.legacy_key == candidate)
    }
}
