//! Match (game), slots, score values and the bracket container.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Match identifier, e.g. `W1-M1`, `L2-M1`, `GF1-M1`.
pub type MatchId = String;

/// One of the two sides of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    #[default]
    A,
    B,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub fn from_index(idx: usize) -> Self {
        if idx == 0 {
            Side::A
        } else {
            Side::B
        }
    }

    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Elimination format of a bracket.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    SingleElimination,
    #[default]
    DoubleElimination,
}

impl Format {
    /// Lenient parse: anything starting with "single"/"double" (any case).
    pub fn parse(raw: &str) -> Option<Self> {
        let val = raw.trim().to_ascii_lowercase();
        if val.starts_with("single") {
            Some(Format::SingleElimination)
        } else if val.starts_with("double") {
            Some(Format::DoubleElimination)
        } else {
            None
        }
    }

    pub fn has_losers_bracket(self) -> bool {
        self == Format::DoubleElimination
    }
}

/// Which part of the bracket a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSide {
    Winners,
    Losers,
    /// Round 1 is the grand final, round 2 the bracket reset.
    GrandFinal,
}

impl BracketSide {
    fn prefix(self) -> &'static str {
        match self {
            BracketSide::Winners => "W",
            BracketSide::Losers => "L",
            BracketSide::GrandFinal => "GF",
        }
    }
}

/// Content of a match slot.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "playerId")]
pub enum Slot {
    Player(PlayerId),
    /// Waiting for an earlier match to finish.
    #[default]
    Tbd,
    Bye,
}

impl Slot {
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Slot::Player(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Slot::Tbd)
    }
}

/// Reported value for one side: games won, or the walkover marker `W`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreValue {
    Games(u32),
    /// The side was awarded the match without a played score.
    Walkover,
}

impl ScoreValue {
    /// Parse a score token: a digit run or `W`/`w`.
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim();
        if token.eq_ignore_ascii_case("w") {
            return Some(ScoreValue::Walkover);
        }
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        token.parse().ok().map(ScoreValue::Games)
    }

    pub fn is_walkover(self) -> bool {
        matches!(self, ScoreValue::Walkover)
    }

    /// Token as written in a score line: the number, or `W`.
    pub fn token(self) -> String {
        match self {
            ScoreValue::Games(n) => n.to_string(),
            ScoreValue::Walkover => "W".to_string(),
        }
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreValue::Games(n) => write!(f, "{n}"),
            ScoreValue::Walkover => f.write_str("w/o"),
        }
    }
}

/// Progress of a single match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// At least one slot is still TBD.
    #[default]
    Pending,
    /// Both competitors known, waiting for a score.
    Ready,
    /// Score recorded, not yet propagated.
    Reported,
    /// Result propagated to the next round; immutable from here on.
    Final,
    /// Bracket reset that was not needed.
    Skipped,
}

impl MatchStatus {
    pub fn is_done(self) -> bool {
        matches!(self, MatchStatus::Final | MatchStatus::Skipped)
    }
}

/// Address of one slot in one match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRef {
    pub side: BracketSide,
    pub round: u32,
    pub index: u32,
    pub slot: Side,
}

impl SlotRef {
    pub fn new(side: BracketSide, round: u32, index: u32, slot: Side) -> Self {
        Self {
            side,
            round,
            index,
            slot,
        }
    }

    pub fn match_id(&self) -> MatchId {
        match_id(self.side, self.round, self.index)
    }
}

/// Build the id for the match at `(side, round, index)`.
pub fn match_id(side: BracketSide, round: u32, index: u32) -> MatchId {
    format!("{}{}-M{}", side.prefix(), round, index)
}

/// A single 1v1 match in the bracket graph.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMatch {
    pub id: MatchId,
    pub side: BracketSide,
    /// 1-based round within `side`.
    pub round: u32,
    /// 1-based position within the round.
    pub index: u32,
    pub slots: [Slot; 2],
    /// None until a score is recorded.
    pub scores: Option<[ScoreValue; 2]>,
    pub status: MatchStatus,
    pub winner: Option<Slot>,
    pub loser: Option<Slot>,
    /// Side that forfeited, when the result was a walkover.
    pub walkover: Option<Side>,
    /// Where the winner goes; None for the last match.
    pub winner_to: Option<SlotRef>,
    /// Where the loser goes; None when losing eliminates.
    pub loser_to: Option<SlotRef>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl GameMatch {
    pub fn new(side: BracketSide, round: u32, index: u32) -> Self {
        Self {
            id: match_id(side, round, index),
            side,
            round,
            index,
            slots: [Slot::Tbd, Slot::Tbd],
            scores: None,
            status: MatchStatus::Pending,
            winner: None,
            loser: None,
            walkover: None,
            winner_to: None,
            loser_to: None,
            updated_at: None,
        }
    }

    pub fn slot(&self, side: Side) -> Slot {
        self.slots[side.index()]
    }

    /// True when neither slot is a bye.
    pub fn is_real(&self) -> bool {
        !self.slots.contains(&Slot::Bye)
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.slots.contains(&Slot::Player(player))
    }

    pub fn winner_player(&self) -> Option<PlayerId> {
        self.winner.and_then(Slot::player)
    }

    pub fn loser_player(&self) -> Option<PlayerId> {
        self.loser.and_then(Slot::player)
    }
}

/// Full match graph for one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub format: Format,
    /// Number of first-round slots (next power of two of the player count).
    pub size: u32,
    /// Player ids by seed (index 0 is seed 1).
    pub seed_order: Vec<PlayerId>,
    /// Winners by round, then losers by round, then grand finals.
    pub matches: Vec<GameMatch>,
}

impl Bracket {
    pub fn get(&self, id: &str) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Matches of one side, in round then index order.
    pub fn side(&self, side: BracketSide) -> impl Iterator<Item = &GameMatch> {
        self.matches.iter().filter(move |m| m.side == side)
    }

    pub fn round(&self, side: BracketSide, round: u32) -> impl Iterator<Item = &GameMatch> {
        self.matches
            .iter()
            .filter(move |m| m.side == side && m.round == round)
    }

    pub fn round_count(&self, side: BracketSide) -> u32 {
        self.side(side).map(|m| m.round).max().unwrap_or(0)
    }

    pub fn player_count(&self) -> usize {
        self.seed_order.len()
    }
}
