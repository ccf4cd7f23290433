//! Data structures: players, matches, brackets, tournaments, circuits, activity.

mod activity;
mod circuit;
mod game;
mod player;
mod tournament;

pub use activity::{ActivityEntry, ActivityKind, StructuredScore};
pub use circuit::Circuit;
pub use game::{
    match_id, Bracket, BracketSide, Format, GameMatch, MatchId, MatchStatus, ScoreValue, Side,
    Slot, SlotRef,
};
pub use player::{player_key, LeaderboardKey, Player, PlayerId};
pub use tournament::{BracketError, ErrorKind, PointsRule, Tournament};
