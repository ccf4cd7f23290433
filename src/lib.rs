//! Tournament brackets and circuits: library with models, business logic and the store boundary.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::Config;
pub use logic::{
    activity_rows, apply_circuit_points, build_circuit_leaderboard, compute_placements,
    enforce_circuit_final_qualification, generate_bracket, generate_bracket_for_count,
    losers_mapping_table, parse, report_score, report_tournament_score, start_tournament,
    ActivityRow, CircuitPageController, CircuitPageDependencies, MapPoolSelector, PoolMode,
    Qualification, ReportOutcome,
};
pub use models::{
    ActivityEntry, Bracket, BracketError, BracketSide, Circuit, ErrorKind, Format, GameMatch,
    MatchId, MatchStatus, Player, PlayerId, ScoreValue, Side, Slot, SlotRef, Tournament,
};
pub use store::{DocumentStore, InMemoryStore, StoreError, Subscription};
