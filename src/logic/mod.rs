//! Tournament business logic: brackets, reporting, circuits and the views built on them.

mod activity_feed;
mod bracket;
mod circuit;
mod circuit_page;
mod map_pool;
mod placements;
mod report;
mod score_parser;
mod seeding;
mod setup;

pub use activity_feed::{
    activity_rows, escape_html, render_activity_html, ActivityRow, ScoreCell, ScoreStyle,
};
pub use bracket::{
    bracket_size, generate_bracket, generate_bracket_for_count, losers_destination,
    losers_mapping_table, seed_positions, winners_round_count,
};
pub use circuit::{
    apply_circuit_seed_points, build_circuit_leaderboard, circuit_seed_points,
    create_final_tournament, enforce_circuit_final_qualification, generate_circuit_slug,
    CircuitLeaderboard, LeaderboardEntry, LeaderboardOptions, Qualification, QualificationArgs,
};
pub use circuit_page::{CircuitPageController, CircuitPageDependencies, PageOutcome};
pub use map_pool::{resolve_pool, MapPoolRenderer, MapPoolSelector, PoolMode, DEFAULT_LADDER_MAPS};
pub use placements::{apply_circuit_points, compute_placements, PointsScheme};
pub use report::{
    advance, champion, decide_winner, is_complete, parse_score_pair, ready_matches,
    record_score, report_score, report_tournament_score, resolve_byes, ReportOutcome,
};
pub use score_parser::{compare_scores, parse, parse_message, ParsedScore};
pub use seeding::apply_seeding;
pub use setup::{restart_tournament, start_tournament};
