//! Integration tests for the tournament lifecycle: roster, start, reporting and circuit points.

use bracket_circuit_web::logic::{
    activity_rows, apply_circuit_points, restart_tournament, ActivityRow, ScoreStyle,
};
use bracket_circuit_web::models::PointsRule;
use bracket_circuit_web::{
    report_tournament_score, start_tournament, BracketError, Format, Player, ReportOutcome,
    ScoreValue, Tournament,
};
use ScoreValue::{Games, Walkover};

fn tournament_with_players(n: usize, format: Format) -> Tournament {
    let players: Vec<Player> = (0..n)
        .map(|i| Player::new(format!("P{i}")).with_points(i as f64))
        .collect();
    Tournament::with_players("spring-cup", format, players)
}

fn rule(place: u32, points: f64) -> PointsRule {
    PointsRule {
        place,
        points,
        below: false,
    }
}

#[test]
fn duplicate_and_blank_names_are_rejected() {
    let mut t = Tournament::new("cup", Format::SingleElimination);
    t.add_player(Player::new("Alice")).unwrap();
    assert!(matches!(
        t.add_player(Player::new("  alice ")),
        Err(BracketError::DuplicatePlayerName)
    ));
    assert!(matches!(
        t.add_player(Player::new("   ")),
        Err(BracketError::InvalidConfiguration(_))
    ));
}

#[test]
fn start_seeds_by_points_and_locks_roster() {
    let mut t = tournament_with_players(4, Format::SingleElimination);
    start_tournament(&mut t).unwrap();

    let names: Vec<&str> = t.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["P3", "P2", "P1", "P0"]);
    assert_eq!(t.players[0].seed, Some(1));
    let bracket = t.bracket.as_ref().unwrap();
    assert_eq!(bracket.seed_order[0], t.players[0].id);

    assert!(matches!(
        t.add_player(Player::new("Late")),
        Err(BracketError::BracketLocked)
    ));
    assert!(matches!(start_tournament(&mut t), Err(BracketError::BracketLocked)));
}

#[test]
fn start_needs_two_players() {
    let mut t = tournament_with_players(1, Format::DoubleElimination);
    assert!(matches!(
        start_tournament(&mut t),
        Err(BracketError::InvalidConfiguration(_))
    ));
    assert!(t.bracket.is_none());
}

#[test]
fn reporting_logs_activity_once() {
    let mut t = tournament_with_players(4, Format::SingleElimination);
    assert!(matches!(
        report_tournament_score(&mut t, "W1-M1", [Games(2), Games(0)]),
        Err(BracketError::NoBracket)
    ));
    start_tournament(&mut t).unwrap();

    // W1-M1 is seed 1 (P3) against seed 4 (P0).
    let outcome = report_tournament_score(&mut t, "W1-M1", [Games(2), Games(1)]).unwrap();
    assert_eq!(outcome, ReportOutcome::Recorded);
    let again = report_tournament_score(&mut t, "W1-M1", [Games(2), Games(1)]).unwrap();
    assert_eq!(again, ReportOutcome::Unchanged);

    assert_eq!(t.activity.len(), 1);
    assert_eq!(t.activity[0].message, "Score submitted: P3 2-1 P0");

    report_tournament_score(&mut t, "W1-M2", [Walkover, Games(0)]).unwrap();
    let rows = activity_rows(&t.activity);
    assert_eq!(rows.len(), 2);
    match &rows[1] {
        ActivityRow::Score { a, b, .. } => {
            assert_eq!(a.display, "w/o");
            assert_eq!(a.style, ScoreStyle::Winner);
            assert_eq!(b.style, ScoreStyle::Loser);
        }
        other => panic!("expected a score row, got {other:?}"),
    }
}

#[test]
fn circuit_points_follow_placements_and_apply_once() {
    let mut t = tournament_with_players(4, Format::SingleElimination);
    t.circuit_points = vec![rule(1, 10.0), rule(2, 6.0), rule(3, 3.0)];
    start_tournament(&mut t).unwrap();
    assert!(matches!(
        apply_circuit_points(&mut t),
        Err(BracketError::PlacementsUnavailable(_))
    ));

    for id in ["W1-M1", "W1-M2", "W2-M1"] {
        report_tournament_score(&mut t, id, [Games(2), Games(0)]).unwrap();
    }
    let updated = apply_circuit_points(&mut t).unwrap();
    assert_eq!(updated, 4);

    // Seed 1 (P3) won; seed 2 (P2) lost the final; P1 and P0 share third.
    let points = |name: &str| {
        t.players
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.points)
            .unwrap()
    };
    assert_eq!(points("P3"), 3.0 + 10.0);
    assert_eq!(points("P2"), 2.0 + 6.0);
    assert_eq!(points("P1"), 1.0 + 3.0);
    assert_eq!(points("P0"), 0.0 + 3.0);
    assert_eq!(t.points_ledger.get("p3"), Some(&10.0));

    assert!(matches!(
        apply_circuit_points(&mut t),
        Err(BracketError::PointsAlreadyApplied)
    ));
    assert!(matches!(
        restart_tournament(&mut t),
        Err(BracketError::PointsAlreadyApplied)
    ));
}

#[test]
fn restart_reopens_registration() {
    let mut t = tournament_with_players(3, Format::DoubleElimination);
    start_tournament(&mut t).unwrap();
    restart_tournament(&mut t).unwrap();
    assert!(t.bracket.is_none());
    assert!(t.players.iter().all(|p| p.seed.is_none()));
    t.add_player(Player::new("Late")).unwrap();
    assert_eq!(t.players.len(), 4);
}
