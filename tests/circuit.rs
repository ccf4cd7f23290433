//! Integration tests for circuit leaderboards, final qualification and final creation.

use bracket_circuit_web::logic::{
    build_circuit_leaderboard, circuit_seed_points, create_final_tournament,
    enforce_circuit_final_qualification, LeaderboardOptions, QualificationArgs,
};
use bracket_circuit_web::{
    Circuit, DocumentStore, Format, InMemoryStore, Player, StoreError, Tournament,
};

/// Tournament whose players earned the given points.
fn event(slug: &str, results: &[(&str, f64)]) -> Tournament {
    let players = results
        .iter()
        .map(|(name, points)| Player::new(*name).with_points(*points))
        .collect();
    Tournament::with_players(slug, Format::DoubleElimination, players)
}

fn final_event(slug: &str, circuit: &str, qualify_count: Option<i64>) -> Tournament {
    let mut t = Tournament::new(slug, Format::DoubleElimination);
    t.circuit_slug = Some(circuit.to_string());
    t.is_circuit_final = true;
    t.circuit_qualify_count = qualify_count;
    t
}

/// Circuit `c-test` with two played events and five competitors.
async fn seeded_store() -> (InMemoryStore, Circuit) {
    let store = InMemoryStore::new();
    store
        .save_tournament(&event(
            "week-1",
            &[("Alice", 10.0), ("Bob", 6.0), ("Cara", 3.0), ("Dan", 3.0)],
        ))
        .await
        .unwrap();
    store
        .save_tournament(&event(
            "week-2",
            &[("Bob", 10.0), ("Eve", 8.0), ("Dan", 1.0), ("Alice", 0.0)],
        ))
        .await
        .unwrap();
    let mut circuit = Circuit::new("c-test", "Test Circuit");
    circuit.add_tournament("week-1");
    circuit.add_tournament("week-2");
    store.put_circuit(&circuit).await.unwrap();
    (store, circuit)
}

fn order(board: &bracket_circuit_web::logic::CircuitLeaderboard) -> Vec<(&str, f64)> {
    board
        .leaderboard
        .iter()
        .map(|e| (e.name.as_str(), e.points))
        .collect()
}

#[actix_web::test]
async fn leaderboard_sums_points_and_breaks_ties_by_first_seen() {
    let (store, circuit) = seeded_store().await;
    let options = LeaderboardOptions::default();
    let board = build_circuit_leaderboard(&store, &circuit, &[], &options)
        .await
        .unwrap();

    assert_eq!(
        order(&board),
        vec![
            ("Bob", 16.0),
            ("Alice", 10.0),
            ("Eve", 8.0),
            ("Dan", 4.0),
            ("Cara", 3.0),
        ]
    );
    assert_eq!(board.leaderboard[0].tournaments, 2);
    assert_eq!(board.leaderboard[2].tournaments, 1);
    assert_eq!(board.slugs, vec!["week-1", "week-2"]);

    let again = build_circuit_leaderboard(&store, &circuit, &[], &options)
        .await
        .unwrap();
    assert_eq!(board, again);
}

#[actix_web::test]
async fn equal_points_keep_first_seen_order() {
    let store = InMemoryStore::new();
    store
        .save_tournament(&event("a", &[("Zed", 5.0), ("Amy", 5.0), ("Max", 5.0)]))
        .await
        .unwrap();
    let mut circuit = Circuit::new("c-tie", "Ties");
    circuit.add_tournament("a");
    let board = build_circuit_leaderboard(&store, &circuit, &[], &LeaderboardOptions::default())
        .await
        .unwrap();
    let names: Vec<&str> = board.leaderboard.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Zed", "Amy", "Max"]);
}

#[actix_web::test]
async fn ledger_points_win_over_player_totals() {
    let store = InMemoryStore::new();
    let mut t = event("ledgered", &[("Alice", 50.0), ("Bob", 7.0)]);
    t.points_ledger.insert("alice".to_string(), 12.0);
    store.save_tournament(&t).await.unwrap();
    let mut circuit = Circuit::new("c-ledger", "Ledger");
    circuit.add_tournament("ledgered");

    let board = build_circuit_leaderboard(&store, &circuit, &[], &LeaderboardOptions::default())
        .await
        .unwrap();
    assert_eq!(order(&board), vec![("Alice", 12.0), ("Bob", 7.0)]);
}

#[actix_web::test]
async fn excluded_and_missing_tournaments_are_skipped_and_overrides_apply() {
    let (store, mut circuit) = seeded_store().await;
    circuit.add_tournament("deleted-event");
    circuit.points_overrides.insert("cara".to_string(), 99.0);

    let options = LeaderboardOptions {
        exclude_slug: Some("week-2".to_string()),
    };
    let board = build_circuit_leaderboard(&store, &circuit, &[], &options)
        .await
        .unwrap();
    assert_eq!(board.slugs, vec!["week-1", "deleted-event"]);
    assert_eq!(
        order(&board),
        vec![("Cara", 99.0), ("Alice", 10.0), ("Bob", 6.0), ("Dan", 3.0)]
    );

    let extra = vec!["week-2".to_string()];
    let with_extra = build_circuit_leaderboard(&store, &circuit, &extra, &LeaderboardOptions::default())
        .await
        .unwrap();
    assert_eq!(with_extra.leaderboard.len(), 5);
}

#[actix_web::test]
async fn unavailable_store_aborts_leaderboard() {
    let (store, circuit) = seeded_store().await;
    store.set_unavailable(true);
    let result =
        build_circuit_leaderboard(&store, &circuit, &[], &LeaderboardOptions::default()).await;
    assert!(matches!(result, Err(StoreError::Unavailable(_))));
}

#[actix_web::test]
async fn qualification_is_open_without_positive_threshold() {
    let (store, _) = seeded_store().await;
    store.set_unavailable(true);
    for t in [
        final_event("final", "c-test", Some(0)),
        final_event("final", "c-test", Some(-3)),
        final_event("final", "c-test", None),
        event("week-3", &[]),
    ] {
        let args = QualificationArgs {
            tournament: &t,
            name: "Nobody",
            link: None,
            uid: None,
        };
        assert!(enforce_circuit_final_qualification(&store, args).await.ok);
    }
}

#[actix_web::test]
async fn qualification_requires_top_ranks() {
    let (store, _) = seeded_store().await;
    let finals = final_event("final", "c-test", Some(4));
    let check = |name: &'static str| QualificationArgs {
        tournament: &finals,
        name,
        link: None,
        uid: None,
    };

    assert!(enforce_circuit_final_qualification(&store, check("Dan")).await.ok);
    let denied = enforce_circuit_final_qualification(&store, check("Cara")).await;
    assert!(!denied.ok);
    assert_eq!(
        denied.message.as_deref(),
        Some("You must be in the top 4 of the circuit leaderboard to register.")
    );
}

#[actix_web::test]
async fn uid_or_legacy_key_can_qualify() {
    let store = InMemoryStore::new();
    let mut week = event("w", &[]);
    week.players.push(Player::new("Alice").with_uid("u-1").with_points(5.0));
    week.players.push(Player::new("Bob").with_points(4.0));
    store.save_tournament(&week).await.unwrap();
    let mut circuit = Circuit::new("c-keys", "Keys");
    circuit.add_tournament("w");
    store.put_circuit(&circuit).await.unwrap();
    let finals = final_event("final", "c-keys", Some(2));

    let by_uid = QualificationArgs {
        tournament: &finals,
        name: "Alice Renamed",
        link: None,
        uid: Some("u-1"),
    };
    assert!(enforce_circuit_final_qualification(&store, by_uid).await.ok);

    // Bob registered before accounts existed; his uid key is new but the legacy key matches.
    let legacy = QualificationArgs {
        tournament: &finals,
        name: "Bob",
        link: None,
        uid: Some("u-2"),
    };
    assert!(enforce_circuit_final_qualification(&store, legacy).await.ok);
}

#[actix_web::test]
async fn qualification_fails_closed_with_distinct_messages() {
    let (store, _) = seeded_store().await;
    let message = |q: bracket_circuit_web::Qualification| {
        assert!(!q.ok);
        q.message.unwrap_or_default()
    };

    let mut no_circuit = final_event("final", "c-test", Some(2));
    no_circuit.circuit_slug = None;
    let args = QualificationArgs {
        tournament: &no_circuit,
        name: "Bob",
        link: None,
        uid: None,
    };
    let missing_slug = message(enforce_circuit_final_qualification(&store, args).await);

    let unknown = final_event("final", "c-unknown", Some(2));
    let args = QualificationArgs {
        tournament: &unknown,
        ..args
    };
    let missing_circuit = message(enforce_circuit_final_qualification(&store, args).await);

    let empty_store = InMemoryStore::new();
    empty_store
        .put_circuit(&Circuit::new("c-empty", "Empty"))
        .await
        .unwrap();
    let empty = final_event("final", "c-empty", Some(2));
    let args = QualificationArgs {
        tournament: &empty,
        ..args
    };
    let empty_board = message(enforce_circuit_final_qualification(&empty_store, args).await);

    let gated = final_event("final", "c-test", Some(2));
    store.set_unavailable(true);
    let args = QualificationArgs {
        tournament: &gated,
        ..args
    };
    let unavailable = message(enforce_circuit_final_qualification(&store, args).await);

    assert_eq!(missing_slug, "Circuit leaderboard is unavailable for this finals event.");
    assert_eq!(missing_circuit, "The circuit for this finals event could not be found.");
    assert_eq!(empty_board, "Circuit leaderboard is empty.");
    assert_eq!(unavailable, "Circuit leaderboard is unavailable.");
}

#[actix_web::test]
async fn final_is_linked_and_excluded_from_its_own_gate() {
    let (store, _) = seeded_store().await;
    let created = create_final_tournament(&store, "c-test", Tournament::new("grand-final", Format::SingleElimination))
        .await
        .unwrap();
    assert!(created.is_circuit_final);
    assert_eq!(created.circuit_slug.as_deref(), Some("c-test"));

    let circuit = store.get_circuit("c-test").await.unwrap().unwrap();
    assert_eq!(circuit.final_tournament_slug.as_deref(), Some("grand-final"));
    assert_eq!(circuit.tournament_slugs(), vec!["week-1", "week-2", "grand-final"]);

    let missing = create_final_tournament(&store, "c-nope", Tournament::new("x", Format::default())).await;
    assert!(matches!(missing, Err(StoreError::NotFound(_))));

    let bob = Player::new("Bob");
    let points = circuit_seed_points(&store, "c-test", &bob, Some("grand-final"))
        .await
        .unwrap();
    assert_eq!(points, 16.0);
    let stranger = circuit_seed_points(&store, "c-test", &Player::new("Zoe"), None)
        .await
        .unwrap();
    assert_eq!(stranger, 0.0);
}

#[actix_web::test]
async fn signed_in_and_legacy_appearances_share_one_entry() {
    let store = InMemoryStore::new();
    store
        .save_tournament(&event("t1", &[("Alice", 10.0), ("Bob", 15.0)]))
        .await
        .unwrap();
    let mut t2 = event("t2", &[]);
    t2.players.push(Player::new("Alice").with_uid("u-1").with_points(10.0));
    store.save_tournament(&t2).await.unwrap();
    let mut t3 = event("t3", &[("alice", 1.0)]);
    t3.players.push(Player::new("Alice").with_uid("u-2").with_points(4.0));
    store.save_tournament(&t3).await.unwrap();

    let mut circuit = Circuit::new("c-merge", "Merge");
    for slug in ["t1", "t2", "t3"] {
        circuit.add_tournament(slug);
    }
    store.put_circuit(&circuit).await.unwrap();

    let board = build_circuit_leaderboard(&store, &circuit, &[], &LeaderboardOptions::default())
        .await
        .unwrap();
    let rows: Vec<(&str, f64, usize)> = board
        .leaderboard
        .iter()
        .map(|e| (e.key.as_str(), e.points, e.first_seen))
        .collect();
    // A second account with the same name stays separate.
    assert_eq!(
        rows,
        vec![("uid:u-1", 21.0, 0), ("bob", 15.0, 1), ("uid:u-2", 4.0, 2)]
    );
    assert_eq!(board.leaderboard[0].tournaments, 3);

    let finals = final_event("final", "c-merge", Some(1));
    for (name, uid) in [("Alice", None), ("Alice", Some("u-1"))] {
        let args = QualificationArgs {
            tournament: &finals,
            name,
            link: None,
            uid,
        };
        assert!(enforce_circuit_final_qualification(&store, args).await.ok);
    }
    let other_account = QualificationArgs {
        tournament: &finals,
        name: "Alice",
        link: None,
        uid: Some("u-2"),
    };
    assert!(!enforce_circuit_final_qualification(&store, other_account).await.ok);
}
