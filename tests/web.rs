//! HTTP API tests against an in-memory store.

use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::{test, web::Data, App};
use bracket_circuit_web::api::{configure, session_middleware, AppState};
use bracket_circuit_web::logic::DEFAULT_LADDER_MAPS;
use bracket_circuit_web::InMemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;

fn ladder() -> Vec<String> {
    DEFAULT_LADDER_MAPS.iter().map(|m| m.to_string()).collect()
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(Data::new(AppState::new(
                    Arc::new(InMemoryStore::new()),
                    ladder(),
                )))
                .wrap(session_middleware(Key::generate()))
                .configure(configure),
        )
        .await
    };
}

macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn health_reports_ok() {
    let app = test_app!();
    let (status, body) = send!(app, test::TestRequest::get().uri("/api/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[actix_web::test]
async fn unknown_tournament_is_not_found() {
    let app = test_app!();
    let (status, body) = send!(app, test::TestRequest::get().uri("/api/tournaments/nope"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not-found");
}

#[actix_web::test]
async fn report_flow_logs_activity_and_rejects_changed_results() {
    let app = test_app!();
    let (status, created) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(json!({"slug": "cup", "name": "Cup", "format": "double"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["format"], "double_elimination");

    for name in ["Alice", "Bob"] {
        let (status, _) = send!(
            app,
            test::TestRequest::post()
                .uri("/api/tournaments/cup/players")
                .set_json(json!({ "name": name }))
        );
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/tournaments/cup/players")
            .set_json(json!({"name": "alice"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid-configuration");

    let (status, started) = send!(app, test::TestRequest::post().uri("/api/tournaments/cup/start"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(started["bracket"]["matches"][0]["id"], "W1-M1");

    let score = |a: &str, b: &str| {
        test::TestRequest::post()
            .uri("/api/tournaments/cup/matches/W1-M1/score")
            .set_json(json!({"scoreA": a, "scoreB": b}))
    };
    let (status, body) = send!(app, score("2", "1"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "recorded");

    let (status, body) = send!(app, score("2", "1"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "unchanged");

    let (status, body) = send!(app, score("0", "2"));
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "stale-write");

    let (status, body) = send!(app, score("x", "2"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid-configuration");

    let (_, rows) = send!(app, test::TestRequest::get().uri("/api/tournaments/cup/activity"));
    let rows = rows.as_array().cloned().unwrap_or_default();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["type"], "score");
    assert_eq!(rows[0]["a"]["name"], "Alice");
    assert_eq!(rows[0]["a"]["style"], "winner");
    assert_eq!(rows[0]["b"]["display"], "1");

    let (status, _) = send!(app, test::TestRequest::post().uri("/api/tournaments/cup/start"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn roster_import_is_all_or_nothing() {
    let app = test_app!();
    send!(
        app,
        test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(json!({"slug": "open"}))
    );

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/tournaments/open/players/import")
            .set_payload("name,link,uid,points,mmr\nCara,,,3,1200\nDan,https://example.org/dan,,,\n")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["players"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["players"][0]["points"], 3.0);
    assert_eq!(body["players"][1]["link"], "https://example.org/dan");

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/tournaments/open/players/import")
            .set_payload("name,link,uid,points,mmr\nEve,,,,\nCARA,,,,\n")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, after) = send!(app, test::TestRequest::get().uri("/api/tournaments/open"));
    assert_eq!(after["players"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn session_map_pool_survives_between_requests() {
    let app = test_app!();
    let (_, initial) = send!(app, test::TestRequest::get().uri("/api/map-pool"));
    assert_eq!(initial["mode"], "ladder");
    assert_eq!(initial["maps"].as_array().map(Vec::len), Some(9));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/map-pool/toggle")
            .set_json(json!({"name": "mothership"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "bracket_session")
        .map(|c| c.into_owned())
        .expect("session cookie");
    let toggled: Value = test::read_body_json(resp).await;
    assert_eq!(toggled["mode"], "custom");
    assert_eq!(toggled["maps"].as_array().map(Vec::len), Some(8));

    let (_, current) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/map-pool")
            .cookie(cookie.clone())
    );
    assert_eq!(current["mode"], "custom");

    let (_, reset) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/map-pool/reset")
            .cookie(cookie)
    );
    assert_eq!(reset["mode"], "ladder");
    assert_eq!(reset["maps"].as_array().map(Vec::len), Some(9));
}

#[actix_web::test]
async fn circuit_final_only_accepts_qualified_players() {
    let app = test_app!();
    let (status, circuit) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/circuits")
            .set_json(json!({"name": "Spring Series", "createdBy": "owner"}))
    );
    assert_eq!(status, StatusCode::OK);
    let slug = circuit["slug"].as_str().unwrap_or_default().to_string();
    assert!(slug.starts_with("c-"));

    send!(
        app,
        test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(json!({"slug": "week-1", "circuitSlug": slug}))
    );
    for (name, points) in [("Alice", 10.0), ("Bob", 5.0)] {
        send!(
            app,
            test::TestRequest::post()
                .uri("/api/tournaments/week-1/players")
                .set_json(json!({"name": name, "points": points}))
        );
    }

    let (_, board) = send!(
        app,
        test::TestRequest::get().uri(&format!("/api/circuits/{slug}/leaderboard"))
    );
    assert_eq!(board["leaderboard"][0]["name"], "Alice");
    assert_eq!(board["leaderboard"][1]["points"], 5.0);

    let (status, finals) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/circuits/{slug}/final"))
            .set_json(json!({"slug": "finals", "name": "Finals", "circuitQualifyCount": 1}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(finals["isCircuitFinal"], true);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/tournaments/finals/players")
            .set_json(json!({"name": "Bob"}))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "not-qualified");
    assert_eq!(
        body["error"],
        "You must be in the top 1 of the circuit leaderboard to register."
    );

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/tournaments/finals/players")
            .set_json(json!({"name": "Alice"}))
    );
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send!(
        app,
        test::TestRequest::get().uri(&format!("/api/tournaments?circuit={slug}"))
    );
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
}
