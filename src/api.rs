//! REST API: tournaments, brackets, circuits and the session map pool.
//!
//! Handlers load a document, run one logic operation on it and write it back.
//! Writes go through a single lock so two reports for the same match are
//! applied one after the other, never merged.

use crate::logic::{
    activity_rows, apply_circuit_points, apply_circuit_seed_points, build_circuit_leaderboard,
    compute_placements, create_final_tournament, enforce_circuit_final_qualification,
    generate_circuit_slug, parse_score_pair, render_activity_html, report_tournament_score,
    resolve_pool, restart_tournament, start_tournament, LeaderboardOptions, MapPoolSelector,
    PoolMode, QualificationArgs, ReportOutcome,
};
use crate::models::{
    player_key, BracketError, Circuit, ErrorKind, Format, Player, PlayerId, PointsRule,
    Tournament,
};
use crate::store::{DocumentStore, StoreError, TournamentQuery};
use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::{time::Duration as CookieDuration, Key};
use actix_web::http::StatusCode;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

const MAP_POOL_SESSION_KEY: &str = "map_pool";

/// Shared server state.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub ladder_maps: Vec<String>,
    writes: Mutex<()>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, ladder_maps: Vec<String>) -> Self {
        Self {
            store,
            ladder_maps,
            writes: Mutex::new(()),
        }
    }

    async fn tournament(&self, slug: &str) -> Result<Tournament, ApiError> {
        self.store
            .get_tournament(slug)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("tournament {slug}")).into())
    }

    async fn circuit(&self, slug: &str) -> Result<Circuit, ApiError> {
        self.store
            .get_circuit(slug)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("circuit {slug}")).into())
    }

    /// Load, change and save one tournament under the write lock.
    async fn update_tournament<F>(&self, slug: &str, change: F) -> Result<Tournament, ApiError>
    where
        F: FnOnce(&mut Tournament) -> Result<(), ApiError>,
    {
        let _guard = self.writes.lock().await;
        let mut tournament = self.tournament(slug).await?;
        change(&mut tournament)?;
        self.store.save_tournament(&tournament).await?;
        Ok(tournament)
    }

    fn selector(&self) -> MapPoolSelector {
        MapPoolSelector::new(&self.ladder_maps)
    }
}

type AppData = Data<AppState>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Bracket(#[from] BracketError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Registration refused by the circuit final gate.
    #[error("{0}")]
    NotQualified(String),
    #[error("session error: {0}")]
    Session(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Bracket(e) => e.kind().as_str(),
            ApiError::Store(e) => e.kind().as_str(),
            ApiError::NotQualified(_) => "not-qualified",
            ApiError::Session(_) => "session",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        let kind = match self {
            ApiError::Bracket(e) => e.kind(),
            ApiError::Store(e) => e.kind(),
            ApiError::NotQualified(_) => return StatusCode::FORBIDDEN,
            ApiError::Session(_) => return StatusCode::INTERNAL_SERVER_ERROR,
        };
        match kind {
            ErrorKind::InvalidConfiguration => StatusCode::BAD_REQUEST,
            ErrorKind::StaleWrite => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(json!({ "error": self.to_string(), "kind": self.kind() }))
    }
}

type ApiResult = Result<HttpResponse, ApiError>;

/// Cookie session carrying the map pool selection.
pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("bracket_session".to_string())
        .cookie_secure(false)
        .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::days(7)))
        .build()
}

/// Register every API route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(favicon)
        .service(api_list_tournaments)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_set_published)
        .service(api_add_player)
        .service(api_import_players)
        .service(api_remove_player)
        .service(api_start_tournament)
        .service(api_restart_tournament)
        .service(api_report_score)
        .service(api_activity)
        .service(api_activity_html)
        .service(api_placements)
        .service(api_set_points_rules)
        .service(api_apply_circuit_points)
        .service(api_get_tournament_maps)
        .service(api_set_tournament_maps)
        .service(api_check_qualification)
        .service(api_create_circuit)
        .service(api_get_circuit)
        .service(api_set_points_overrides)
        .service(api_create_final)
        .service(api_leaderboard)
        .service(api_get_map_pool)
        .service(api_set_map_pool)
        .service(api_toggle_map)
        .service(api_reset_map_pool);
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    #[serde(default)]
    circuit: Option<String>,
    #[serde(default)]
    published: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTournamentBody {
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    circuit_slug: Option<String>,
    #[serde(default)]
    created_by: Option<String>,
    #[serde(default)]
    circuit_points: Vec<PointsRule>,
    #[serde(default)]
    circuit_qualify_count: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishBody {
    is_published: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddPlayerBody {
    name: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    points: Option<f64>,
    #[serde(default)]
    mmr: Option<u32>,
}

impl AddPlayerBody {
    fn into_player(self) -> Player {
        let mut player = Player::new(self.name.trim());
        player.link = self.link.filter(|l| !l.trim().is_empty());
        player.uid = self.uid.filter(|u| !u.trim().is_empty());
        player.points = self.points.filter(|p| p.is_finite()).unwrap_or(0.0);
        player.mmr = self.mmr.unwrap_or(0);
        player
    }
}

/// One roster line: `name,link,uid,points,mmr`.
#[derive(Deserialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    points: Option<f64>,
    #[serde(default)]
    mmr: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreBody {
    score_a: String,
    score_b: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreResponse<'a> {
    outcome: ReportOutcome,
    tournament: &'a Tournament,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlacementRow {
    player_id: PlayerId,
    name: String,
    placement: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrantBody {
    name: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    uid: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCircuitBody {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    created_by: Option<String>,
    #[serde(default)]
    admins: Vec<String>,
}

#[derive(Deserialize)]
struct MapsBody {
    maps: Vec<String>,
}

#[derive(Deserialize)]
struct ToggleBody {
    name: String,
}

#[derive(Serialize)]
struct MapPoolView {
    maps: Vec<String>,
    mode: PoolMode,
    defaults: Vec<String>,
}

impl MapPoolView {
    fn of(selector: &MapPoolSelector) -> Self {
        Self {
            maps: selector.selection().iter().cloned().collect(),
            mode: selector.mode(),
            defaults: selector.defaults().to_vec(),
        }
    }
}

fn unique_slug(name: &str) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(6).collect();
    let base = player_key(name, None);
    let base = base.trim_matches('-');
    if base.is_empty() {
        format!("t-{suffix}")
    } else {
        format!("{base}-{suffix}")
    }
}

fn parse_format(raw: Option<&str>) -> Result<Format, BracketError> {
    match raw {
        None => Ok(Format::default()),
        Some(raw) => Format::parse(raw).ok_or_else(|| {
            BracketError::InvalidConfiguration(format!("unknown format {:?}", raw.trim()))
        }),
    }
}

#[get("/api/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-circuit-web",
    })
}

#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Tournaments oldest first, optionally only one circuit's or only published ones.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppData, query: Query<ListQuery>) -> ApiResult {
    let query = TournamentQuery {
        circuit_slug: query.circuit.clone().filter(|c| !c.trim().is_empty()),
        published_only: query.published,
    };
    let tournaments = state.store.list_tournaments(&query).await?;
    Ok(HttpResponse::Ok().json(tournaments))
}

/// Create a tournament; joins the given circuit as a member event.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppData, body: Json<CreateTournamentBody>) -> ApiResult {
    let body = body.into_inner();
    let format = parse_format(body.format.as_deref())?;
    let slug = match body.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slug.to_string(),
        None => unique_slug(&body.name),
    };

    let _guard = state.writes.lock().await;
    if state.store.get_tournament(&slug).await?.is_some() {
        return Err(BracketError::InvalidConfiguration(format!(
            "tournament {slug} already exists"
        ))
        .into());
    }
    let mut tournament = Tournament::new(slug, format);
    if !body.name.trim().is_empty() {
        tournament.name = body.name.trim().to_string();
    }
    tournament.created_by = body.created_by;
    tournament.circuit_points = body.circuit_points;
    tournament.circuit_qualify_count = body.circuit_qualify_count;

    if let Some(circuit_slug) = body.circuit_slug.filter(|c| !c.trim().is_empty()) {
        let mut circuit = state.circuit(circuit_slug.trim()).await?;
        circuit.add_tournament(&tournament.slug);
        tournament.circuit_slug = Some(circuit.slug.clone());
        state.store.put_circuit(&circuit).await?;
    }
    state.store.save_tournament(&tournament).await?;
    log::info!("Created tournament {} ({:?})", tournament.slug, tournament.format);
    Ok(HttpResponse::Ok().json(tournament))
}

#[get("/api/tournaments/{slug}")]
async fn api_get_tournament(state: AppData, path: Path<String>) -> ApiResult {
    let tournament = state.tournament(&path).await?;
    Ok(HttpResponse::Ok().json(tournament))
}

/// Publish or hide; only the flag is written.
#[put("/api/tournaments/{slug}/publish")]
async fn api_set_published(
    state: AppData,
    path: Path<String>,
    body: Json<PublishBody>,
) -> ApiResult {
    let _guard = state.writes.lock().await;
    state.tournament(&path).await?;
    let tournament = state
        .store
        .put_tournament(&path, json!({ "isPublished": body.is_published }), true)
        .await?;
    Ok(HttpResponse::Ok().json(tournament))
}

/// Register a player. Circuit finals only accept qualified competitors.
#[post("/api/tournaments/{slug}/players")]
async fn api_add_player(
    state: AppData,
    path: Path<String>,
    body: Json<AddPlayerBody>,
) -> ApiResult {
    let player = body.into_inner().into_player();
    let _guard = state.writes.lock().await;
    let mut tournament = state.tournament(&path).await?;

    let args = QualificationArgs {
        tournament: &tournament,
        name: &player.name,
        link: player.link.as_deref(),
        uid: player.uid.as_deref(),
    };
    let qualification = enforce_circuit_final_qualification(&*state.store, args).await;
    if !qualification.ok {
        return Err(ApiError::NotQualified(
            qualification.message.unwrap_or_default(),
        ));
    }

    tournament.add_player(player)?;
    state.store.save_tournament(&tournament).await?;
    Ok(HttpResponse::Ok().json(tournament))
}

/// Bulk roster import from CSV with a header row. Nothing is added if any row fails.
#[post("/api/tournaments/{slug}/players/import")]
async fn api_import_players(state: AppData, path: Path<String>, body: String) -> ApiResult {
    let tournament = state
        .update_tournament(&path, |t| {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .flexible(true)
                .from_reader(body.as_bytes());
            for (line, row) in reader.deserialize::<RosterRow>().enumerate() {
                let row = row.map_err(|e| {
                    BracketError::InvalidConfiguration(format!("row {}: {}", line + 1, e))
                })?;
                let player = AddPlayerBody {
                    name: row.name,
                    link: row.link,
                    uid: row.uid,
                    points: row.points,
                    mmr: row.mmr,
                }
                .into_player();
                t.add_player(player)?;
            }
            Ok(())
        })
        .await?;
    log::info!("Imported roster into {}: {} players", tournament.slug, tournament.players.len());
    Ok(HttpResponse::Ok().json(tournament))
}

#[delete("/api/tournaments/{slug}/players/{player_id}")]
async fn api_remove_player(state: AppData, path: Path<(String, Uuid)>) -> ApiResult {
    let (slug, player_id) = path.into_inner();
    let tournament = state
        .update_tournament(&slug, |t| Ok(t.remove_player(player_id)?))
        .await?;
    Ok(HttpResponse::Ok().json(tournament))
}

/// Seed and generate the bracket. Finals are seeded on circuit points.
#[post("/api/tournaments/{slug}/start")]
async fn api_start_tournament(state: AppData, path: Path<String>) -> ApiResult {
    let _guard = state.writes.lock().await;
    let mut tournament = state.tournament(&path).await?;
    if tournament.is_circuit_final && tournament.bracket.is_none() {
        apply_circuit_seed_points(&*state.store, &mut tournament).await?;
    }
    start_tournament(&mut tournament)?;
    state.store.save_tournament(&tournament).await?;
    Ok(HttpResponse::Ok().json(tournament))
}

#[post("/api/tournaments/{slug}/restart")]
async fn api_restart_tournament(state: AppData, path: Path<String>) -> ApiResult {
    let tournament = state
        .update_tournament(&path, |t| Ok(restart_tournament(t)?))
        .await?;
    Ok(HttpResponse::Ok().json(tournament))
}

/// Report a score (`"2"`/`"1"`, or `"W"` for a walkover).
#[post("/api/tournaments/{slug}/matches/{match_id}/score")]
async fn api_report_score(
    state: AppData,
    path: Path<(String, String)>,
    body: Json<ScoreBody>,
) -> ApiResult {
    let (slug, match_id) = path.into_inner();
    let scores = parse_score_pair(&body.score_a, &body.score_b)?;
    let mut outcome = ReportOutcome::Unchanged;
    let tournament = state
        .update_tournament(&slug, |t| {
            outcome = report_tournament_score(t, &match_id, scores)?;
            Ok(())
        })
        .await?;
    Ok(HttpResponse::Ok().json(ScoreResponse {
        outcome,
        tournament: &tournament,
    }))
}

#[get("/api/tournaments/{slug}/activity")]
async fn api_activity(state: AppData, path: Path<String>) -> ApiResult {
    let tournament = state.tournament(&path).await?;
    Ok(HttpResponse::Ok().json(activity_rows(&tournament.activity)))
}

#[get("/api/tournaments/{slug}/activity.html")]
async fn api_activity_html(state: AppData, path: Path<String>) -> ApiResult {
    let tournament = state.tournament(&path).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_activity_html(&tournament.activity)))
}

#[get("/api/tournaments/{slug}/placements")]
async fn api_placements(state: AppData, path: Path<String>) -> ApiResult {
    let tournament = state.tournament(&path).await?;
    let bracket = tournament.bracket.as_ref().ok_or(BracketError::NoBracket)?;
    let mut rows: Vec<PlacementRow> = compute_placements(bracket)?
        .into_iter()
        .map(|(player_id, placement)| PlacementRow {
            player_id,
            name: tournament
                .player_name(player_id)
                .unwrap_or("Unknown")
                .to_string(),
            placement,
        })
        .collect();
    rows.sort_by(|a, b| a.placement.cmp(&b.placement).then(a.name.cmp(&b.name)));
    Ok(HttpResponse::Ok().json(rows))
}

#[put("/api/tournaments/{slug}/circuit-points")]
async fn api_set_points_rules(
    state: AppData,
    path: Path<String>,
    body: Json<Vec<PointsRule>>,
) -> ApiResult {
    let rules = body.into_inner();
    let tournament = state
        .update_tournament(&path, |t| {
            if t.circuit_points_applied {
                return Err(BracketError::PointsAlreadyApplied.into());
            }
            t.circuit_points = rules;
            Ok(())
        })
        .await?;
    Ok(HttpResponse::Ok().json(tournament))
}

#[post("/api/tournaments/{slug}/circuit-points/apply")]
async fn api_apply_circuit_points(state: AppData, path: Path<String>) -> ApiResult {
    let tournament = state
        .update_tournament(&path, |t| {
            apply_circuit_points(t)?;
            Ok(())
        })
        .await?;
    Ok(HttpResponse::Ok().json(tournament))
}

/// Maps this tournament is played on.
#[get("/api/tournaments/{slug}/maps")]
async fn api_get_tournament_maps(state: AppData, path: Path<String>) -> ApiResult {
    let tournament = state.tournament(&path).await?;
    let maps = resolve_pool(&tournament.map_pool, &state.ladder_maps);
    Ok(HttpResponse::Ok().json(json!({ "maps": maps })))
}

/// Store a custom pool; the ladder set is stored as empty (ladder defaults).
#[put("/api/tournaments/{slug}/maps")]
async fn api_set_tournament_maps(
    state: AppData,
    path: Path<String>,
    body: Json<MapsBody>,
) -> ApiResult {
    let mut selector = state.selector();
    selector.set_selection(&body.maps);
    let tournament = state
        .update_tournament(&path, |t| {
            t.map_pool = match selector.mode() {
                PoolMode::Ladder => Vec::new(),
                PoolMode::Custom => selector.selection().iter().cloned().collect(),
            };
            Ok(())
        })
        .await?;
    Ok(HttpResponse::Ok().json(tournament))
}

#[post("/api/tournaments/{slug}/qualification")]
async fn api_check_qualification(
    state: AppData,
    path: Path<String>,
    body: Json<RegistrantBody>,
) -> ApiResult {
    let tournament = state.tournament(&path).await?;
    let args = QualificationArgs {
        tournament: &tournament,
        name: body.name.trim(),
        link: body.link.as_deref(),
        uid: body.uid.as_deref(),
    };
    let qualification = enforce_circuit_final_qualification(&*state.store, args).await;
    Ok(HttpResponse::Ok().json(qualification))
}

#[post("/api/circuits")]
async fn api_create_circuit(state: AppData, body: Json<CreateCircuitBody>) -> ApiResult {
    let body = body.into_inner();
    if body.name.trim().is_empty() {
        return Err(
            BracketError::InvalidConfiguration("circuit name must not be empty".to_string()).into(),
        );
    }
    let mut circuit = Circuit::new(generate_circuit_slug(), body.name.trim());
    circuit.description = body.description;
    circuit.created_by = body.created_by;
    circuit.admins = body.admins;
    state.store.put_circuit(&circuit).await?;
    log::info!("Created circuit {}", circuit.slug);
    Ok(HttpResponse::Ok().json(circuit))
}

#[get("/api/circuits/{slug}")]
async fn api_get_circuit(state: AppData, path: Path<String>) -> ApiResult {
    let circuit = state.circuit(&path).await?;
    Ok(HttpResponse::Ok().json(circuit))
}

/// Manual leaderboard corrections, by competitor key.
#[put("/api/circuits/{slug}/points-overrides")]
async fn api_set_points_overrides(
    state: AppData,
    path: Path<String>,
    body: Json<BTreeMap<String, f64>>,
) -> ApiResult {
    let _guard = state.writes.lock().await;
    let mut circuit = state.circuit(&path).await?;
    circuit.points_overrides = body
        .into_inner()
        .into_iter()
        .filter(|(key, points)| !key.trim().is_empty() && points.is_finite())
        .collect();
    state.store.put_circuit(&circuit).await?;
    Ok(HttpResponse::Ok().json(circuit))
}

/// Create the circuit's final event.
#[post("/api/circuits/{slug}/final")]
async fn api_create_final(
    state: AppData,
    path: Path<String>,
    body: Json<CreateTournamentBody>,
) -> ApiResult {
    let body = body.into_inner();
    let format = parse_format(body.format.as_deref())?;
    let slug = match body.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slug.to_string(),
        None => unique_slug(&body.name),
    };
    let _guard = state.writes.lock().await;
    if state.store.get_tournament(&slug).await?.is_some() {
        return Err(BracketError::InvalidConfiguration(format!(
            "tournament {slug} already exists"
        ))
        .into());
    }
    let mut final_event = Tournament::new(slug, format);
    if !body.name.trim().is_empty() {
        final_event.name = body.name.trim().to_string();
    }
    final_event.created_by = body.created_by;
    final_event.circuit_qualify_count = body.circuit_qualify_count;
    final_event.circuit_points = body.circuit_points;
    let final_event = create_final_tournament(&*state.store, &path, final_event).await?;
    Ok(HttpResponse::Ok().json(final_event))
}

#[get("/api/circuits/{slug}/leaderboard")]
async fn api_leaderboard(state: AppData, path: Path<String>) -> ApiResult {
    let circuit = state.circuit(&path).await?;
    let board = build_circuit_leaderboard(
        &*state.store,
        &circuit,
        &[],
        &LeaderboardOptions::default(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(board))
}

fn session_selector(state: &AppState, session: &Session) -> Result<MapPoolSelector, ApiError> {
    let mut selector = state.selector();
    let saved = session
        .get::<Vec<String>>(MAP_POOL_SESSION_KEY)
        .map_err(|e| ApiError::Session(e.to_string()))?;
    if let Some(saved) = saved {
        selector.set_selection(saved);
    }
    Ok(selector)
}

fn save_selector(session: &Session, selector: &MapPoolSelector) -> ApiResult {
    session
        .insert(MAP_POOL_SESSION_KEY, selector.selection())
        .map_err(|e| ApiError::Session(e.to_string()))?;
    Ok(HttpResponse::Ok().json(MapPoolView::of(selector)))
}

#[get("/api/map-pool")]
async fn api_get_map_pool(state: AppData, session: Session) -> ApiResult {
    let selector = session_selector(&state, &session)?;
    Ok(HttpResponse::Ok().json(MapPoolView::of(&selector)))
}

#[put("/api/map-pool")]
async fn api_set_map_pool(state: AppData, session: Session, body: Json<MapsBody>) -> ApiResult {
    let mut selector = session_selector(&state, &session)?;
    selector.set_selection(&body.maps);
    save_selector(&session, &selector)
}

#[post("/api/map-pool/toggle")]
async fn api_toggle_map(state: AppData, session: Session, body: Json<ToggleBody>) -> ApiResult {
    let mut selector = session_selector(&state, &session)?;
    selector.toggle(&body.name);
    save_selector(&session, &selector)
}

#[post("/api/map-pool/reset")]
async fn api_reset_map_pool(state: AppData, session: Session) -> ApiResult {
    let mut selector = session_selector(&state, &session)?;
    selector.reset();
    save_selector(&session, &selector)
}
