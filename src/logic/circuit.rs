//! Cross-tournament leaderboard and the qualification gate for circuit finals.

use crate::models::{Circuit, LeaderboardKey, Player, Tournament};
use crate::store::{DocumentStore, StoreError};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;

/// One competitor's aggregate across the circuit.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// `uid:` key once any appearance was signed in, else the legacy key.
    pub key: String,
    pub legacy_key: String,
    pub name: String,
    pub points: f64,
    /// Distinct tournaments the competitor appeared in.
    pub tournaments: usize,
    pub link: Option<String>,
    /// Order in which the key was first encountered; breaks ties.
    pub first_seen: usize,
}

impl LeaderboardEntry {
    /// Same competitor: equal keys, or equal legacy keys when at most one
    /// side carries an account id.
    pub fn is_competitor(&self, keys: &LeaderboardKey) -> bool {
        if self.key == keys.key {
            return true;
        }
        self.legacy_key == keys.legacy_key
            && (keys.key == keys.legacy_key || self.key == self.legacy_key)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitLeaderboard {
    pub leaderboard: Vec<LeaderboardEntry>,
    /// Tournament slugs that were considered.
    pub slugs: Vec<String>,
}

impl CircuitLeaderboard {
    /// 1-based rank of the competitor, if listed.
    pub fn rank_of(&self, keys: &LeaderboardKey) -> Option<usize> {
        self.leaderboard
            .iter()
            .position(|e| e.is_competitor(keys))
            .map(|i| i + 1)
    }
}

#[derive(Clone, Debug, Default)]
pub struct LeaderboardOptions {
    /// Leave this tournament out, normally the final being registered for.
    pub exclude_slug: Option<String>,
}

/// Aggregate points across the circuit's tournaments.
///
/// Tournaments are read one at a time in circuit order, followed by any
/// `extra_slugs` not already listed. Missing tournaments are skipped; an
/// unavailable store aborts the whole computation. The result is sorted by
/// points, highest first, with ties kept in first-seen order.
pub async fn build_circuit_leaderboard<S>(
    store: &S,
    circuit: &Circuit,
    extra_slugs: &[String],
    options: &LeaderboardOptions,
) -> Result<CircuitLeaderboard, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let mut slugs = circuit.tournament_slugs();
    for extra in extra_slugs {
        let extra = extra.trim();
        if !extra.is_empty() && !slugs.iter().any(|s| s == extra) {
            slugs.push(extra.to_string());
        }
    }
    if let Some(excluded) = options.exclude_slug.as_deref() {
        slugs.retain(|s| s != excluded);
    }

    let mut entries: Vec<LeaderboardEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for slug in &slugs {
        let tournament = match store.get_tournament(slug).await {
            Ok(Some(t)) => t,
            Ok(None) | Err(StoreError::NotFound(_)) => {
                log::debug!("Circuit {} skips missing tournament {}", circuit.slug, slug);
                continue;
            }
            Err(e) => return Err(e),
        };
        for player in &tournament.players {
            let keys = player.leaderboard_key();
            if keys.key.is_empty() {
                continue;
            }
            let earned = tournament
                .points_ledger
                .get(&keys.key)
                .or_else(|| tournament.points_ledger.get(&keys.legacy_key))
                .copied()
                .unwrap_or(player.points);
            let earned = if earned.is_finite() { earned } else { 0.0 };

            let pos = match find_entry(&entries, &index, &keys) {
                Some(pos) => pos,
                None => {
                    entries.push(LeaderboardEntry {
                        key: keys.key.clone(),
                        legacy_key: keys.legacy_key.clone(),
                        name: player.name.clone(),
                        points: 0.0,
                        tournaments: 0,
                        link: None,
                        first_seen: entries.len(),
                    });
                    entries.len() - 1
                }
            };
            let entry = &mut entries[pos];
            if keys.key != keys.legacy_key && entry.key != keys.key {
                log::debug!("Leaderboard entry {} is now {}", entry.key, keys.key);
                entry.key = keys.key.clone();
            }
            index.insert(keys.key.clone(), pos);
            index.entry(keys.legacy_key.clone()).or_insert(pos);
            entry.points += earned;
            entry.tournaments += 1;
            if entry.link.is_none() {
                entry.link = player.link.clone().filter(|l| !l.trim().is_empty());
            }
        }
    }

    for entry in &mut entries {
        let overridden = circuit
            .points_overrides
            .get(&entry.key)
            .or_else(|| circuit.points_overrides.get(&entry.legacy_key));
        if let Some(points) = overridden {
            if points.is_finite() {
                entry.points = *points;
            }
        }
    }
    entries.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then(a.first_seen.cmp(&b.first_seen))
    });

    Ok(CircuitLeaderboard {
        leaderboard: entries,
        slugs,
    })
}

/// Existing entry for a competitor: by its own key, or through the legacy
/// key when at most one side of the pair carries an account id.
fn find_entry(
    entries: &[LeaderboardEntry],
    index: &HashMap<String, usize>,
    keys: &LeaderboardKey,
) -> Option<usize> {
    if let Some(&pos) = index.get(&keys.key) {
        return Some(pos);
    }
    let pos = *index.get(&keys.legacy_key)?;
    entries[pos].is_competitor(keys).then_some(pos)
}

/// Who is registering for which tournament.
#[derive(Clone, Copy, Debug)]
pub struct QualificationArgs<'a> {
    pub tournament: &'a Tournament,
    pub name: &'a str,
    pub link: Option<&'a str>,
    pub uid: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Qualification {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Qualification {
    pub fn allowed() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}

/// Gate registration for a circuit final on leaderboard rank.
///
/// Only finals with a positive qualify count are gated. Any failure to
/// determine the leaderboard denies registration.
pub async fn enforce_circuit_final_qualification<S>(
    store: &S,
    args: QualificationArgs<'_>,
) -> Qualification
where
    S: DocumentStore + ?Sized,
{
    let Some(qualify_count) = args.tournament.qualify_threshold() else {
        return Qualification::allowed();
    };
    let circuit_slug = args
        .tournament
        .circuit_slug
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if circuit_slug.is_empty() {
        return deny(args, "Circuit leaderboard is unavailable for this finals event.");
    }
    let circuit = match store.get_circuit(circuit_slug).await {
        Ok(Some(c)) => c,
        Ok(None) | Err(StoreError::NotFound(_)) => {
            return deny(args, "The circuit for this finals event could not be found.");
        }
        Err(e) => {
            log::warn!("Circuit {} could not be loaded: {}", circuit_slug, e);
            return deny(args, "Circuit leaderboard is unavailable.");
        }
    };
    let options = LeaderboardOptions {
        exclude_slug: Some(args.tournament.slug.clone()),
    };
    let board = match build_circuit_leaderboard(store, &circuit, &[], &options).await {
        Ok(board) => board,
        Err(e) => {
            log::warn!("Leaderboard for circuit {} failed: {}", circuit_slug, e);
            return deny(args, "Circuit leaderboard is unavailable.");
        }
    };
    if board.leaderboard.is_empty() {
        return deny(args, "Circuit leaderboard is empty.");
    }

    let keys = LeaderboardKey::new(args.uid, args.name, args.link);
    let qualified = board.rank_of(&keys).is_some_and(|rank| rank <= qualify_count);
    if !qualified {
        return deny(
            args,
            format!("You must be in the top {qualify_count} of the circuit leaderboard to register."),
        );
    }
    Qualification::allowed()
}

fn deny(args: QualificationArgs<'_>, message: impl Into<String>) -> Qualification {
    let denied = Qualification::denied(message);
    log::info!(
        "Registration of {} for {} denied: {}",
        args.name,
        args.tournament.slug,
        denied.message.as_deref().unwrap_or_default()
    );
    denied
}

/// A competitor's accumulated circuit points, used to seed the final.
pub async fn circuit_seed_points<S>(
    store: &S,
    circuit_slug: &str,
    player: &Player,
    exclude_slug: Option<&str>,
) -> Result<f64, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let circuit = store
        .get_circuit(circuit_slug)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("circuit {circuit_slug}")))?;
    let options = LeaderboardOptions {
        exclude_slug: exclude_slug.map(str::to_string),
    };
    let board = build_circuit_leaderboard(store, &circuit, &[], &options).await?;
    let keys = player.leaderboard_key();
    Ok(board
        .leaderboard
        .iter()
        .find(|e| e.is_competitor(&keys))
        .map_or(0.0, |e| e.points))
}

/// Overwrite every player's points in a final with their circuit total.
pub async fn apply_circuit_seed_points<S>(
    store: &S,
    tournament: &mut Tournament,
) -> Result<(), StoreError>
where
    S: DocumentStore + ?Sized,
{
    let Some(circuit_slug) = tournament.circuit_slug.clone() else {
        return Ok(());
    };
    let circuit = store
        .get_circuit(&circuit_slug)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("circuit {circuit_slug}")))?;
    let options = LeaderboardOptions {
        exclude_slug: Some(tournament.slug.clone()),
    };
    let board = build_circuit_leaderboard(store, &circuit, &[], &options).await?;
    for player in tournament.players.iter_mut() {
        let keys = player.leaderboard_key();
        player.points = board
            .leaderboard
            .iter()
            .find(|e| e.is_competitor(&keys))
            .map_or(0.0, |e| e.points);
    }
    Ok(())
}

const SLUG_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// New circuit slug: `c-` followed by eight base-36 characters.
pub fn generate_circuit_slug() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| char::from(SLUG_ALPHABET[rng.gen_range(0..SLUG_ALPHABET.len())]))
        .collect();
    format!("c-{suffix}")
}

/// Store `final_event` as the circuit's final and link both documents.
pub async fn create_final_tournament<S>(
    store: &S,
    circuit_slug: &str,
    final_event: Tournament,
) -> Result<Tournament, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let mut circuit = store
        .get_circuit(circuit_slug)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("circuit {circuit_slug}")))?;

    let mut final_event = final_event;
    final_event.circuit_slug = Some(circuit.slug.clone());
    final_event.is_circuit_final = true;
    store.save_tournament(&final_event).await?;

    if let Some(previous) = circuit.final_tournament_slug.as_deref() {
        if previous != final_event.slug {
            log::info!(
                "Circuit {} final moves from {} to {}",
                circuit.slug,
                previous,
                final_event.slug
            );
        }
    }
    circuit.final_tournament_slug = Some(final_event.slug.clone());
    store.put_circuit(&circuit).await?;
    Ok(final_event)
}
