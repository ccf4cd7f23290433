//! Final placements and circuit points awarded from them.

use crate::logic::report::champion;
use crate::models::{
    Bracket, BracketError, BracketSide, MatchStatus, PlayerId, PointsRule, Side, Tournament,
};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Placement per player once the bracket is decided.
///
/// Single elimination: 1 and 2 from the final, then losers of the round `k`
/// rounds before the end share place `2^(k-1) + 1` (3, 5, 9, ...).
/// Double elimination: 1 and 2 from the grand final, then losers-bracket
/// eliminations fill places from the bottom up, tied within a round.
pub fn compute_placements(bracket: &Bracket) -> Result<HashMap<PlayerId, u32>, BracketError> {
    let first = champion(bracket).ok_or_else(|| {
        BracketError::PlacementsUnavailable("Final match is not complete yet.".to_string())
    })?;
    let mut placements = HashMap::new();
    placements.insert(first, 1);

    if !bracket.format.has_losers_bracket() {
        let rounds = bracket.round_count(BracketSide::Winners);
        for m in bracket.side(BracketSide::Winners) {
            let Some(loser) = m.loser_player() else {
                continue;
            };
            let from_end = rounds - m.round + 1;
            let place = if from_end <= 1 { 2 } else { (1 << (from_end - 1)) + 1 };
            placements.entry(loser).or_insert(place);
        }
        return Ok(placements);
    }

    let grand_final_id = crate::models::match_id(BracketSide::GrandFinal, 1, 1);
    if let Some(gf) = bracket.get(&grand_final_id) {
        for side in [Side::A, Side::B] {
            if let Some(id) = gf.slot(side).player() {
                placements.entry(id).or_insert(2);
            }
        }
    }

    let mut next_place = bracket.player_count() as u32;
    for round in 1..=bracket.round_count(BracketSide::Losers) {
        let mut eliminated: Vec<PlayerId> = Vec::new();
        for m in bracket.round(BracketSide::Losers, round) {
            if m.status != MatchStatus::Final {
                continue;
            }
            if let Some(loser) = m.loser_player() {
                if !placements.contains_key(&loser) && !eliminated.contains(&loser) {
                    eliminated.push(loser);
                }
            }
        }
        if eliminated.is_empty() {
            continue;
        }
        let start = next_place.saturating_sub(eliminated.len() as u32 - 1).max(1);
        for id in eliminated {
            placements.insert(id, start);
        }
        next_place = start.saturating_sub(1);
    }
    Ok(placements)
}

/// Points scheme with duplicate places collapsed (last row wins) and the
/// optional catch-all `below` rule split out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointsScheme {
    pub rows: BTreeMap<u32, f64>,
    pub below: Option<PointsRule>,
}

impl PointsScheme {
    pub fn normalize(rules: &[PointsRule]) -> Self {
        let valid = rules
            .iter()
            .filter(|r| r.place > 0 && r.points.is_finite() && r.points >= 0.0);
        let mut scheme = PointsScheme::default();
        for rule in valid {
            if rule.below {
                scheme.below = Some(*rule);
            } else {
                scheme.rows.insert(rule.place, rule.points);
            }
        }
        if let Some(below) = scheme.below {
            scheme.rows.retain(|&place, _| place < below.place);
        }
        scheme
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.below.is_none()
    }

    pub fn points_for(&self, placement: u32) -> Option<f64> {
        self.rows.get(&placement).copied().or_else(|| {
            self.below
                .filter(|b| placement >= b.place)
                .map(|b| b.points)
        })
    }
}

/// Award circuit points by final placement.
///
/// Each player's total is rebased on what they earned here before, and the
/// earned value is recorded in the points ledger under their leaderboard key.
/// Returns how many players were updated.
pub fn apply_circuit_points(tournament: &mut Tournament) -> Result<usize, BracketError> {
    if tournament.circuit_points_applied {
        return Err(BracketError::PointsAlreadyApplied);
    }
    let scheme = PointsScheme::normalize(&tournament.circuit_points);
    if scheme.is_empty() {
        return Err(BracketError::InvalidConfiguration(
            "Add at least one placement row.".to_string(),
        ));
    }
    let bracket = tournament.bracket.as_ref().ok_or(BracketError::NoBracket)?;
    let placements = compute_placements(bracket)?;

    let mut updated = 0;
    let mut seen = HashSet::new();
    for player in tournament.players.iter_mut() {
        let Some(&place) = placements.get(&player.id) else {
            continue;
        };
        let Some(points) = scheme.points_for(place) else {
            continue;
        };
        let key = player.leaderboard_key();
        if !seen.insert(key.key.clone()) {
            continue;
        }
        let earned_before = tournament
            .points_ledger
            .get(&key.key)
            .or_else(|| tournament.points_ledger.get(&key.legacy_key))
            .copied()
            .unwrap_or(0.0);
        let base = (player.points - earned_before).max(0.0);
        player.points = base + points;
        tournament.points_ledger.insert(key.key, points);
        updated += 1;
    }
    tournament.circuit_points_applied = true;
    log::info!(
        "Applied circuit points in {} to {} players",
        tournament.slug,
        updated
    );
    Ok(updated)
}
