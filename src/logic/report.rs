//! Score reporting: the `pending -> ready -> reported -> final` state machine.

use crate::models::{
    ActivityEntry, Bracket, BracketError, BracketSide, GameMatch, MatchStatus, ScoreValue, Side,
    Slot, SlotRef, Tournament,
};
use chrono::Utc;
use serde::Serialize;

/// Result of a score submission that was not rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    /// The score was stored (and propagated, for `report_score`).
    Recorded,
    /// The same result was already stored; nothing changed.
    Unchanged,
}

/// Decide the winning side of a score pair.
///
/// Returns the winner and, for walkovers, the side that forfeited.
pub fn decide_winner(scores: [ScoreValue; 2]) -> Result<(Side, Option<Side>), BracketError> {
    match scores {
        [ScoreValue::Walkover, ScoreValue::Walkover] => Err(BracketError::InvalidScore(
            "both sides cannot be awarded a walkover".to_string(),
        )),
        [ScoreValue::Walkover, _] => Ok((Side::A, Some(Side::B))),
        [_, ScoreValue::Walkover] => Ok((Side::B, Some(Side::A))),
        [ScoreValue::Games(a), ScoreValue::Games(b)] if a == b => Err(BracketError::InvalidScore(
            format!("{a}-{b} is a tie; a match needs a winner"),
        )),
        [ScoreValue::Games(a), ScoreValue::Games(b)] => {
            Ok((if a > b { Side::A } else { Side::B }, None))
        }
    }
}

/// Store a score for a ready match without propagating it.
///
/// Validation happens before anything is written: a rejected score leaves the
/// bracket untouched.
pub fn record_score(
    bracket: &mut Bracket,
    match_id: &str,
    scores: [ScoreValue; 2],
) -> Result<ReportOutcome, BracketError> {
    let m = bracket
        .get_mut(match_id)
        .ok_or_else(|| BracketError::MatchNotFound(match_id.to_string()))?;

    match m.status {
        MatchStatus::Final if m.scores.is_none() && !m.is_real() => {
            return Err(BracketError::MatchNotReady(m.id.clone()));
        }
        MatchStatus::Final => {
            if m.scores == Some(scores) {
                return Ok(ReportOutcome::Unchanged);
            }
            log::warn!("Rejected stale score for final match {}", m.id);
            return Err(BracketError::StaleWrite {
                match_id: m.id.clone(),
            });
        }
        MatchStatus::Pending | MatchStatus::Skipped => {
            return Err(BracketError::MatchNotReady(m.id.clone()));
        }
        MatchStatus::Reported if m.scores == Some(scores) => {
            return Ok(ReportOutcome::Unchanged);
        }
        MatchStatus::Ready | MatchStatus::Reported => {}
    }

    let (winner, forfeited) = decide_winner(scores)?;
    m.scores = Some(scores);
    m.winner = Some(m.slot(winner));
    m.loser = Some(m.slot(winner.other()));
    m.walkover = forfeited;
    m.status = MatchStatus::Reported;
    m.updated_at = Some(Utc::now());
    Ok(ReportOutcome::Recorded)
}

/// Finalize a reported match: move its winner and loser into their next slots.
pub fn advance(bracket: &mut Bracket, match_id: &str) -> Result<(), BracketError> {
    let m = bracket
        .get(match_id)
        .ok_or_else(|| BracketError::MatchNotFound(match_id.to_string()))?;
    match m.status {
        MatchStatus::Final => return Ok(()),
        MatchStatus::Reported => {}
        _ => return Err(BracketError::MatchNotReady(m.id.clone())),
    }
    finalize(bracket, match_id);
    resolve_byes(bracket);
    Ok(())
}

/// Record and propagate a score in one step.
///
/// Re-submitting the same literal result is harmless; a different result for
/// a final match is rejected with [`BracketError::StaleWrite`].
pub fn report_score(
    bracket: &mut Bracket,
    match_id: &str,
    scores: [ScoreValue; 2],
) -> Result<ReportOutcome, BracketError> {
    let outcome = record_score(bracket, match_id, scores)?;
    let reported = bracket
        .get(match_id)
        .is_some_and(|m| m.status == MatchStatus::Reported);
    if reported {
        advance(bracket, match_id)?;
    }
    log::info!("Score for {} {:?}: {:?}", match_id, scores, outcome);
    Ok(outcome)
}

/// Parse a pair of score tokens (`"2"`, `"0"`, `"W"`).
pub fn parse_score_pair(a: &str, b: &str) -> Result<[ScoreValue; 2], BracketError> {
    let parse = |raw: &str| {
        ScoreValue::parse(raw)
            .ok_or_else(|| BracketError::InvalidScore(format!("{:?} is not a score", raw.trim())))
    };
    Ok([parse(a)?, parse(b)?])
}

/// Report a score on a tournament's bracket and log it to the activity feed.
///
/// Only a newly recorded result is logged; replays leave the feed alone.
pub fn report_tournament_score(
    tournament: &mut Tournament,
    match_id: &str,
    scores: [ScoreValue; 2],
) -> Result<ReportOutcome, BracketError> {
    let bracket = tournament.bracket.as_mut().ok_or(BracketError::NoBracket)?;
    let outcome = report_score(bracket, match_id, scores)?;
    if outcome == ReportOutcome::Unchanged {
        return Ok(outcome);
    }
    let slots = bracket.get(match_id).map(|m| m.slots);
    let [a, b] = slots.unwrap_or_default();
    let entry = ActivityEntry::score(
        slot_name(tournament, a),
        scores[0].token(),
        scores[1].token(),
        slot_name(tournament, b),
    )
    .at(Utc::now());
    tournament.activity.push(entry);
    Ok(outcome)
}

fn slot_name(tournament: &Tournament, slot: Slot) -> String {
    slot.player()
        .and_then(|id| tournament.player_name(id))
        .unwrap_or("TBD")
        .to_string()
}

fn finalize(bracket: &mut Bracket, match_id: &str) {
    let Some(m) = bracket.get_mut(match_id) else {
        return;
    };
    m.status = MatchStatus::Final;
    let m = m.clone();

    if let (Some(dest), Some(winner)) = (m.winner_to, m.winner) {
        place(bracket, dest, winner);
    }
    if let (Some(dest), Some(loser)) = (m.loser_to, m.loser) {
        place(bracket, dest, loser);
    }
    if m.side == BracketSide::GrandFinal && m.round == 1 {
        settle_grand_final(bracket, &m);
    }
}

/// Winners-bracket champion taking the grand final ends the event; otherwise
/// the same two competitors play the reset.
fn settle_grand_final(bracket: &mut Bracket, grand_final: &GameMatch) {
    let reset_id = crate::models::match_id(BracketSide::GrandFinal, 2, 1);
    let Some(reset) = bracket.get_mut(&reset_id) else {
        return;
    };
    if grand_final.winner == Some(grand_final.slot(Side::A)) {
        reset.status = MatchStatus::Skipped;
    } else {
        reset.slots = grand_final.slots;
    }
}

fn place(bracket: &mut Bracket, dest: SlotRef, slot: Slot) {
    let id = dest.match_id();
    if let Some(target) = bracket.get_mut(&id) {
        target.slots[dest.slot.index()] = slot;
    }
}

/// Recompute statuses and auto-resolve every match holding a bye.
///
/// A player facing a bye advances without a score; two byes advance a bye.
pub fn resolve_byes(bracket: &mut Bracket) {
    loop {
        let mut changed = false;
        for i in 0..bracket.matches.len() {
            let m = &mut bracket.matches[i];
            if m.status.is_done() || m.status == MatchStatus::Reported {
                continue;
            }
            let [a, b] = m.slots;
            if !a.is_known() || !b.is_known() {
                m.status = MatchStatus::Pending;
                continue;
            }
            if a != Slot::Bye && b != Slot::Bye {
                m.status = MatchStatus::Ready;
                continue;
            }
            let (winner, loser) = if b == Slot::Bye { (a, b) } else { (b, a) };
            m.winner = Some(winner);
            m.loser = Some(loser);
            let id = m.id.clone();
            finalize(bracket, &id);
            changed = true;
        }
        if !changed {
            break;
        }
    }
}

/// The tournament winner, once the last required match is final.
pub fn champion(bracket: &Bracket) -> Option<crate::models::PlayerId> {
    if bracket.format.has_losers_bracket() {
        let reset_id = crate::models::match_id(BracketSide::GrandFinal, 2, 1);
        let grand_final_id = crate::models::match_id(BracketSide::GrandFinal, 1, 1);
        let reset = bracket.get(&reset_id)?;
        match reset.status {
            MatchStatus::Final => reset.winner_player(),
            MatchStatus::Skipped => bracket.get(&grand_final_id)?.winner_player(),
            _ => None,
        }
    } else {
        let rounds = bracket.round_count(BracketSide::Winners);
        let last = bracket.round(BracketSide::Winners, rounds).next()?;
        if last.status == MatchStatus::Final {
            last.winner_player()
        } else {
            None
        }
    }
}

pub fn is_complete(bracket: &Bracket) -> bool {
    champion(bracket).is_some()
}

/// Matches waiting for a score.
pub fn ready_matches(bracket: &Bracket) -> impl Iterator<Item = &GameMatch> {
    bracket
        .matches
        .iter()
        .filter(|m| m.status == MatchStatus::Ready)
}
