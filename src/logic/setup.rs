//! Setup phase: seed the roster and lock it into a bracket.

use crate::logic::bracket::generate_bracket;
use crate::logic::seeding::apply_seeding;
use crate::models::{BracketError, Tournament};

/// Seed the players and generate the bracket. The roster is locked afterwards.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), BracketError> {
    if tournament.bracket.is_some() {
        return Err(BracketError::BracketLocked);
    }
    let mut players = tournament.players.clone();
    apply_seeding(&mut players);
    let bracket = generate_bracket(&players, tournament.format)?;
    log::info!(
        "Started {} ({:?}): {} players, {} matches",
        tournament.slug,
        tournament.format,
        players.len(),
        bracket.matches.len()
    );
    tournament.players = players;
    tournament.bracket = Some(bracket);
    Ok(())
}

/// Throw the bracket away and reopen registration.
///
/// Refused once circuit points have been handed out from the result.
pub fn restart_tournament(tournament: &mut Tournament) -> Result<(), BracketError> {
    if tournament.circuit_points_applied {
        return Err(BracketError::PointsAlreadyApplied);
    }
    tournament.bracket = None;
    for player in tournament.players.iter_mut() {
        player.seed = None;
    }
    log::info!("Restarted {}", tournament.slug);
    Ok(())
}
