//! Elimination bracket construction: seeding layout, byes, losers-bracket mapping.
//!
//! A bracket for `n` players has `size = n.next_power_of_two()` first-round slots
//! and `log2(size)` winners rounds. Seeds beyond `n` are byes, and the standard
//! seeding layout pairs seed `s` with seed `size + 1 - s`, so byes always land
//! on the top `size - n` seeds.
//!
//! Double elimination adds `2 * (log2(size) - 1)` losers rounds, a grand final
//! and a bracket reset. Losers enter the losers bracket through
//! [`losers_destination`]:
//!
//! - winners round 1, match `m` drops to losers round 1, match `ceil(m / 2)`,
//!   slot A for odd `m`, slot B for even `m`;
//! - winners round `j + 1`, match `m` of `c` drops to slot A of losers round `2j`,
//!   match `c + 1 - m` when `j` is odd and match `m` when `j` is even.

use crate::logic::report::resolve_byes;
use crate::models::{
    Bracket, BracketError, BracketSide, Format, GameMatch, MatchId, Player, PlayerId, Side, Slot,
    SlotRef,
};
use uuid::Uuid;

/// Smallest power of two that fits `count` players (at least 2).
pub fn bracket_size(count: usize) -> u32 {
    let size = count.max(2).next_power_of_two();
    u32::try_from(size).unwrap_or(u32::MAX)
}

/// Number of winners rounds: `ceil(log2(count))`.
pub fn winners_round_count(count: usize) -> u32 {
    bracket_size(count).trailing_zeros()
}

/// Seeds in first-round slot order, e.g. `[1, 8, 4, 5, 2, 7, 3, 6]` for 8.
///
/// Adjacent pairs are first-round matches.
pub fn seed_positions(size: u32) -> Vec<u32> {
    if size <= 1 {
        return vec![1];
    }
    let mut seeds = vec![1, 2];
    while (seeds.len() as u32) < size {
        let n = seeds.len() as u32 * 2;
        seeds = seeds.iter().flat_map(|&s| [s, n + 1 - s]).collect();
    }
    seeds
}

/// Matches in winners round `round` of a `size` bracket.
fn winners_matches_in_round(size: u32, round: u32) -> u32 {
    size >> round
}

/// Matches in losers round `round` of a `size` bracket.
fn losers_matches_in_round(size: u32, round: u32) -> u32 {
    size >> ((round + 1) / 2 + 1)
}

fn half_up(m: u32) -> u32 {
    m.div_ceil(2)
}

fn pair_slot(m: u32) -> Side {
    Side::from_index(((m - 1) % 2) as usize)
}

/// Where the loser of winners match `(round, index)` goes in a double-elimination
/// bracket of `size` slots. None for out-of-range input.
pub fn losers_destination(size: u32, round: u32, index: u32) -> Option<SlotRef> {
    if size < 2 || !size.is_power_of_two() {
        return None;
    }
    let rounds = size.trailing_zeros();
    if round == 0 || round > rounds || index == 0 || index > winners_matches_in_round(size, round)
    {
        return None;
    }
    if rounds == 1 {
        // Two-player bracket: no losers rounds, the loser goes straight to the grand final.
        return Some(SlotRef::new(BracketSide::GrandFinal, 1, 1, Side::B));
    }
    if round == 1 {
        return Some(SlotRef::new(
            BracketSide::Losers,
            1,
            half_up(index),
            pair_slot(index),
        ));
    }
    let j = round - 1;
    let count = winners_matches_in_round(size, round);
    let target = if j % 2 == 1 { count + 1 - index } else { index };
    Some(SlotRef::new(BracketSide::Losers, 2 * j, target, Side::A))
}

/// Every winners match id with the losers slot its loser drops into.
pub fn losers_mapping_table(size: u32) -> Vec<(MatchId, SlotRef)> {
    if size < 2 || !size.is_power_of_two() {
        return Vec::new();
    }
    let rounds = size.trailing_zeros();
    (1..=rounds)
        .flat_map(|round| {
            (1..=winners_matches_in_round(size, round)).filter_map(move |index| {
                losers_destination(size, round, index)
                    .map(|dest| (crate::models::match_id(BracketSide::Winners, round, index), dest))
            })
        })
        .collect()
}

/// Build the complete match graph for `players`, taken in seed order (seed 1 first).
///
/// Byes are resolved immediately, so the returned bracket already has every
/// bye match final and its competitor advanced.
pub fn generate_bracket(players: &[Player], format: Format) -> Result<Bracket, BracketError> {
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    build(ids, format)
}

/// Structural variant of [`generate_bracket`] with deterministic placeholder ids,
/// so identical inputs always give identical graphs.
pub fn generate_bracket_for_count(count: usize, format: Format) -> Result<Bracket, BracketError> {
    let ids = (1..=count as u128).map(Uuid::from_u128).collect();
    build(ids, format)
}

fn build(seed_order: Vec<PlayerId>, format: Format) -> Result<Bracket, BracketError> {
    let count = seed_order.len();
    if count < 2 {
        return Err(BracketError::InvalidConfiguration(format!(
            "need at least 2 players, got {count}"
        )));
    }
    let size = bracket_size(count);
    let rounds = size.trailing_zeros();
    let double = format.has_losers_bracket();

    let mut matches = Vec::with_capacity(2 * size as usize);
    let positions = seed_positions(size);

    for round in 1..=rounds {
        for index in 1..=winners_matches_in_round(size, round) {
            let mut m = GameMatch::new(BracketSide::Winners, round, index);
            if round == 1 {
                let base = 2 * (index as usize - 1);
                m.slots = [
                    seed_slot(&seed_order, positions[base]),
                    seed_slot(&seed_order, positions[base + 1]),
                ];
            }
            m.winner_to = if round < rounds {
                Some(SlotRef::new(
                    BracketSide::Winners,
                    round + 1,
                    half_up(index),
                    pair_slot(index),
                ))
            } else if double {
                Some(SlotRef::new(BracketSide::GrandFinal, 1, 1, Side::A))
            } else {
                None
            };
            if double {
                m.loser_to = losers_destination(size, round, index);
            }
            matches.push(m);
        }
    }

    if double {
        let losers_rounds = 2 * (rounds - 1);
        for round in 1..=losers_rounds {
            for index in 1..=losers_matches_in_round(size, round) {
                let mut m = GameMatch::new(BracketSide::Losers, round, index);
                m.winner_to = Some(if round == losers_rounds {
                    SlotRef::new(BracketSide::GrandFinal, 1, 1, Side::B)
                } else if round % 2 == 1 {
                    SlotRef::new(BracketSide::Losers, round + 1, index, Side::B)
                } else {
                    SlotRef::new(BracketSide::Losers, round + 1, half_up(index), pair_slot(index))
                });
                matches.push(m);
            }
        }
        matches.push(GameMatch::new(BracketSide::GrandFinal, 1, 1));
        matches.push(GameMatch::new(BracketSide::GrandFinal, 2, 1));
    }

    let mut bracket = Bracket {
        format,
        size,
        seed_order,
        matches,
    };
    resolve_byes(&mut bracket);
    log::debug!(
        "Generated {:?} bracket: {} players, {} slots, {} matches",
        format,
        count,
        size,
        bracket.matches.len()
    );
    Ok(bracket)
}

fn seed_slot(seed_order: &[PlayerId], seed: u32) -> Slot {
    seed_order
        .get(seed as usize - 1)
        .map(|&id| Slot::Player(id))
        .unwrap_or(Slot::Bye)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_positions_follow_standard_layout() {
        assert_eq!(seed_positions(2), vec![1, 2]);
        assert_eq!(seed_positions(4), vec![1, 4, 2, 3]);
        assert_eq!(seed_positions(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
        let mut sixteen = seed_positions(16);
        sixteen.sort_unstable();
        assert_eq!(sixteen, (1..=16).collect::<Vec<_>>());
    }

    #[test]
    fn losers_round_sizes() {
        assert_eq!(losers_matches_in_round(8, 1), 2);
        assert_eq!(losers_matches_in_round(8, 2), 2);
        assert_eq!(losers_matches_in_round(8, 3), 1);
        assert_eq!(losers_matches_in_round(8, 4), 1);
        assert_eq!(losers_matches_in_round(16, 5), 1);
    }

    #[test]
    fn losers_destination_rejects_out_of_range() {
        assert_eq!(losers_destination(8, 0, 1), None);
        assert_eq!(losers_destination(8, 1, 5), None);
        assert_eq!(losers_destination(8, 4, 1), None);
        assert_eq!(losers_destination(6, 1, 1), None);
    }
}
