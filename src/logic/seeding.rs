//! Seeding: order players for bracket placement.

use crate::models::Player;
use std::cmp::Ordering;

/// Sort by points (desc), then MMR (desc), then name, and number seeds from 1.
pub fn apply_seeding(players: &mut [Player]) {
    players.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then_with(|| b.mmr.cmp(&a.mmr))
            .then_with(|| compare_names(&a.name, &b.name))
    });
    for (idx, p) in players.iter_mut().enumerate() {
        p.seed = Some(idx as u32 + 1);
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
