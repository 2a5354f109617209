use contest_core::ActorId;
use rand::seq::IndexedRandom;
use std::collections::HashSet;

/// Draw up to `count` winners uniformly without replacement from the entrant
/// set. Every entrant is equally likely; the returned order carries no
/// meaning. Fewer entrants than requested winners means everyone wins, and an
/// empty set yields no winners.
///
/// Uses the OS-seeded thread rng so draws are unpredictable across calls.
pub fn draw_winners(entrants: &HashSet<ActorId>, count: u32) -> Vec<ActorId> {
    let k = (count as usize).min(entrants.len());
    if k == 0 {
        return Vec::new();
    }

    let pool: Vec<ActorId> = entrants.iter().copied().collect();
    pool.choose_multiple(&mut rand::rng(), k).copied().collect()
}
