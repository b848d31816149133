use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::{Mutex, PoisonError};

/// Source of randomness for the weekly draw.
///
/// The executor only asks for a uniformly random permutation of entrant
/// positions; taking a prefix of it is sampling without replacement.
pub trait EntrantShuffler: Send + Sync {
    fn shuffle(&self, order: &mut [usize]);
}

/// Thread-local PRNG, used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngShuffler;

impl EntrantShuffler for ThreadRngShuffler {
    fn shuffle(&self, order: &mut [usize]) {
        order.shuffle(&mut rand::rng());
    }
}

/// Fixed-seed generator for reproducible draws.
#[derive(Debug)]
pub struct SeededShuffler {
    rng: Mutex<StdRng>,
}

impl SeededShuffler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl EntrantShuffler for SeededShuffler {
    fn shuffle(&self, order: &mut [usize]) {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        order.shuffle(&mut *rng);
    }
}

/// Split entrants into (winners, reserves).
///
/// Up to `winner_slots` entrants become winners; up to `reserve_slots` of
/// the rest become reserves. Whoever is left over is dropped.
pub fn split_draw<T>(
    entrants: Vec<T>,
    shuffler: &dyn EntrantShuffler,
    winner_slots: usize,
    reserve_slots: usize,
) -> (Vec<T>, Vec<T>) {
    let mut order: Vec<usize> = (0..entrants.len()).collect();
    shuffler.shuffle(&mut order);

    let mut slots: Vec<Option<T>> = entrants.into_iter().map(Some).collect();
    let mut drawn: Vec<T> = order
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .take(winner_slots + reserve_slots)
        .collect();

    let reserves = drawn.split_off(winner_slots.min(drawn.len()));
    (drawn, reserves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_split_twenty_entrants() {
        let entrants: Vec<u32> = (0..20).collect();
        let (winners, reserves) = split_draw(entrants, &ThreadRngShuffler, 15, 10);
        assert_eq!(winners.len(), 15);
        assert_eq!(reserves.len(), 5);

        let all: HashSet<u32> = winners.iter().chain(reserves.iter()).copied().collect();
        assert_eq!(all.len(), 20);
    }

    #[test]
    fn test_split_fewer_than_winner_slots() {
        let (winners, reserves) = split_draw(vec!["a", "b", "c"], &ThreadRngShuffler, 15, 10);
        assert_eq!(winners.len(), 3);
        assert!(reserves.is_empty());
    }

    #[test]
    fn test_split_drops_overflow() {
        let entrants: Vec<u32> = (0..40).collect();
        let (winners, reserves) = split_draw(entrants, &ThreadRngShuffler, 15, 10);
        assert_eq!(winners.len(), 15);
        assert_eq!(reserves.len(), 10);
        let winner_set: HashSet<u32> = winners.into_iter().collect();
        assert!(reserves.iter().all(|r| !winner_set.contains(r)));
    }

    #[test]
    fn test_split_empty() {
        let (winners, reserves) = split_draw(Vec::<u32>::new(), &ThreadRngShuffler, 15, 10);
        assert!(winners.is_empty());
        assert!(reserves.is_empty());
    }

    #[test]
    fn test_seeded_shuffler_is_reproducible() {
        let entrants: Vec<u32> = (0..30).collect();
        let first = split_draw(entrants.clone(), &SeededShuffler::new(7), 15, 10);
        let second = split_draw(entrants, &SeededShuffler::new(7), 15, 10);
        assert_eq!(first, second);
    }
}
