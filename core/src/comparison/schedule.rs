// Multileave is an open source engine for online evaluation of ranking functions.
// Copyright (C) 2026 the Multileave authors
//
// This code is licensed under the GNU Affero General Public License.

use rand::seq::SliceRandom;
use rand::Rng;

/// Endless draw schedule over `n` ranker indices.
///
/// Draws come from a bag holding one copy of each index. Whenever the bag
/// empties it is refilled with a freshly shuffled permutation, so within any
/// full cycle of `n` draws every ranker is scheduled exactly once. This is
/// deliberately not i.i.d. sampling; the per-cycle coverage is what makes the
/// multileaved list fair to all rankers.
pub struct PermutationCycle<'a, R: Rng + ?Sized> {
    n: usize,
    pool: Vec<usize>,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> PermutationCycle<'a, R> {
    pub fn new(n: usize, rng: &'a mut R) -> Self {
        Self {
            n,
            pool: Vec::with_capacity(n),
            rng,
        }
    }
}

impl<R: Rng + ?Sized> Iterator for PermutationCycle<'_, R> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.n == 0 {
            return None;
        }

        if self.pool.is_empty() {
            self.pool.extend(0..self.n);
            self.pool.shuffle(&mut *self.rng);
        }

        self.pool.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn empty_cycle_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut cycle = PermutationCycle::new(0, &mut rng);
        assert_eq!(cycle.next(), None);
    }

    #[test]
    fn each_cycle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let draws: Vec<usize> = PermutationCycle::new(5, &mut rng).take(20).collect();

        for cycle in draws.chunks(5) {
            let mut sorted = cycle.to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn single_ranker_is_always_scheduled() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws: Vec<usize> = PermutationCycle::new(1, &mut rng).take(4).collect();
        assert_eq!(draws, vec![0, 0, 0, 0]);
    }
}
