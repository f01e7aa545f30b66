//! Randomness seam: the generator and random placer only ever touch this
//! trait, never `rand` directly, so tests can substitute a deterministic
//! source.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// A source of randomness for puzzle generation.
pub trait PuzzleRng {
    /// A uniform random integer in `0..bound`. `bound` is always > 0.
    fn upto(&mut self, bound: usize) -> usize;

    /// Shuffle `slice` in place.
    fn shuffle<T>(&mut self, slice: &mut [T]);
}

/// The default [`PuzzleRng`], backed by `rand`'s `StdRng`.
pub struct StdPuzzleRng(StdRng);

impl StdPuzzleRng {
    pub fn from_seed(seed: u64) -> Self {
        StdPuzzleRng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        StdPuzzleRng(StdRng::from_entropy())
    }
}

impl PuzzleRng for StdPuzzleRng {
    fn upto(&mut self, bound: usize) -> usize {
        self.0.gen_range(0..bound)
    }

    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = StdPuzzleRng::from_seed(42);
        let mut b = StdPuzzleRng::from_seed(42);
        let seq_a: Vec<usize> = (0..20).map(|_| a.upto(100)).collect();
        let seq_b: Vec<usize> = (0..20).map(|_| b.upto(100)).collect();
        assert_eq!(seq_a, seq_b);
    }
}
