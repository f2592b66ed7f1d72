//! Injectable randomness for variant synthesis.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform reals and discrete choices.
pub trait RandomSource: Send {
    /// Uniform real in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform real in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        let scaled = (self.next_f64() * len as f64) as usize;
        scaled.min(len.saturating_sub(1))
    }
}

/// Pick one element of a non-empty slice.
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> &'a T {
    &items[rng.index(items.len())]
}

/// Thread-local, OS-seeded generator. A fresh handle is taken per draw.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Deterministic generator for reproducible runs (`--seed`) and tests.
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.0.random::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len.max(1))
    }
}
