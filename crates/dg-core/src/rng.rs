//! Seeded random source for generation
//!
//! The grid owns one `GenRng` and every strategy draws from it in a fixed
//! order, so the same seed and settings give the same level.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// ChaCha8 stream that remembers its seed
#[derive(Debug, Clone)]
pub struct GenRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GenRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from the thread RNG; the chosen seed is still reported by `seed()`
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform in `0..n`; 0 when `n` is 0
    pub fn rn2(&mut self, n: u32) -> u32 {
        match n {
            0 => 0,
            _ => self.rng.gen_range(0..n),
        }
    }

    /// Uniform in `lo..=hi`; `lo` when the range is empty or a single value
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Uniformly picked element, `None` for an empty slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let len = u32::try_from(items.len()).ok()?;
        items.get(self.rn2(len) as usize).filter(|_| len > 0)
    }
}
