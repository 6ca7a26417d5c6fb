//! Deterministic simulation RNG.
//!
//! Wraps `ChaCha8Rng` so identical seeds produce identical trajectories.
//! Each simulation owns one; nothing draws from a process-wide source.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone)]
pub struct SimRng(pub ChaCha8Rng);

impl Default for SimRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl SimRng {
    /// Create a new `SimRng` seeded from the given `u64` value.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Seed for run `index` of a batch started from `base`.
///
/// splitmix64 of the pair, so neighbouring indices get unrelated streams.
pub fn derive_seed(base: u64, index: u64) -> u64 {
    let mut x = base ^ index.wrapping_mul(0x9e3779b97f4a7c15);
    x = x.wrapping_add(0x9e3779b97f4a7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}
