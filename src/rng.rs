//! Deterministic random streams.
//!
//! Every stream is derived from a string identity (a planet id, a moon key),
//! so generation depends only on *what* is being generated, never on call
//! order or wall-clock time.

use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng, SeedableRng,
};
use rand_chacha::ChaCha8Rng;

const LCG_MUL: u64 = 6364136223846793005;
const LCG_INC: u64 = 1442695040888963407;

/// Seed for a string identity: FNV-1a folded through two LCG rounds.
pub fn seed_for_identity(master_seed: u64, identity: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in identity.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    let mut seed = master_seed;
    seed = seed.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
    seed ^= hash;
    seed = seed.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
    seed
}

/// A fresh generator for one identity.
pub fn identity_rng(master_seed: u64, identity: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed_for_identity(master_seed, identity))
}

pub trait RngExt {
    /// Uniform value in `[min, max)`; returns `min` for an empty range.
    fn jitter(&mut self, min: f64, max: f64) -> f64;
    /// Index into `weights` chosen proportionally. Non-positive weights are
    /// never picked unless every weight is non-positive.
    fn weighted_index(&mut self, weights: &[f64]) -> usize;
}

impl<R: Rng> RngExt for R {
    fn jitter(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.gen_range(min..max)
    }

    fn weighted_index(&mut self, weights: &[f64]) -> usize {
        match WeightedIndex::new(weights.iter().map(|w| w.max(0.0))) {
            Ok(dist) => dist.sample(self),
            Err(_) => 0,
        }
    }
}
