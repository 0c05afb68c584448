//! Deterministic random number generation.
//!
//! RULE: Nothing in the crate may call any platform RNG.
//! Sampling takes its randomness as an explicit `RandomSource`
//! parameter, so any draw sequence can be reproduced or scripted.
//!
//! Each stream is seeded deterministically from
//! (master_seed XOR stream_index * golden-ratio constant). This means:
//!   - Adding a new stream never changes existing streams.
//!   - Each stream is fully reproducible in isolation.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A source of uniform floats in `[0.0, 1.0)`.
///
/// Dice draw through this trait. Tests swap in scripted sources.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// A deterministic RNG stream.
pub struct RollRng {
    inner: Pcg64Mcg,
}

impl RollRng {
    /// Create a stream from the master seed and a stable stream index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }
}

impl RandomSource for RollRng {
    /// 53 high bits of a u64, scaled into [0.0, 1.0).
    fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Hands out streams derived from a single master seed.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Stream `index` of this bank. Index 0 is the default play stream.
    pub fn for_stream(&self, index: u64) -> RollRng {
        RollRng::new(self.master_seed, index)
    }
}

pub const PLAY_STREAM: u64 = 0;

/// Replays a fixed list of uniform draws, cycling when exhausted.
///
/// Used to reproduce a known table exactly, e.g. in tests.
pub struct ScriptedSource {
    draws: Vec<f64>,
    next:  usize,
}

impl ScriptedSource {
    /// Every draw must lie in [0.0, 1.0) and the list must not be empty.
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "scripted source needs at least one draw");
        assert!(
            draws.iter().all(|u| (0.0..1.0).contains(u)),
            "scripted draws must lie in [0, 1)"
        );
        Self { draws, next: 0 }
    }

    /// Draws that land inside face `k` (0-based) of an evenly weighted
    /// die with `sides` faces.
    pub fn for_fair_faces(sides: usize, picks: &[usize]) -> Self {
        let draws = picks
            .iter()
            .map(|&k| (k as f64 + 0.5) / sides as f64)
            .collect();
        Self::new(draws)
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        let u = self.draws[self.next];
        self.next = (self.next + 1) % self.draws.len();
        u
    }
}
