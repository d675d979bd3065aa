//! xorshift64* random number generator
//!
//! Each `Simulation` owns its generators, so sessions running side by side
//! never contend on, or perturb, each other's sequence.
//!
//! # Determinism
//!
//! Same seed → same sequence. A seeded session replays identically:
//! same workloads, same random assignments, same metrics.

use serde::{Deserialize, Serialize};

/// Multiplier from the xorshift64* reference implementation.
const XORSHIFT_MULTIPLIER: u64 = 0x2545_F491_4F6C_DD1D;

/// Golden-ratio increment used to derive independent sub-streams.
const STREAM_INCREMENT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use load_balancer_sim_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let workload = rng.range(1, 11); // [1, 11)
/// assert!((1..11).contains(&workload));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new generator. A zero seed is remapped to 1 since xorshift
    /// never leaves the all-zero state.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Derive an independent generator for a named sub-stream.
    ///
    /// The derived seed is mixed through a splitmix64 finalizer, so
    /// `derive(0)` and `derive(1)` of the same parent diverge immediately.
    ///
    /// ```
    /// use load_balancer_sim_core_rs::RngManager;
    ///
    /// let root = RngManager::new(7);
    /// let mut a = root.derive(1);
    /// let mut b = root.derive(2);
    /// assert_ne!(a.next(), b.next());
    /// ```
    pub fn derive(&self, stream: u64) -> Self {
        let mut z = self
            .state
            .wrapping_add(STREAM_INCREMENT.wrapping_mul(stream.wrapping_add(1)));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        Self::new(z ^ (z >> 31))
    }

    /// Generate the next raw 64-bit value.
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(XORSHIFT_MULTIPLIER)
    }

    /// Generate a value in `[min, max)`.
    ///
    /// # Panics
    /// Panics if `min >= max`.
    pub fn range(&mut self, min: u64, max: u64) -> u64 {
        assert!(min < max, "min must be less than max");
        min + self.next() % (max - min)
    }

    /// Pick an index in `[0, len)`.
    ///
    /// # Panics
    /// Panics if `len == 0`.
    pub fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot pick from an empty set");
        (self.next() % len as u64) as usize
    }

    /// Generate an f64 in `[0.0, 1.0)` from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next() >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }
}
