//! Deterministic random number generation
//!
//! Uses xorshift64* for fast, reproducible randomness.
//! Every source of randomness in a simulation (workload sizes, random
//! assignment) MUST come from an `RngManager` owned by that simulation.

mod xorshift;

pub use xorshift::RngManager;
