//! Orchestrator - the per-session simulation loop
//!
//! See `engine.rs` for the step loop and `snapshot.rs` for the read-only
//! views handed out to callers.

pub mod engine;
pub mod snapshot;

// Re-export main types for convenience
pub use engine::{
    Simulation, SimulationConfig, SimulationError, SimulationStatus, MAX_TASKS, MAX_WORKERS,
};
pub use snapshot::{StateSnapshot, StepOutcome, TaskSnapshot, WorkerSnapshot};
