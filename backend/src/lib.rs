//! Load Balancer Simulator Core - Rust Engine
//!
//! Discrete-step task-scheduling simulator with per-session state and
//! deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Step clock
//! - **models**: Domain types (Worker, Task)
//! - **workload**: Task workload generation
//! - **policy**: Assignment strategies (round-robin, least-loaded, random, static)
//! - **orchestrator**: Per-session step loop and snapshots
//! - **metrics**: Summary metrics for a completed run
//! - **session**: Concurrency-safe registry of live sessions
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded RNG owned by each simulation)
//! 2. A task is assigned at most once and never reassigned
//! 3. Session state never escapes the registry except as owned snapshots

// Module declarations
pub mod core;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod rng;
pub mod session;
pub mod workload;

// Re-exports for convenience
pub use crate::core::time::StepClock;
pub use metrics::{Metrics, MetricsCalculator};
pub use models::{Task, TaskStatus, Worker};
pub use orchestrator::{
    Simulation, SimulationConfig, SimulationError, SimulationStatus, StateSnapshot, StepOutcome,
    TaskSnapshot, WorkerSnapshot, MAX_TASKS, MAX_WORKERS,
};
pub use policy::{Assignment, Strategy, StrategyKind};
pub use rng::RngManager;
pub use session::{CreateRequest, CreateResponse, SessionId, SessionRegistry};
pub use workload::{WorkloadDistribution, WorkloadGenerator, MAX_WORKLOAD};
