//! Simulation Engine
//!
//! Owns one session's workers, tasks, strategy and clock, and advances them
//! one step at a time.
//!
//! # Architecture
//!
//! ```text
//! For each step s:
//! 1. Return early if every task is already complete
//! 2. Ask the strategy to place every unassigned task (start_time = s)
//! 3. Each busy worker consumes one unit from each of its incomplete tasks;
//!    a task reaching zero gets end_time = s
//! 4. Advance the clock to s + 1
//! 5. If the last task just completed, compute and cache metrics
//! ```
//!
//! # Example
//!
//! ```rust
//! use load_balancer_sim_core_rs::orchestrator::{Simulation, SimulationConfig};
//! use load_balancer_sim_core_rs::policy::StrategyKind;
//! use load_balancer_sim_core_rs::workload::WorkloadDistribution;
//!
//! let config = SimulationConfig {
//!     num_workers: 2,
//!     num_tasks: 2,
//!     strategy: StrategyKind::RoundRobin,
//!     rng_seed: 12345,
//!     workload: WorkloadDistribution::Fixed { units: 1 },
//! };
//!
//! let mut sim = Simulation::new(config).unwrap();
//! let outcome = sim.step();
//!
//! assert!(outcome.complete);
//! assert_eq!(outcome.metrics.unwrap().total_time, 1);
//! ```

use crate::core::time::StepClock;
use crate::metrics::{Metrics, MetricsCalculator};
use crate::models::{Task, Worker};
use crate::orchestrator::snapshot::{StateSnapshot, StepOutcome};
use crate::policy::{Assignment, Strategy, StrategyKind};
use crate::rng::RngManager;
use crate::workload::{WorkloadDistribution, WorkloadGenerator, MAX_WORKLOAD};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};

/// Largest worker count a simulation accepts
pub const MAX_WORKERS: usize = 1_024;

/// Largest task count a simulation accepts
pub const MAX_TASKS: usize = 100_000;

/// RNG sub-stream for task workloads
const WORKLOAD_STREAM: u64 = 0;

/// RNG sub-stream for the random strategy
const STRATEGY_STREAM: u64 = 1;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of workers (ids `0..num_workers`)
    pub num_workers: usize,

    /// Number of tasks (ids `0..num_tasks`)
    pub num_tasks: usize,

    /// Assignment strategy
    pub strategy: StrategyKind,

    /// Seed for workload generation and random assignment
    pub rng_seed: u64,

    /// Distribution task workloads are drawn from
    #[serde(default)]
    pub workload: WorkloadDistribution,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_workers: 4,
            num_tasks: 20,
            strategy: StrategyKind::RoundRobin,
            rng_seed: 42,
            workload: WorkloadDistribution::default(),
        }
    }
}

impl SimulationConfig {
    /// Check that the configuration describes a runnable simulation.
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.validate_counts()?;
        self.workload.validate()
    }

    fn validate_counts(&self) -> Result<(), SimulationError> {
        if !(1..=MAX_WORKERS).contains(&self.num_workers) {
            return Err(SimulationError::InvalidConfig(format!(
                "num_workers must be in 1..={} (got {})",
                MAX_WORKERS, self.num_workers
            )));
        }

        if !(1..=MAX_TASKS).contains(&self.num_tasks) {
            return Err(SimulationError::InvalidConfig(format!(
                "num_tasks must be in 1..={} (got {})",
                MAX_TASKS, self.num_tasks
            )));
        }

        Ok(())
    }
}

/// Simulation error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// Creation parameters rejected before any state was built
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// No live session under this id (never created, or reset)
    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

/// Lifecycle of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationStatus {
    /// At least one task still has workload remaining
    Running,
    /// Every task completed; further steps are no-ops
    Complete,
}

// ============================================================================
// Simulation
// ============================================================================

/// One session's simulation state
///
/// # Determinism
///
/// Workloads and random assignments come from generators derived from
/// `rng_seed`. Same config = identical run.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,

    /// Indexed by worker id
    workers: Vec<Worker>,

    /// Indexed by task id
    tasks: Vec<Task>,

    strategy: Strategy,

    clock: StepClock,

    completed_tasks: usize,

    /// Set exactly once, at the step that completes the last task
    metrics: Option<Metrics>,
}

impl Simulation {
    /// Create a simulation, drawing task workloads from `config.workload`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration fails validation.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let root = RngManager::new(config.rng_seed);
        let mut workload_rng = root.derive(WORKLOAD_STREAM);
        let tasks = WorkloadGenerator::new(config.workload.clone())
            .generate(config.num_tasks, &mut workload_rng);

        Ok(Self::build(config, tasks, root))
    }

    /// Create a simulation over caller-provided tasks.
    ///
    /// `config.workload` is ignored. Tasks must be unassigned and carry ids
    /// `0..config.num_tasks` in order.
    pub fn with_tasks(config: SimulationConfig, tasks: Vec<Task>) -> Result<Self, SimulationError> {
        config.validate_counts()?;

        if tasks.len() != config.num_tasks {
            return Err(SimulationError::InvalidConfig(format!(
                "expected {} tasks, got {}",
                config.num_tasks,
                tasks.len()
            )));
        }

        for (index, task) in tasks.iter().enumerate() {
            if task.id() != index || task.is_assigned() {
                return Err(SimulationError::InvalidConfig(format!(
                    "task at position {} must be unassigned with id {}",
                    index, index
                )));
            }
            if task.workload() > MAX_WORKLOAD {
                return Err(SimulationError::InvalidConfig(format!(
                    "task {} workload {} exceeds {}",
                    index,
                    task.workload(),
                    MAX_WORKLOAD
                )));
            }
        }

        let root = RngManager::new(config.rng_seed);
        Ok(Self::build(config, tasks, root))
    }

    fn build(config: SimulationConfig, tasks: Vec<Task>, root: RngManager) -> Self {
        let workers = (0..config.num_workers).map(Worker::new).collect();
        let strategy = Strategy::new(
            config.strategy,
            config.num_workers,
            config.num_tasks,
            root.derive(STRATEGY_STREAM),
        );

        debug!(
            num_workers = config.num_workers,
            num_tasks = config.num_tasks,
            strategy = %config.strategy,
            rng_seed = config.rng_seed,
            "simulation created"
        );

        Self {
            config,
            workers,
            tasks,
            strategy,
            clock: StepClock::new(),
            completed_tasks: 0,
            metrics: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn current_step(&self) -> usize {
        self.clock.current_step()
    }

    pub fn completed_tasks(&self) -> usize {
        self.completed_tasks
    }

    pub fn total_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Cached metrics, present once the simulation is complete
    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.completed_tasks == self.tasks.len()
    }

    pub fn status(&self) -> SimulationStatus {
        if self.is_complete() {
            SimulationStatus::Complete
        } else {
            SimulationStatus::Running
        }
    }

    /// Read-only copy of the current state
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(self.current_step(), self.completed_tasks, &self.workers, &self.tasks)
    }

    /// Snapshot plus completion flag and cached metrics
    pub fn outcome(&self) -> StepOutcome {
        StepOutcome {
            state: self.snapshot(),
            complete: self.is_complete(),
            metrics: self.metrics.clone(),
        }
    }

    // ========================================================================
    // Step Loop
    // ========================================================================

    /// Advance the simulation by one step.
    ///
    /// Once complete, this is a no-op returning the same outcome.
    pub fn step(&mut self) -> StepOutcome {
        if self.is_complete() {
            return self.outcome();
        }

        let step = self.clock.current_step();

        let assignments = {
            let unassigned: Vec<&Task> = self.tasks.iter().filter(|t| !t.is_assigned()).collect();
            self.strategy.assign(&self.workers, &unassigned)
        };
        let num_assigned = assignments.len();
        self.apply_assignments(step, assignments);

        let num_completed = self.process_workers(step);
        self.completed_tasks += num_completed;
        assert!(
            self.completed_tasks <= self.tasks.len(),
            "completed {} of {} tasks",
            self.completed_tasks,
            self.tasks.len()
        );

        self.clock.advance();

        trace!(
            step,
            assigned = num_assigned,
            completed = num_completed,
            completed_total = self.completed_tasks,
            "step processed"
        );

        if self.is_complete() {
            let metrics =
                MetricsCalculator::calculate(&self.workers, &self.tasks, self.clock.current_step());
            info!(
                total_time = metrics.total_time,
                avg_completion = metrics.avg_completion,
                load_imbalance = metrics.load_imbalance,
                efficiency = metrics.efficiency,
                strategy = %self.config.strategy,
                "simulation complete"
            );
            self.metrics = Some(metrics);
        }

        self.outcome()
    }

    fn apply_assignments(&mut self, step: usize, assignments: Vec<Assignment>) {
        for Assignment { task_id, worker_id } in assignments {
            let task = &mut self.tasks[task_id];
            task.assign(worker_id, step);
            self.workers[worker_id].accept(task_id, task.workload());
        }
    }

    /// Consume one unit from every incomplete task on every busy worker.
    ///
    /// Returns the number of tasks that completed during `step`.
    fn process_workers(&mut self, step: usize) -> usize {
        let mut num_completed = 0;

        for worker in &mut self.workers {
            if worker.current_load() == 0 {
                continue;
            }

            for index in 0..worker.tasks().len() {
                let task = &mut self.tasks[worker.tasks()[index]];
                if task.is_completed() {
                    continue;
                }

                worker.consume_unit();
                if task.consume_unit(step) {
                    worker.record_completion();
                    num_completed += 1;
                }
            }

            worker.refresh_busy();
        }

        num_completed
    }
}
