//! Worker model
//!
//! A worker processes every task assigned to it in parallel, one work unit
//! per task per step.
//!
//! # Critical Invariants
//!
//! 1. `current_load` equals the sum of `remaining` over its incomplete tasks
//! 2. `busy` is true iff at least one assigned task is incomplete
//! 3. `total_processed` never decreases

use serde::{Deserialize, Serialize};

/// A simulated worker
///
/// # Example
/// ```
/// use load_balancer_sim_core_rs::Worker;
///
/// let worker = Worker::new(2);
/// assert_eq!(worker.id(), 2);
/// assert!(!worker.is_busy());
/// assert_eq!(worker.current_load(), 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    id: usize,
    busy: bool,

    /// Remaining workload across assigned, incomplete tasks
    current_load: u64,

    /// Number of tasks this worker has completed
    total_processed: u64,

    /// Every task ever assigned here, in assignment order
    tasks: Vec<usize>,
}

impl Worker {
    /// Create an idle worker
    pub fn new(id: usize) -> Self {
        Self {
            id,
            busy: false,
            current_load: 0,
            total_processed: 0,
            tasks: Vec::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn current_load(&self) -> u64 {
        self.current_load
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    pub fn tasks(&self) -> &[usize] {
        &self.tasks
    }

    /// Take ownership of a newly assigned task
    pub(crate) fn accept(&mut self, task_id: usize, workload: u64) {
        self.tasks.push(task_id);
        self.current_load += workload;
        self.busy = true;
    }

    /// Account for one unit of work consumed from this worker's load
    pub(crate) fn consume_unit(&mut self) {
        debug_assert!(self.current_load > 0, "worker {} has no load", self.id);
        self.current_load -= 1;
    }

    pub(crate) fn record_completion(&mut self) {
        self.total_processed += 1;
    }

    /// Recompute `busy` after a step's processing
    pub(crate) fn refresh_busy(&mut self) {
        self.busy = self.current_load > 0;
    }
}
