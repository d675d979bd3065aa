//! Task model
//!
//! A unit of work with a fixed workload. Lifecycle:
//!
//! ```text
//! Unassigned ──assign()──▶ Assigned ──(remaining hits 0)──▶ Completed
//! ```
//!
//! There is no other transition. In particular a task is never reassigned:
//! the strategy's choice is final.

use serde::{Deserialize, Serialize};

/// Where a task is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Waiting for the strategy to pick a worker
    Unassigned,
    /// Owned by a worker, workload still remaining
    Assigned,
    /// Workload fully consumed
    Completed,
}

/// A schedulable task
///
/// # Example
/// ```
/// use load_balancer_sim_core_rs::{Task, TaskStatus};
///
/// let task = Task::new(0, 5);
/// assert_eq!(task.workload(), 5);
/// assert_eq!(task.status(), TaskStatus::Unassigned);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    id: usize,

    /// Total work units required (positive, fixed at creation)
    workload: u64,

    /// Work units not yet consumed
    remaining: u64,

    worker_id: Option<usize>,

    /// Step at which the task was assigned
    start_time: Option<usize>,

    /// Step at which the remaining workload reached zero
    end_time: Option<usize>,
}

impl Task {
    /// Create an unassigned task
    ///
    /// # Panics
    /// Panics if `workload == 0`.
    pub fn new(id: usize, workload: u64) -> Self {
        assert!(workload > 0, "workload must be positive");
        Self {
            id,
            workload,
            remaining: workload,
            worker_id: None,
            start_time: None,
            end_time: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn workload(&self) -> u64 {
        self.workload
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn worker_id(&self) -> Option<usize> {
        self.worker_id
    }

    pub fn start_time(&self) -> Option<usize> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<usize> {
        self.end_time
    }

    pub fn is_assigned(&self) -> bool {
        self.worker_id.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn status(&self) -> TaskStatus {
        match (self.worker_id, self.end_time) {
            (None, _) => TaskStatus::Unassigned,
            (Some(_), None) => TaskStatus::Assigned,
            (Some(_), Some(_)) => TaskStatus::Completed,
        }
    }

    /// Steps between assignment and completion, once completed
    pub fn completion_time(&self) -> Option<usize> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Hand the task to a worker at the given step
    ///
    /// # Panics
    /// Panics if the task is already assigned.
    pub(crate) fn assign(&mut self, worker_id: usize, step: usize) {
        assert!(
            self.worker_id.is_none(),
            "task {} already assigned to worker {:?}",
            self.id,
            self.worker_id
        );
        self.worker_id = Some(worker_id);
        self.start_time = Some(step);
    }

    /// Consume one unit of work during `step`
    ///
    /// Returns `true` if this unit completed the task.
    pub(crate) fn consume_unit(&mut self, step: usize) -> bool {
        debug_assert!(self.is_assigned(), "task {} processed while unassigned", self.id);
        debug_assert!(!self.is_completed(), "task {} processed after completion", self.id);

        self.remaining -= 1;
        if self.remaining == 0 {
            self.end_time = Some(step);
            true
        } else {
            false
        }
    }
}
