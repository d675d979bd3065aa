//! Snapshots - read-only copies of simulation state
//!
//! Nothing outside a `Simulation` ever holds a reference into its workers or
//! tasks. Callers receive these owned copies instead, so session state cannot
//! be mutated between requests except through `step()`.
//!
//! Field names are the ones the dashboard reads (`current_step`,
//! `completed_tasks`, `workers[]`, `tasks[]`).

use crate::metrics::Metrics;
use crate::models::{Task, Worker};
use serde::{Deserialize, Serialize};

/// Complete state at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub current_step: usize,
    pub completed_tasks: usize,
    pub workers: Vec<WorkerSnapshot>,
    pub tasks: Vec<TaskSnapshot>,
}

impl StateSnapshot {
    pub(crate) fn capture(
        current_step: usize,
        completed_tasks: usize,
        workers: &[Worker],
        tasks: &[Task],
    ) -> Self {
        Self {
            current_step,
            completed_tasks,
            workers: workers.iter().map(WorkerSnapshot::from).collect(),
            tasks: tasks.iter().map(TaskSnapshot::from).collect(),
        }
    }

    pub fn total_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_complete(&self) -> bool {
        self.completed_tasks == self.tasks.len()
    }
}

/// Worker state snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    pub id: usize,
    pub busy: bool,
    pub current_load: u64,
    pub total_processed: u64,
    pub tasks: Vec<usize>,
}

impl From<&Worker> for WorkerSnapshot {
    fn from(worker: &Worker) -> Self {
        WorkerSnapshot {
            id: worker.id(),
            busy: worker.is_busy(),
            current_load: worker.current_load(),
            total_processed: worker.total_processed(),
            tasks: worker.tasks().to_vec(),
        }
    }
}

/// Task state snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: usize,
    pub workload: u64,
    pub assigned: bool,
    pub worker_id: Option<usize>,
    pub start_time: Option<usize>,
    pub end_time: Option<usize>,
}

impl From<&Task> for TaskSnapshot {
    fn from(task: &Task) -> Self {
        TaskSnapshot {
            id: task.id(),
            workload: task.workload(),
            assigned: task.is_assigned(),
            worker_id: task.worker_id(),
            start_time: task.start_time(),
            end_time: task.end_time(),
        }
    }
}

/// Result of one `step()` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub state: StateSnapshot,

    /// True once every task has completed
    pub complete: bool,

    /// Present once `complete` is true
    pub metrics: Option<Metrics>,
}
