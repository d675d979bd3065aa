//! Round-robin strategy
//!
//! Each task goes to the next worker in cyclic id order. Load is ignored.
//! The cursor survives across steps, so tasks arriving later continue the
//! cycle where it stopped.

use super::Assignment;
use crate::models::{Task, Worker};

#[derive(Debug, Clone, Default)]
pub struct RoundRobinPolicy {
    /// Index into the worker list of the next worker to receive a task
    cursor: usize,
}

impl RoundRobinPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn assign(&mut self, workers: &[Worker], unassigned: &[&Task]) -> Vec<Assignment> {
        unassigned
            .iter()
            .map(|task| {
                let worker = &workers[self.cursor % workers.len()];
                self.cursor = (self.cursor + 1) % workers.len();
                Assignment {
                    task_id: task.id(),
                    worker_id: worker.id(),
                }
            })
            .collect()
    }
}
