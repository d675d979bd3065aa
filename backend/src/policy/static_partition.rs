//! Static partitioning strategy
//!
//! Task ids are split into contiguous blocks of `ceil(num_tasks / num_workers)`
//! and block `k` goes to worker `k`. Any overflow lands on the last worker.

use super::Assignment;
use crate::models::{Task, Worker};

#[derive(Debug, Clone)]
pub struct StaticPartitionPolicy {
    tasks_per_worker: usize,
}

impl StaticPartitionPolicy {
    pub fn new(num_workers: usize, num_tasks: usize) -> Self {
        let num_workers = num_workers.max(1);
        Self {
            tasks_per_worker: num_tasks.div_ceil(num_workers).max(1),
        }
    }

    pub fn tasks_per_worker(&self) -> usize {
        self.tasks_per_worker
    }

    pub(crate) fn assign(&mut self, workers: &[Worker], unassigned: &[&Task]) -> Vec<Assignment> {
        unassigned
            .iter()
            .map(|task| {
                let index = (task.id() / self.tasks_per_worker).min(workers.len() - 1);
                Assignment {
                    task_id: task.id(),
                    worker_id: workers[index].id(),
                }
            })
            .collect()
    }
}
