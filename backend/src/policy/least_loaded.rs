//! Least-loaded strategy
//!
//! Each task (in id order) goes to the worker with the smallest remaining
//! workload; ties go to the lowest worker id. Loads are bumped as tasks are
//! placed, so one step's batch spreads out instead of piling onto a single
//! idle worker.

use super::Assignment;
use crate::models::{Task, Worker};

#[derive(Debug, Clone, Copy, Default)]
pub struct LeastLoadedPolicy;

impl LeastLoadedPolicy {
    pub(crate) fn assign(&mut self, workers: &[Worker], unassigned: &[&Task]) -> Vec<Assignment> {
        let mut loads: Vec<u64> = workers.iter().map(Worker::current_load).collect();

        unassigned
            .iter()
            .map(|task| {
                // min_by_key keeps the first minimum, i.e. the lowest index
                let (index, _) = loads
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, load)| **load)
                    .unwrap_or((0, &0));
                loads[index] += task.workload();
                Assignment {
                    task_id: task.id(),
                    worker_id: workers[index].id(),
                }
            })
            .collect()
    }
}
