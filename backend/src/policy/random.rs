//! Random strategy
//!
//! Each task goes to a uniformly chosen worker. The generator belongs to the
//! strategy, seeded by the owning simulation, so a seeded run is reproducible.

use super::Assignment;
use crate::models::{Task, Worker};
use crate::rng::RngManager;

#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: RngManager,
}

impl RandomPolicy {
    pub fn new(rng: RngManager) -> Self {
        Self { rng }
    }

    pub(crate) fn assign(&mut self, workers: &[Worker], unassigned: &[&Task]) -> Vec<Assignment> {
        unassigned
            .iter()
            .map(|task| Assignment {
                task_id: task.id(),
                worker_id: workers[self.rng.index(workers.len())].id(),
            })
            .collect()
    }
}
