//! Assignment Strategy Module
//!
//! Decides which worker receives each unassigned task.
//!
//! # Overview
//!
//! Once per step, before any work is processed, the simulation hands the
//! strategy the current workers and every task still waiting for a worker.
//! The strategy answers with a list of `(task, worker)` pairings. Pairings are
//! final: an assigned task stays with its worker until it completes.
//!
//! Available strategies:
//! 1. **RoundRobin**: cycle through workers in id order, ignoring load
//! 2. **LeastLoaded**: pick the worker with the least remaining workload
//! 3. **Random**: pick uniformly, from the simulation's seeded RNG
//! 4. **Static**: contiguous blocks of task ids per worker
//!
//! The set is closed, so dispatch is an exhaustive `match` over `Strategy`.
//! Any state a strategy carries (round-robin cursor, RNG) is owned by the
//! strategy itself and therefore by one simulation only.
//!
//! # Example
//!
//! ```rust
//! use load_balancer_sim_core_rs::policy::{Strategy, StrategyKind};
//! use load_balancer_sim_core_rs::{RngManager, Task, Worker};
//!
//! let workers: Vec<Worker> = (0..3).map(Worker::new).collect();
//! let tasks: Vec<Task> = (0..5).map(|id| Task::new(id, 1)).collect();
//! let unassigned: Vec<&Task> = tasks.iter().collect();
//!
//! let mut strategy = Strategy::new(StrategyKind::RoundRobin, 3, 5, RngManager::new(1));
//! let workers_chosen: Vec<usize> = strategy
//!     .assign(&workers, &unassigned)
//!     .iter()
//!     .map(|a| a.worker_id)
//!     .collect();
//! assert_eq!(workers_chosen, vec![0, 1, 2, 0, 1]);
//! ```

use crate::models::{Task, Worker};
use crate::rng::RngManager;
use crate::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod least_loaded;
mod random;
mod round_robin;
mod static_partition;

pub use least_loaded::LeastLoadedPolicy;
pub use random::RandomPolicy;
pub use round_robin::RoundRobinPolicy;
pub use static_partition::StaticPartitionPolicy;

/// One strategy decision: `task_id` goes to `worker_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub task_id: usize,
    pub worker_id: usize,
}

/// Strategy selector, as named on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    RoundRobin,
    LeastLoaded,
    Random,
    Static,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::RoundRobin,
        StrategyKind::LeastLoaded,
        StrategyKind::Random,
        StrategyKind::Static,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::RoundRobin => "round-robin",
            StrategyKind::LeastLoaded => "least-loaded",
            StrategyKind::Random => "random",
            StrategyKind::Static => "static",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SimulationError::InvalidConfig(format!("unknown strategy: {:?}", s)))
    }
}

/// A live strategy instance owned by one simulation
#[derive(Debug, Clone)]
pub enum Strategy {
    RoundRobin(RoundRobinPolicy),
    LeastLoaded(LeastLoadedPolicy),
    Random(RandomPolicy),
    Static(StaticPartitionPolicy),
}

impl Strategy {
    /// Build the strategy for a simulation of the given size.
    ///
    /// `rng` is consumed by the random strategy and ignored by the others.
    pub fn new(kind: StrategyKind, num_workers: usize, num_tasks: usize, rng: RngManager) -> Self {
        match kind {
            StrategyKind::RoundRobin => Strategy::RoundRobin(RoundRobinPolicy::new()),
            StrategyKind::LeastLoaded => Strategy::LeastLoaded(LeastLoadedPolicy),
            StrategyKind::Random => Strategy::Random(RandomPolicy::new(rng)),
            StrategyKind::Static => {
                Strategy::Static(StaticPartitionPolicy::new(num_workers, num_tasks))
            }
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::RoundRobin(_) => StrategyKind::RoundRobin,
            Strategy::LeastLoaded(_) => StrategyKind::LeastLoaded,
            Strategy::Random(_) => StrategyKind::Random,
            Strategy::Static(_) => StrategyKind::Static,
        }
    }

    /// Pair each unassigned task with a worker.
    ///
    /// `unassigned` must be in ascending id order. Returns one assignment per
    /// task, in the same order; an empty input yields an empty result.
    pub fn assign(&mut self, workers: &[Worker], unassigned: &[&Task]) -> Vec<Assignment> {
        if unassigned.is_empty() {
            return Vec::new();
        }
        assert!(!workers.is_empty(), "cannot assign tasks without workers");

        match self {
            Strategy::RoundRobin(policy) => policy.assign(workers, unassigned),
            Strategy::LeastLoaded(policy) => policy.assign(workers, unassigned),
            Strategy::Random(policy) => policy.assign(workers, unassigned),
            Strategy::Static(policy) => policy.assign(workers, unassigned),
        }
    }
}
