//! Workload generation for newly created tasks.
//!
//! Every task's workload is drawn once, at session creation, from a
//! configured distribution. Generation is deterministic given the seed.
//!
//! # Example
//!
//! ```
//! use load_balancer_sim_core_rs::workload::{WorkloadDistribution, WorkloadGenerator};
//! use load_balancer_sim_core_rs::RngManager;
//!
//! let mut generator = WorkloadGenerator::new(WorkloadDistribution::Uniform { min: 1, max: 10 });
//! let mut rng = RngManager::new(42);
//! let tasks = generator.generate(5, &mut rng);
//!
//! assert_eq!(tasks.len(), 5);
//! assert!(tasks.iter().all(|t| (1..=10).contains(&t.workload())));
//! ```

use crate::models::Task;
use crate::rng::RngManager;
use crate::SimulationError;

/// Largest workload a single task may carry, in work units
pub const MAX_WORKLOAD: u64 = 1_000_000;

/// Standard deviations above the mean a normal workload must stay within
const NORMAL_TAIL_SIGMAS: f64 = 6.0;

/// Distribution of task workloads, in work units.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkloadDistribution {
    /// Uniform between min and max (inclusive)
    Uniform { min: u64, max: u64 },

    /// Every task gets the same workload
    Fixed { units: u64 },

    /// Normal distribution, rounded and clamped to at least one unit
    Normal { mean: f64, std_dev: f64 },
}

impl Default for WorkloadDistribution {
    fn default() -> Self {
        WorkloadDistribution::Uniform { min: 1, max: 10 }
    }
}

impl WorkloadDistribution {
    /// Reject distributions that could produce a workload outside
    /// `1..=MAX_WORKLOAD`.
    pub fn validate(&self) -> Result<(), SimulationError> {
        match self {
            WorkloadDistribution::Uniform { min, max } => {
                if *min == 0 {
                    return Err(SimulationError::InvalidConfig(
                        "uniform workload min must be > 0".to_string(),
                    ));
                }
                if min > max {
                    return Err(SimulationError::InvalidConfig(format!(
                        "uniform workload min {} exceeds max {}",
                        min, max
                    )));
                }
                if *max > MAX_WORKLOAD {
                    return Err(SimulationError::InvalidConfig(format!(
                        "uniform workload max {} exceeds {}",
                        max, MAX_WORKLOAD
                    )));
                }
            }
            WorkloadDistribution::Fixed { units } => {
                if *units == 0 {
                    return Err(SimulationError::InvalidConfig(
                        "fixed workload must be > 0".to_string(),
                    ));
                }
                if *units > MAX_WORKLOAD {
                    return Err(SimulationError::InvalidConfig(format!(
                        "fixed workload {} exceeds {}",
                        units, MAX_WORKLOAD
                    )));
                }
            }
            WorkloadDistribution::Normal { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || *std_dev < 0.0 {
                    return Err(SimulationError::InvalidConfig(format!(
                        "normal workload needs finite mean and std_dev >= 0 (got {}, {})",
                        mean, std_dev
                    )));
                }
                if mean + NORMAL_TAIL_SIGMAS * std_dev > MAX_WORKLOAD as f64 {
                    return Err(SimulationError::InvalidConfig(format!(
                        "normal workload mean {} + {} std_dev {} exceeds {}",
                        mean, NORMAL_TAIL_SIGMAS, std_dev, MAX_WORKLOAD
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Creates tasks with ids `0..count` and sampled workloads.
pub struct WorkloadGenerator {
    distribution: WorkloadDistribution,
}

impl WorkloadGenerator {
    pub fn new(distribution: WorkloadDistribution) -> Self {
        Self { distribution }
    }

    /// Generate `count` tasks in id order.
    pub fn generate(&mut self, count: usize, rng: &mut RngManager) -> Vec<Task> {
        (0..count)
            .map(|id| Task::new(id, self.sample(rng)))
            .collect()
    }

    fn sample(&self, rng: &mut RngManager) -> u64 {
        match &self.distribution {
            WorkloadDistribution::Uniform { min, max } => rng.range(*min, max.saturating_add(1)),
            WorkloadDistribution::Fixed { units } => *units,
            WorkloadDistribution::Normal { mean, std_dev } => {
                let z = sample_standard_normal(rng);
                let units = (mean + std_dev * z).round();
                units.clamp(1.0, MAX_WORKLOAD as f64) as u64
            }
        }
    }
}

/// Box-Muller transform. `1 - u` keeps the log argument in `(0, 1]`.
fn sample_standard_normal(rng: &mut RngManager) -> f64 {
    let u1 = 1.0 - rng.next_f64();
    let u2 = rng.next_f64();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
