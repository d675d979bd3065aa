//! Performance metrics for a completed simulation
//!
//! Computed once, at the step that completes the last task, and cached on
//! the simulation for the rest of the session.
//!
//! # Definitions
//!
//! - `total_time`: steps elapsed when the last task completed
//! - `avg_completion` / `max_completion`: over `end_time - start_time` per task
//! - `load_imbalance`: `max - min` of tasks completed per worker
//! - `load_variance`: population variance of tasks completed per worker
//! - `efficiency`: `100 * total workload / (workers * total_time)`, in `[0, 100]`
//!
//! # Boundary rule
//!
//! `total_time == 0` means no time elapsed while every task was satisfied, so
//! efficiency is defined as 100 rather than dividing by zero.

use crate::models::{Task, Worker};
use serde::{Deserialize, Serialize};

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_time: usize,
    pub avg_completion: f64,
    pub max_completion: usize,
    pub load_imbalance: u64,
    pub load_variance: f64,
    /// Percentage of worker-steps spent doing useful work
    pub efficiency: f64,
}

/// Pure calculator from final simulation state to `Metrics`
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Compute metrics over the terminal state.
    ///
    /// # Example
    ///
    /// ```
    /// use load_balancer_sim_core_rs::metrics::MetricsCalculator;
    /// use load_balancer_sim_core_rs::{Task, Worker};
    ///
    /// let workers = vec![Worker::new(0)];
    /// let tasks: Vec<Task> = Vec::new();
    /// let metrics = MetricsCalculator::calculate(&workers, &tasks, 0);
    /// assert_eq!(metrics.efficiency, 100.0);
    /// ```
    pub fn calculate(workers: &[Worker], tasks: &[Task], total_time: usize) -> Metrics {
        let completion_times: Vec<usize> = tasks.iter().filter_map(Task::completion_time).collect();
        debug_assert_eq!(
            completion_times.len(),
            tasks.len(),
            "metrics requested before every task completed"
        );

        let avg_completion = mean(completion_times.iter().map(|&t| t as f64));
        let max_completion = completion_times.iter().copied().max().unwrap_or(0);

        let processed: Vec<u64> = workers.iter().map(Worker::total_processed).collect();
        let load_imbalance = match (processed.iter().max(), processed.iter().min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        };
        let load_variance = population_variance(&processed);

        let total_workload: u64 = tasks.iter().map(Task::workload).sum();
        let efficiency = efficiency(total_workload, workers.len(), total_time);

        Metrics {
            total_time,
            avg_completion,
            max_completion,
            load_imbalance,
            load_variance,
            efficiency,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn population_variance(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values.iter().map(|&v| v as f64));
    mean(values.iter().map(|&v| {
        let d = v as f64 - avg;
        d * d
    }))
}

fn efficiency(total_workload: u64, num_workers: usize, total_time: usize) -> f64 {
    let capacity = num_workers as f64 * total_time as f64;
    if capacity == 0.0 {
        return 100.0;
    }
    (100.0 * total_workload as f64 / capacity).clamp(0.0, 100.0)
}
