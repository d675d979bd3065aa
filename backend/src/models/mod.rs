//! Domain models for the load-balancer simulator

pub mod task;
pub mod worker;

// Re-exports
pub use task::{Task, TaskStatus};
pub use worker::Worker;
