//! Simulated time
//!
//! The simulation advances in discrete steps. One call to
//! `Simulation::step()` consumes exactly one step.

use serde::{Deserialize, Serialize};

/// Monotonic step counter
///
/// # Example
/// ```
/// use load_balancer_sim_core_rs::StepClock;
///
/// let mut clock = StepClock::new();
/// assert_eq!(clock.current_step(), 0);
///
/// clock.advance();
/// assert_eq!(clock.current_step(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepClock {
    current_step: usize,
}

impl StepClock {
    /// Create a clock at step 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance time by one step
    pub fn advance(&mut self) {
        self.current_step += 1;
    }

    /// Steps elapsed since the simulation started
    pub fn current_step(&self) -> usize {
        self.current_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_is_monotonic() {
        let mut clock = StepClock::new();
        for expected in 1..=10 {
            clock.advance();
            assert_eq!(clock.current_step(), expected);
        }
    }
}
