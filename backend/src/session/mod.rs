//! Session management
//!
//! A session is one independently running simulation, addressed by an opaque
//! id across otherwise stateless requests. The `SessionRegistry` is the only
//! owner of session state; callers get snapshots back, never references.
//!
//! # Example
//!
//! ```
//! use load_balancer_sim_core_rs::session::{CreateRequest, SessionRegistry};
//!
//! let registry = SessionRegistry::new();
//! let created = registry
//!     .create(&CreateRequest {
//!         num_workers: 2,
//!         num_tasks: 3,
//!         strategy: "least-loaded".to_string(),
//!         seed: Some(9),
//!         workload: None,
//!     })
//!     .unwrap();
//!
//! assert_eq!(created.state.current_step, 0);
//!
//! let outcome = registry.step(&created.session_id).unwrap();
//! assert_eq!(outcome.state.current_step, 1);
//!
//! registry.reset(&created.session_id);
//! assert!(registry.step(&created.session_id).is_err());
//! ```

mod registry;

pub use registry::SessionRegistry;

use crate::orchestrator::{SimulationConfig, SimulationError, StateSnapshot};
use crate::policy::StrategyKind;
use crate::workload::WorkloadDistribution;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque session identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub(crate) fn generate() -> Self {
        SessionId(Uuid::new_v4())
    }

    /// Seed material derived from the id's random bits
    pub(crate) fn entropy(&self) -> u64 {
        let bits = self.0.as_u128();
        (bits >> 64) as u64 ^ bits as u64
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionId {
    type Err = SimulationError;

    /// A string that is not a valid id cannot name a live session.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(SessionId)
            .map_err(|_| SimulationError::SessionNotFound(s.to_string()))
    }
}

/// Create-session request as received from the transport layer
///
/// Counts are signed so that out-of-range input can be rejected with
/// `InvalidConfig` instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequest {
    pub num_workers: i64,
    pub num_tasks: i64,
    pub strategy: String,

    /// Fixed seed for a reproducible run; derived from the session id if absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Workload distribution; `Uniform { min: 1, max: 10 }` if absent
    #[serde(default)]
    pub workload: Option<WorkloadDistribution>,
}

impl CreateRequest {
    /// Validate and convert into a `SimulationConfig`.
    ///
    /// `fallback_seed` is used when the request carries no seed.
    pub fn to_config(&self, fallback_seed: u64) -> Result<SimulationConfig, SimulationError> {
        let num_workers = positive_count("num_workers", self.num_workers)?;
        let num_tasks = positive_count("num_tasks", self.num_tasks)?;
        let strategy: StrategyKind = self.strategy.parse()?;

        let config = SimulationConfig {
            num_workers,
            num_tasks,
            strategy,
            rng_seed: self.seed.unwrap_or(fallback_seed),
            workload: self.workload.clone().unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

fn positive_count(field: &str, value: i64) -> Result<usize, SimulationError> {
    if value < 1 {
        return Err(SimulationError::InvalidConfig(format!(
            "{} must be >= 1 (got {})",
            field, value
        )));
    }
    usize::try_from(value)
        .map_err(|_| SimulationError::InvalidConfig(format!("{} out of range: {}", field, value)))
}

/// Response to a successful create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateResponse {
    pub session_id: SessionId,
    pub state: StateSnapshot,
}
