//! Concurrency-safe session store
//!
//! # Locking
//!
//! - The map itself sits behind a `RwLock`, held only long enough to look up,
//!   insert or remove an `Arc` handle. Lookups from concurrent requests share
//!   the read lock.
//! - Each simulation sits behind its own `Mutex`. Two steps on the same
//!   session serialize on it; steps on different sessions never touch the
//!   same lock.
//!
//! Simulation construction happens before the map lock is taken, so a slow
//! create never blocks other sessions.

use super::{CreateRequest, CreateResponse, SessionId};
use crate::orchestrator::{Simulation, SimulationConfig, SimulationError, StateSnapshot, StepOutcome};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

type SessionHandle = Arc<Mutex<Simulation>>;

/// Registry of live sessions
///
/// Share it between request handlers with `Arc<SessionRegistry>`.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a transport-level request.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for out-of-range counts, an unknown strategy or an
    /// invalid workload distribution. Nothing is stored on error.
    pub fn create(&self, request: &CreateRequest) -> Result<CreateResponse, SimulationError> {
        let session_id = SessionId::generate();
        let config = request.to_config(session_id.entropy())?;
        Ok(self.store(session_id, Simulation::new(config)?))
    }

    /// Create a session from an already-typed configuration.
    pub fn create_with_config(
        &self,
        config: SimulationConfig,
    ) -> Result<CreateResponse, SimulationError> {
        Ok(self.store(SessionId::generate(), Simulation::new(config)?))
    }

    /// Store a prebuilt simulation as a new session.
    pub fn create_from_simulation(&self, simulation: Simulation) -> CreateResponse {
        self.store(SessionId::generate(), simulation)
    }

    fn store(&self, session_id: SessionId, simulation: Simulation) -> CreateResponse {
        let state = simulation.snapshot();
        let strategy = simulation.config().strategy;

        self.sessions
            .write()
            .insert(session_id, Arc::new(Mutex::new(simulation)));

        info!(
            session_id = %session_id,
            strategy = %strategy,
            num_workers = state.workers.len(),
            num_tasks = state.tasks.len(),
            "session created"
        );

        CreateResponse { session_id, state }
    }

    /// Current state of a session, without advancing it.
    pub fn get(&self, session_id: &SessionId) -> Result<StateSnapshot, SimulationError> {
        let handle = self.lookup(session_id)?;
        let snapshot = handle.lock().snapshot();
        Ok(snapshot)
    }

    /// Advance a session by one step.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` if the id was never created or has been reset.
    pub fn step(&self, session_id: &SessionId) -> Result<StepOutcome, SimulationError> {
        let handle = self.lookup(session_id)?;
        let outcome = handle.lock().step();
        Ok(outcome)
    }

    /// Remove a session. Unknown ids are ignored.
    pub fn reset(&self, session_id: &SessionId) {
        let removed = self.sessions.write().remove(session_id);
        match removed {
            Some(_) => info!(session_id = %session_id, "session reset"),
            None => debug!(session_id = %session_id, "reset of unknown session ignored"),
        }
    }

    pub fn contains(&self, session_id: &SessionId) -> bool {
        self.sessions.read().contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Ids of all live sessions, in no particular order
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.read().keys().copied().collect()
    }

    fn lookup(&self, session_id: &SessionId) -> Result<SessionHandle, SimulationError> {
        let handle = self.sessions.read().get(session_id).cloned();
        handle.ok_or_else(|| {
            debug!(session_id = %session_id, "session not found");
            SimulationError::SessionNotFound(session_id.to_string())
        })
    }
}
