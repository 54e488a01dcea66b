//! Shared test doubles for integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use wait_for_db::{Alias, AvailabilityCheck, ProbeError};

/// Replays a fixed sequence of outcomes and records every call's alias set.
pub struct ScriptedCheck {
    script: Mutex<VecDeque<Result<bool, ProbeError>>>,
    calls: Mutex<Vec<Vec<Alias>>>,
}

impl ScriptedCheck {
    pub fn new(script: Vec<Result<bool, ProbeError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<Alias>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl AvailabilityCheck for ScriptedCheck {
    async fn check(&self, databases: &[Alias]) -> Result<bool, ProbeError> {
        self.calls.lock().unwrap().push(databases.to_vec());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProbeError::other("script", "check called after script ran out")))
    }
}

pub fn conn_err() -> Result<bool, ProbeError> {
    Err(ProbeError::connection("default", "could not connect to server: Connection refused"))
}

pub fn op_err() -> Result<bool, ProbeError> {
    Err(ProbeError::operational("default", "the database system is starting up"))
}

pub fn default_set() -> Vec<Alias> {
    vec![Alias::default()]
}
