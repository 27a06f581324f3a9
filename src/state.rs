//! # StatePublisher: the file-backed register of worker states.
//!
//! One small file per worker identity, overwritten at every state transition.
//! Writes are fast local overwrites that never block a worker's loop for more
//! than the cost of one small file write; reads are advisory and stale-
//! tolerant — an observer may see a torn update mid-write, which is accepted
//! because the data is status-only, never authoritative.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Externally observable state of one worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    /// Worker identity the record is keyed by.
    pub worker: String,
    /// Current activity flag.
    pub active: bool,
    /// Free-form status string ("active", "waiting", "stopped", ...).
    pub status: String,
}

/// Writes and reads per-worker state files under one directory.
#[derive(Clone, Debug)]
pub struct StatePublisher {
    dir: PathBuf,
}

impl StatePublisher {
    /// Creates a publisher rooted at `dir`. The directory is created lazily
    /// on first publish.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a publisher under the system temp directory.
    pub fn in_temp() -> Self {
        Self::new(std::env::temp_dir().join("workvisor-states"))
    }

    /// Persists the state for `worker`, overwriting any prior value.
    pub fn publish(&self, worker: &str, active: bool, status: &str) -> Result<(), StateError> {
        std::fs::create_dir_all(&self.dir)?;
        let record = StateRecord {
            worker: worker.to_string(),
            active,
            status: status.to_string(),
        };
        std::fs::write(self.path_for(worker), serde_json::to_vec(&record)?)?;
        Ok(())
    }

    /// Returns the most recent published state, or `None` if `worker` never
    /// published.
    pub fn read(&self, worker: &str) -> Result<Option<StateRecord>, StateError> {
        match std::fs::read(self.path_for(worker)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort removal of a worker's state file at teardown.
    pub fn remove(&self, worker: &str) {
        let _ = std::fs::remove_file(self.path_for(worker));
    }

    fn path_for(&self, worker: &str) -> PathBuf {
        self.dir.join(format!("{}.state", worker.replace(' ', "_")))
    }
}
