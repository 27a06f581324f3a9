//! The shared signal context record and its backing file.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::BusError;

/// Logical identity of one user-defined signal.
///
/// `kind` comes from an open-ended, application-defined set; `correlation`
/// optionally ties the signal to some payload the receiver knows how to find.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalNote {
    /// Application-defined signal kind, matched against registered reactions.
    pub kind: String,
    /// Optional correlation identity (an id, a path, a camera name, ...).
    pub correlation: Option<String>,
}

impl SignalNote {
    /// Creates a note of the given kind with no correlation payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            correlation: None,
        }
    }

    /// Attaches a correlation identity.
    pub fn with_correlation(mut self, correlation: impl Into<String>) -> Self {
        self.correlation = Some(correlation.into());
        self
    }
}

/// The shared context record: one small file every context in the tree can
/// reach, overwritten on every send.
///
/// ### Rules
/// - [`SignalSpace::post`] overwrites unconditionally — last write wins.
/// - [`SignalSpace::take`] consumes: the record is removed so a stale note is
///   never re-dispatched on the next doorbell.
/// - Two spaces with the same context name refer to the same record.
#[derive(Clone, Debug)]
pub struct SignalSpace {
    path: PathBuf,
}

impl SignalSpace {
    /// Creates a space under the system temp directory, keyed by context name.
    pub fn new(context: &str) -> Self {
        Self {
            path: std::env::temp_dir().join(format!("{context}.signal-context")),
        }
    }

    /// Creates a space backed by an explicit path (tests, custom layouts).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Overwrites the shared record with `note`.
    pub fn post(&self, note: &SignalNote) -> Result<(), BusError> {
        let bytes = serde_json::to_vec(note)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }

    /// Reads and removes the shared record.
    ///
    /// Returns `Ok(None)` when no note is pending (doorbell without context,
    /// or an earlier take already consumed it).
    pub fn take(&self) -> Result<Option<SignalNote>, BusError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => {
                let _ = std::fs::remove_file(&self.path);
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> (tempfile::TempDir, SignalSpace) {
        let dir = tempfile::tempdir().unwrap();
        let space = SignalSpace::at(dir.path().join("test.signal-context"));
        (dir, space)
    }

    #[test]
    fn take_without_post_is_none() {
        let (_dir, space) = space();
        assert_eq!(space.take().unwrap(), None);
    }

    #[test]
    fn racing_posts_collapse_to_last_write() {
        let (_dir, space) = space();
        space.post(&SignalNote::new("k1")).unwrap();
        space
            .post(&SignalNote::new("k2").with_correlation("cam-0"))
            .unwrap();

        let note = space.take().unwrap().expect("one note pending");
        assert_eq!(note.kind, "k2");
        assert_eq!(note.correlation.as_deref(), Some("cam-0"));

        // k1 is never observed, and the record is consumed.
        assert_eq!(space.take().unwrap(), None);
    }
}
