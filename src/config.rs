//! # Loop worker configuration.
//!
//! Provides [`LoopOptions`], the construction-time settings for a
//! [`LoopWorker`](crate::LoopWorker). All configuration is injected at
//! construction; nothing is reconfigurable after `run()` begins.

use std::time::Duration;

/// Construction-time options for a loop worker.
///
/// ## Field semantics
/// - `start_active`: activity assumed when no wait signal is wired
///   (a worker with a wait signal always follows the signal's value)
/// - `poll`: upper bound on one idle pass; a stop or activity change is
///   observed within at most one `poll` interval
#[derive(Clone, Copy, Debug)]
pub struct LoopOptions {
    /// Whether the worker starts (and stays) active when it has no wait signal.
    pub start_active: bool,

    /// Bound on one idle pass. The idle hook is raced against this interval,
    /// so a blocking wait never delays a stop request by more than `poll`.
    pub poll: Duration,
}

impl LoopOptions {
    /// Sets the initial activity for workers without a wait signal.
    pub fn start_active(mut self, active: bool) -> Self {
        self.start_active = active;
        self
    }

    /// Sets the idle-pass bound.
    pub fn poll(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }
}

impl Default for LoopOptions {
    /// Default options:
    ///
    /// - `start_active = true`
    /// - `poll = 10ms`
    fn default() -> Self {
        Self {
            start_active: true,
            poll: Duration::from_millis(10),
        }
    }
}
