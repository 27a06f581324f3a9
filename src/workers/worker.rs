//! # Worker: the lifecycle template every unit of the tree runs through.
//!
//! A [`Worker`] is one schedulable unit of behavior. Its public contract is
//! `run()`, a fixed skeleton composed once here; implementors override only
//! the hooks they need:
//!
//! ```text
//! run():
//!   ├─► enter tracing span (worker name + execution context)
//!   ├─► before()          ── setup; Err terminates the worker
//!   ├─► body()            ── main behavior; Err logged, never re-raised
//!   ├─► after()           ── always runs, on every exit path
//!   └─► stop cascade      ── unless the tree stop is already in progress,
//!                            set the stop signal (fail-fast by default)
//! ```
//!
//! ## Rules
//! - `run()` **never** propagates an error; failures are terminal-but-contained
//!   at the worker boundary and observable through logs and the stop cascade.
//! - A worker never learns whether it runs as a dedicated context or a shared
//!   task; nothing in this trait exposes the concurrency mode.
//! - Signals arrive through the embedded [`SignalSlot`]s at construction, or
//!   through a later fill that succeeds only while the slot is empty.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;

use crate::control::{ControlSignal, SignalSlot};
use crate::error::WorkerError;

/// Shared handle to a worker, suitable for placing in a supervisor's child list.
pub type WorkerRef = Arc<dyn Worker>;

/// # One schedulable unit of behavior.
///
/// Implementors embed a [`SignalSlot`] for the stop signal (and optionally one
/// for the wait signal) and override the hooks they need. The `run()` skeleton
/// is provided and should not normally be overridden.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use workvisor::{SignalSlot, Worker, WorkerError};
///
/// struct OneShot {
///     stop: SignalSlot,
/// }
///
/// #[async_trait]
/// impl Worker for OneShot {
///     fn name(&self) -> &str {
///         "one-shot"
///     }
///
///     fn stop_slot(&self) -> &SignalSlot {
///         &self.stop
///     }
///
///     async fn body(&self) -> Result<(), WorkerError> {
///         // do the work...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// Returns a stable, human-readable worker name.
    fn name(&self) -> &str;

    /// Returns the slot holding this worker's stop signal.
    fn stop_slot(&self) -> &SignalSlot;

    /// Returns the slot for a wait/active signal, if this worker supports one.
    ///
    /// Supervisors only forward their wait signal to workers that expose a slot.
    fn wait_slot(&self) -> Option<&SignalSlot> {
        None
    }

    /// Re-applies signal propagation to any children this worker owns.
    ///
    /// Leaf workers have no children; only supervisors override this. It lets
    /// an outer supervisor hand a signal to a nested supervisor *after* the
    /// nested one was constructed and still reach its grandchildren.
    fn propagate_signals(&self) {}

    /// Returns `true` once a stop has been requested for this worker.
    fn is_stop_requested(&self) -> bool {
        self.stop_slot()
            .get()
            .map(ControlSignal::is_set)
            .unwrap_or(false)
    }

    /// Requests a full-tree stop.
    ///
    /// A worker without a wired stop signal mints one already set and parks it
    /// in the slot, so the request is never lost and later wiring attempts
    /// fail instead of discarding it.
    fn request_stop(&self) {
        match self.stop_slot().get() {
            Some(stop) => stop.set(),
            None => {
                let _ = self.stop_slot().fill(ControlSignal::new(true));
            }
        }
    }

    /// Setup hook, runs before `body`. An error terminates the worker.
    async fn before(&self) -> Result<(), WorkerError> {
        Ok(())
    }

    /// Main behavior hook.
    async fn body(&self) -> Result<(), WorkerError> {
        Ok(())
    }

    /// Cleanup hook; runs unconditionally, even after a failed `before` or `body`.
    async fn after(&self) {}

    /// Executes the fixed lifecycle skeleton. Invoked exactly once per
    /// execution context; never propagates an error.
    async fn run(&self) {
        drive(self).await
    }
}

/// The lifecycle skeleton behind [`Worker::run`].
///
/// ### Failure policy
/// - `before` error → `body` is skipped, worker counts as failed.
/// - `body` error → logged with the worker's span context; `Interrupted` is a
///   graceful exit, anything else counts as failed.
/// - `after` always runs.
/// - On exit the worker requests a full-tree stop unless one is already in
///   progress; a single misbehaving leaf therefore terminates the entire tree.
pub(crate) async fn drive<W: Worker + ?Sized>(worker: &W) {
    let span = tracing::info_span!("worker", worker = %worker.name());
    async move {
        tracing::info!("starting");
        let mut failed = false;

        match worker.before().await {
            Ok(()) => match worker.body().await {
                Ok(()) => {}
                Err(WorkerError::Interrupted) => {
                    tracing::info!("interrupted by stop request");
                }
                Err(e) => {
                    tracing::error!(label = e.as_label(), error = %e, "worker body failed");
                    failed = true;
                }
            },
            Err(e) => {
                tracing::error!(label = e.as_label(), error = %e, "worker setup failed");
                failed = true;
            }
        }

        worker.after().await;

        if !worker.is_stop_requested() {
            tracing::info!("requesting tree stop");
        }
        worker.request_stop();

        tracing::info!(failed, "stopped");
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Probe {
        stop: SignalSlot,
        body_calls: AtomicUsize,
        after_calls: AtomicUsize,
        fail_before: bool,
        fail_body: bool,
    }

    impl Probe {
        fn new(fail_before: bool, fail_body: bool) -> Self {
            Self {
                stop: SignalSlot::holding(ControlSignal::new(false)),
                body_calls: AtomicUsize::new(0),
                after_calls: AtomicUsize::new(0),
                fail_before,
                fail_body,
            }
        }
    }

    #[async_trait]
    impl Worker for Probe {
        fn name(&self) -> &str {
            "probe"
        }

        fn stop_slot(&self) -> &SignalSlot {
            &self.stop
        }

        async fn before(&self) -> Result<(), WorkerError> {
            if self.fail_before {
                Err(WorkerError::fail("setup"))
            } else {
                Ok(())
            }
        }

        async fn body(&self) -> Result<(), WorkerError> {
            self.body_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_body {
                Err(WorkerError::fail("boom"))
            } else {
                Ok(())
            }
        }

        async fn after(&self) {
            self.after_calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn run_triggers_stop_cascade_on_success() {
        let w = Probe::new(false, false);
        w.run().await;
        assert!(w.is_stop_requested());
        assert_eq!(w.after_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn after_runs_even_when_body_fails() {
        let w = Probe::new(false, true);
        w.run().await;
        assert!(w.is_stop_requested());
        assert_eq!(w.after_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_setup_skips_body_but_cleans_up_and_cascades() {
        let w = Probe::new(true, false);
        w.run().await;
        assert_eq!(w.body_calls.load(Ordering::SeqCst), 0);
        assert_eq!(w.after_calls.load(Ordering::SeqCst), 1);
        assert!(w.is_stop_requested());
    }

    #[tokio::test]
    async fn request_stop_without_wired_signal_mints_a_set_one() {
        struct Bare {
            stop: SignalSlot,
        }

        #[async_trait]
        impl Worker for Bare {
            fn name(&self) -> &str {
                "bare"
            }
            fn stop_slot(&self) -> &SignalSlot {
                &self.stop
            }
        }

        let w = Bare {
            stop: SignalSlot::empty(),
        };
        assert!(!w.is_stop_requested());
        w.request_stop();
        assert!(w.is_stop_requested());
        // The minted signal now occupies the slot; the tree cannot overwrite it.
        assert!(!w.stop_slot().fill(ControlSignal::new(false)));
    }
}
