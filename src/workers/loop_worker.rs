//! # LoopWorker: the active/inactive state machine for continuous workers.
//!
//! A [`LoopWorker`] wraps an implementation of [`LoopHooks`] and drives it
//! through repeated passes until a stop is requested:
//!
//! ```text
//! body():
//!   loop {
//!     ├─► stop signal set?            ─► break (checked once per pass, first)
//!     ├─► desired = wait signal value ─► (or start_active when none wired)
//!     ├─► edge detected?              ─► on_activate() / on_deactivate()
//!     │                                  + publish state (if a publisher is held)
//!     ├─► ACTIVE:   work()
//!     │     ├─ Ok / Err(Fail)  ─► log Fail, continue to next pass
//!     │     ├─ Err(Interrupted)─► break (graceful)
//!     │     └─ Err(Fatal)      ─► escape: worker terminates as failed
//!     └─► INACTIVE: idle()  ── raced against LoopOptions::poll
//!   }
//! ```
//!
//! ## Rules
//! - Activity hooks fire **exactly once per edge** of the wait signal, never
//!   on repeated reads of an unchanged value.
//! - A failing `work` pass does not prevent the next pass: loops are expected
//!   to survive transient per-iteration errors. Only [`WorkerError::Fatal`]
//!   escapes the per-pass isolation.
//! - The idle pass is bounded by `poll`, so a stop request is observed within
//!   at most one interval even when `idle` blocks.
//! - On exit the worker publishes a final inactive state if it holds a
//!   [`StatePublisher`] handle.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time;

use crate::config::LoopOptions;
use crate::control::{ControlSignal, SignalSlot};
use crate::error::WorkerError;
use crate::state::StatePublisher;
use crate::workers::Worker;

/// # Behavior hooks for a loop worker.
///
/// Override only what you need; every hook except [`LoopHooks::work`] has a
/// default. Hooks run inside the worker's tracing span.
#[async_trait]
pub trait LoopHooks: Send + Sync + 'static {
    /// Returns a stable, human-readable worker name.
    fn name(&self) -> &str;

    /// Setup before the loop starts. An error terminates the worker.
    async fn before(&self) -> Result<(), WorkerError> {
        Ok(())
    }

    /// One unit of work while active.
    async fn work(&self) -> Result<(), WorkerError>;

    /// One pass while inactive.
    ///
    /// The default pends forever; the loop bounds every idle pass by
    /// [`LoopOptions::poll`], which turns the default into a plain bounded
    /// sleep. A custom implementation may block on its own condition; the
    /// bound still applies.
    async fn idle(&self) {
        std::future::pending::<()>().await
    }

    /// Called exactly once per `false → true` edge of the activity state.
    async fn on_activate(&self) {}

    /// Called exactly once per `true → false` edge of the activity state.
    async fn on_deactivate(&self) {}

    /// Cleanup after the loop exits, on every exit path.
    async fn after(&self) {}
}

/// Worker that repeats its hooks' behavior, switching between active and
/// inactive passes as the wait signal toggles.
pub struct LoopWorker {
    hooks: Arc<dyn LoopHooks>,
    opts: LoopOptions,
    stop: SignalSlot,
    wait: SignalSlot,
    publisher: Option<StatePublisher>,
}

impl LoopWorker {
    /// Creates a loop worker with default [`LoopOptions`] and empty signal slots.
    pub fn new(hooks: Arc<dyn LoopHooks>) -> Self {
        Self {
            hooks,
            opts: LoopOptions::default(),
            stop: SignalSlot::empty(),
            wait: SignalSlot::empty(),
            publisher: None,
        }
    }

    /// Replaces the loop options.
    pub fn with_options(mut self, opts: LoopOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Wires the stop signal at construction.
    pub fn with_stop_signal(mut self, signal: ControlSignal) -> Self {
        self.stop = SignalSlot::holding(signal);
        self
    }

    /// Wires the wait/active signal at construction.
    pub fn with_wait_signal(mut self, signal: ControlSignal) -> Self {
        self.wait = SignalSlot::holding(signal);
        self
    }

    /// Attaches a state publisher; activity edges and the final stop are
    /// published through it for external observers.
    pub fn with_publisher(mut self, publisher: StatePublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Convenience for `Arc::new(LoopWorker::new(hooks))` pipelines.
    pub fn arc(hooks: Arc<dyn LoopHooks>) -> Arc<Self> {
        Arc::new(Self::new(hooks))
    }

    fn desired_activity(&self) -> bool {
        match self.wait.get() {
            Some(signal) => signal.get(),
            None => self.opts.start_active,
        }
    }

    fn publish_state(&self, active: bool, status: &str) {
        if let Some(publisher) = &self.publisher {
            if let Err(e) = publisher.publish(self.hooks.name(), active, status) {
                tracing::warn!(error = %e, "state publish failed");
            }
        }
    }
}

#[async_trait]
impl Worker for LoopWorker {
    fn name(&self) -> &str {
        self.hooks.name()
    }

    fn stop_slot(&self) -> &SignalSlot {
        &self.stop
    }

    fn wait_slot(&self) -> Option<&SignalSlot> {
        Some(&self.wait)
    }

    async fn before(&self) -> Result<(), WorkerError> {
        self.hooks.before().await
    }

    async fn body(&self) -> Result<(), WorkerError> {
        let mut active = false;

        loop {
            if self.is_stop_requested() {
                break;
            }

            let desired = self.desired_activity();
            if desired != active {
                active = desired;
                if active {
                    self.hooks.on_activate().await;
                    self.publish_state(true, "active");
                } else {
                    self.hooks.on_deactivate().await;
                    self.publish_state(false, "waiting");
                }
            }

            if active {
                match self.hooks.work().await {
                    Ok(()) => {}
                    Err(WorkerError::Fail { error }) => {
                        tracing::error!(error = %error, "loop pass failed; continuing");
                    }
                    Err(WorkerError::Interrupted) => return Err(WorkerError::Interrupted),
                    Err(fatal) => return Err(fatal),
                }
                // A pass that never awaits must still hand the executor back,
                // or it starves siblings sharing the runtime.
                tokio::task::yield_now().await;
            } else {
                // Bound the idle pass so a stop or activity change is never
                // missed by more than one poll interval.
                let _ = time::timeout(self.opts.poll, self.hooks.idle()).await;
            }
        }

        Ok(())
    }

    async fn after(&self) {
        self.hooks.after().await;
        self.publish_state(false, "stopped");
    }
}

/// Function-backed loop hooks.
///
/// Wraps a closure that produces a fresh `work` future per pass; state shared
/// between passes lives in the closure's captures (use `Arc<...>` explicitly).
///
/// ## Example
/// ```
/// use workvisor::{LoopHooks, WorkFn, WorkerError};
///
/// let hooks = WorkFn::arc("ticker", || async {
///     // one unit of work...
///     Ok::<_, WorkerError>(())
/// });
/// assert_eq!(hooks.name(), "ticker");
/// ```
pub struct WorkFn<F> {
    name: std::borrow::Cow<'static, str>,
    f: F,
}

impl<F, Fut> WorkFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<(), WorkerError>> + Send + 'static,
{
    /// Creates new function-backed hooks.
    pub fn new(name: impl Into<std::borrow::Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the hooks and returns them as a shared handle.
    pub fn arc(name: impl Into<std::borrow::Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> LoopHooks for WorkFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<(), WorkerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn work(&self) -> Result<(), WorkerError> {
        (self.f)().await
    }
}
