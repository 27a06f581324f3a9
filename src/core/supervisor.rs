//! # Supervisor: launches a declared set of child workers and joins them.
//!
//! A [`Supervisor`] is itself a [`Worker`], which is what makes the tree
//! nestable to arbitrary depth: an outer supervisor treats a nested one like
//! any leaf for propagation, launch and join purposes.
//!
//! ## High-level flow
//! ```text
//! Supervisor::new(name, mode, children)
//!   └─► propagate_signals()              (shallow, one level; nested
//!                                         supervisors repeat it themselves)
//! run()  [the Worker skeleton]
//!   └─► body():
//!         ├─► mint a stop signal if none was wired (root by convention)
//!         ├─► propagate_signals()        (idempotent: slots fill only once)
//!         ├─► launch children in declaration order   ──► launcher::launch()
//!         └─► join all, in any order
//!               └─ per-child failure/panic: logged, join continues
//! ```
//!
//! ## Rules
//! - Propagation is **shallow**: each supervisor hands its signals one level
//!   down; a nested supervisor repeats the step for its own children, so the
//!   effect is transitively hierarchical without global tree knowledge.
//! - A child carrying its own stop signal keeps it; filling an occupied slot
//!   reports failure and changes nothing.
//! - No startup-order guarantee between siblings; no forced kill. Join waits
//!   for natural or cascaded termination only.
//! - The supervisor's `run()` exactly contains the lifetime of its subtree.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinSet;

use crate::control::{ControlSignal, SignalSlot};
use crate::core::launcher;
use crate::error::WorkerError;
use crate::workers::{Worker, WorkerRef};

/// How a supervisor's children are scheduled.
///
/// See the [`launcher`](crate::core::launcher) module docs for how each mode
/// maps onto the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConcurrencyMode {
    /// One dedicated, OS-scheduled context per child (isolated executor).
    Processes,
    /// One task per child on the shared runtime (shared executor).
    Threads,
}

/// Worker that owns an ordered list of children and supervises their lifetime.
pub struct Supervisor {
    name: String,
    mode: ConcurrencyMode,
    children: Vec<WorkerRef>,
    stop: SignalSlot,
    wait: SignalSlot,
}

impl Supervisor {
    /// Creates a supervisor with empty signal slots.
    ///
    /// The child list is fixed from here on. Signals may arrive later from an
    /// outer supervisor; a root supervisor that never receives one mints its
    /// own stop signal when `run()` begins.
    pub fn new(
        name: impl Into<String>,
        mode: ConcurrencyMode,
        children: Vec<WorkerRef>,
    ) -> Self {
        Self::with_signals(name, mode, children, None, None)
    }

    /// Creates a supervisor with explicitly wired signals.
    ///
    /// Propagation runs immediately: children lacking a stop signal share
    /// `stop`, children exposing an empty wait slot share `wait`.
    pub fn with_signals(
        name: impl Into<String>,
        mode: ConcurrencyMode,
        children: Vec<WorkerRef>,
        stop: Option<ControlSignal>,
        wait: Option<ControlSignal>,
    ) -> Self {
        let sup = Self {
            name: name.into(),
            mode,
            children,
            stop: SignalSlot::from_option(stop),
            wait: SignalSlot::from_option(wait),
        };
        sup.propagate_signals();
        sup
    }

    /// Returns the supervisor's stop signal, if wired yet.
    ///
    /// Handy for external controllers that want to stop the tree.
    pub fn stop_signal(&self) -> Option<ControlSignal> {
        self.stop.get().cloned()
    }

    /// Returns the configured concurrency mode.
    pub fn mode(&self) -> ConcurrencyMode {
        self.mode
    }

    /// Returns the declared children.
    pub fn children(&self) -> &[WorkerRef] {
        &self.children
    }
}

#[async_trait]
impl Worker for Supervisor {
    fn name(&self) -> &str {
        &self.name
    }

    fn stop_slot(&self) -> &SignalSlot {
        &self.stop
    }

    fn wait_slot(&self) -> Option<&SignalSlot> {
        Some(&self.wait)
    }

    /// Shallow, one-level signal propagation, repeated down the tree through
    /// each child's own `propagate_signals`.
    fn propagate_signals(&self) {
        if let Some(stop) = self.stop.get() {
            for child in &self.children {
                let _ = child.stop_slot().fill(stop.clone());
            }
        }
        if let Some(wait) = self.wait.get() {
            for child in &self.children {
                if let Some(slot) = child.wait_slot() {
                    let _ = slot.fill(wait.clone());
                }
            }
        }
        for child in &self.children {
            child.propagate_signals();
        }
    }

    async fn body(&self) -> Result<(), WorkerError> {
        // Root by convention: whoever runs without a wired stop signal
        // creates the one the whole tree will share.
        if self.stop.get().is_none() {
            let _ = self.stop.fill(ControlSignal::new(false));
        }
        self.propagate_signals();

        let mut set = JoinSet::new();
        for child in &self.children {
            launcher::launch(&mut set, self.mode, Arc::clone(child));
        }
        tracing::info!(children = self.children.len(), mode = ?self.mode, "children launched");

        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined {
                // A panicked or aborted child context; siblings keep running
                // and come down through the stop cascade instead.
                tracing::error!(error = %e, "child execution context failed");
            }
        }
        tracing::info!("all children joined");
        Ok(())
    }
}
