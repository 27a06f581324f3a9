//! # Doorbell send and receive: [`SignalSender`] and [`SignalHub`].
//!
//! The hub must run in the **top-level execution context** of the tree: the
//! host only delivers asynchronous signals to a process's own context, never
//! directly to its children, so the top-level context is the sole receiver
//! and re-dispatches by reaction.
//!
//! ## Rules
//! - Exactly one low-level signal number is reserved (`SIGUSR1`); it carries
//!   no data and only prompts a re-read of the shared context record.
//! - Reactions are registered by kind name; an unmatched kind is logged and
//!   dropped.
//! - The hub is an ordinary [`Worker`]: it joins the tree as a child of the
//!   root supervisor and exits through the same stop signal as everyone else.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::control::{ControlSignal, ControlWatch, SignalSlot};
use crate::error::{BusError, WorkerError};
use crate::signals::{SignalNote, SignalSpace};
use crate::workers::Worker;

/// Sender side of the user-defined signal channel.
///
/// Usable from any execution context, including external processes that share
/// the same context name.
#[derive(Clone, Debug)]
pub struct SignalSender {
    space: SignalSpace,
}

impl SignalSender {
    /// Creates a sender over the given shared space.
    pub fn new(space: SignalSpace) -> Self {
        Self { space }
    }

    /// Posts `note` to the shared record, then rings the doorbell at `pid`.
    ///
    /// `pid` must be the top-level context of the receiving tree. If a
    /// previous note has not been consumed yet it is silently replaced
    /// (last-write-wins).
    #[cfg(unix)]
    pub fn send(&self, pid: i32, note: &SignalNote) -> Result<(), BusError> {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        self.space.post(note)?;
        kill(Pid::from_raw(pid), Signal::SIGUSR1).map_err(|e| BusError::Raise {
            error: e.to_string(),
        })
    }

    /// Raises an ordinary OS signal at `pid`, without touching the shared record.
    #[cfg(unix)]
    pub fn send_raw(&self, pid: i32, signal: nix::sys::signal::Signal) -> Result<(), BusError> {
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        kill(Pid::from_raw(pid), signal).map_err(|e| BusError::Raise {
            error: e.to_string(),
        })
    }

    /// User-defined signals need a doorbell signal; this host has none.
    #[cfg(not(unix))]
    pub fn send(&self, _pid: i32, _note: &SignalNote) -> Result<(), BusError> {
        Err(BusError::Unsupported)
    }
}

type Reaction = Box<dyn Fn(&SignalNote) + Send + Sync>;

/// Receiver side: waits for the doorbell and dispatches the pending note to
/// the reaction registered for its kind.
///
/// Reactions run synchronously in the hub's context; they are expected to be
/// quick — typically flipping a [`ControlSignal`](crate::ControlSignal) or
/// recording the correlation for a worker to pick up.
pub struct SignalHub {
    name: String,
    space: SignalSpace,
    reactions: HashMap<String, Reaction>,
    stop: SignalSlot,
}

impl SignalHub {
    /// Creates a hub over the given shared space.
    pub fn new(name: impl Into<String>, space: SignalSpace) -> Self {
        Self {
            name: name.into(),
            space,
            reactions: HashMap::new(),
            stop: SignalSlot::empty(),
        }
    }

    /// Registers a reaction for a signal kind. Replaces any previous reaction
    /// for the same kind.
    pub fn on(
        mut self,
        kind: impl Into<String>,
        reaction: impl Fn(&SignalNote) + Send + Sync + 'static,
    ) -> Self {
        self.reactions.insert(kind.into(), Box::new(reaction));
        self
    }

    /// Wires the stop signal at construction.
    pub fn with_stop_signal(mut self, signal: ControlSignal) -> Self {
        self.stop = SignalSlot::holding(signal);
        self
    }

    fn dispatch(&self, note: SignalNote) {
        match self.reactions.get(&note.kind) {
            Some(reaction) => {
                tracing::info!(kind = %note.kind, correlation = ?note.correlation, "dispatching signal");
                reaction(&note);
            }
            None => {
                tracing::warn!(kind = %note.kind, "no reaction registered; signal dropped");
            }
        }
    }

    #[cfg(unix)]
    async fn listen(&self) -> Result<(), WorkerError> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut doorbell = signal(SignalKind::user_defined1())
            .map_err(|e| WorkerError::fatal(format!("cannot install doorbell handler: {e}")))?;
        let mut stop = self.stop.get().map(ControlSignal::watch);

        loop {
            if self.is_stop_requested() {
                break;
            }
            tokio::select! {
                rung = doorbell.recv() => {
                    if rung.is_none() {
                        break;
                    }
                    match self.space.take() {
                        Ok(Some(note)) => self.dispatch(note),
                        Ok(None) => tracing::debug!("doorbell without pending note"),
                        Err(e) => tracing::warn!(label = e.as_label(), error = %e, "failed to read signal context"),
                    }
                }
                _ = wait_stop(&mut stop) => break,
            }
        }
        Ok(())
    }
}

/// Resolves when the stop signal is set; pends forever when none is wired.
async fn wait_stop(watch: &mut Option<ControlWatch>) {
    match watch {
        Some(w) => w.wait_set().await,
        None => std::future::pending().await,
    }
}

#[async_trait]
impl Worker for SignalHub {
    fn name(&self) -> &str {
        &self.name
    }

    fn stop_slot(&self) -> &SignalSlot {
        &self.stop
    }

    #[cfg(unix)]
    async fn body(&self) -> Result<(), WorkerError> {
        self.listen().await
    }

    #[cfg(not(unix))]
    async fn body(&self) -> Result<(), WorkerError> {
        Err(WorkerError::fatal(BusError::Unsupported))
    }
}
