//! # workvisor
//!
//! **Workvisor** is a supervision framework for long-running worker units
//! arranged in a nestable tree.
//!
//! It provides a uniform lifecycle for heterogeneous workers (one-shot tasks
//! and continuous loops), propagates lifecycle control — "stop everything",
//! "pause/resume this subset" — through arbitrarily deep trees, and
//! multiplexes an open-ended set of application-defined signal kinds over a
//! single reserved OS signal.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌───────────────────┐
//!     │  LoopWorker  │   │  LoopWorker  │   │ Supervisor (Threads)
//!     │  (leaf unit) │   │  (leaf unit) │   │  └─ more workers… │
//!     └──────┬───────┘   └──────┬───────┘   └─────────┬─────────┘
//!            ▼                  ▼                     ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Supervisor (mode = Processes | Threads)                      │
//! │  - propagates stop/wait ControlSignals into empty slots       │
//! │  - launches one execution context per child, joins them all   │
//! └──────────────┬───────────────────────────────┬────────────────┘
//!                ▼                               ▼
//!        ControlSignal (stop)            ControlSignal (wait)
//!        set by ANY holder ──► observed  toggled freely ──► edges drive
//!        eventually by ALL               active/inactive transitions
//!
//!  side channels:
//!    SignalSender ──► SignalSpace (shared record) ──► SIGUSR1 ──► SignalHub
//!    LoopWorker   ──► StatePublisher (one file per worker, advisory)
//! ```
//!
//! ## Lifecycle
//! Every worker runs the same fixed skeleton:
//! ```text
//! run():
//!   span ► before() ► body() ► after() [always] ► stop cascade [unless in progress]
//! ```
//! `run()` never propagates an error. A worker body fault is logged and —
//! by deliberate fail-fast policy — terminates the whole tree through the
//! shared stop signal. A loop worker's per-pass fault is the one exception:
//! logged, and the loop continues (transient errors must not kill a loop
//! that is expected to run indefinitely).
//!
//! ## Features
//! | Area               | Description                                               | Key types                                |
//! |--------------------|-----------------------------------------------------------|------------------------------------------|
//! | **Lifecycle**      | Fixed run skeleton, cleanup on every exit path.           | [`Worker`], [`WorkerError`]              |
//! | **Loops**          | Active/inactive state machine with per-pass isolation.    | [`LoopWorker`], [`LoopHooks`], [`WorkFn`]|
//! | **Supervision**    | Nestable tree, signal propagation, launch + join.         | [`Supervisor`], [`ConcurrencyMode`]      |
//! | **Control**        | Cross-context shared booleans, set-once injection slots.  | [`ControlSignal`], [`SignalSlot`]        |
//! | **User signals**   | One doorbell signal + shared record, dispatch by kind.    | [`SignalHub`], [`SignalSender`], [`SignalNote`] |
//! | **Observability**  | Advisory file-backed state register for external readers. | [`StatePublisher`], [`StateRecord`]      |
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use workvisor::{
//!     ConcurrencyMode, ControlSignal, LoopWorker, Supervisor, WorkFn, Worker, WorkerError,
//!     WorkerRef,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let stop = ControlSignal::new(false);
//!     let wait = ControlSignal::new(true);
//!
//!     let reader = LoopWorker::arc(WorkFn::arc("reader", || async {
//!         // read one frame...
//!         tokio::time::sleep(Duration::from_millis(50)).await;
//!         Ok::<_, WorkerError>(())
//!     }));
//!
//!     let root = Supervisor::with_signals(
//!         "root",
//!         ConcurrencyMode::Processes,
//!         vec![reader as WorkerRef],
//!         Some(stop.clone()),
//!         Some(wait.clone()),
//!     );
//!
//!     // Somewhere else: wait.store(false) pauses, stop.set() tears down.
//!     root.run().await;
//! }
//! ```

mod config;
mod control;
mod core;
mod error;
mod signals;
mod state;
mod workers;

// ---- Public re-exports ----

pub use config::LoopOptions;
pub use control::{ControlSignal, ControlWatch, SignalSlot};
pub use core::{ConcurrencyMode, Supervisor};
pub use error::{BusError, StateError, WorkerError};
pub use signals::{SignalHub, SignalNote, SignalSender, SignalSpace};
pub use state::{StatePublisher, StateRecord};
pub use workers::{LoopHooks, LoopWorker, WorkFn, Worker, WorkerRef};
