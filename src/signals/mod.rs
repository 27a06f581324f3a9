//! User-defined signal multiplexing over a single reserved OS signal.
//!
//! The host delivers only a handful of asynchronous signal numbers, and only
//! to a process's own context. This module multiplexes an open-ended set of
//! logical signal kinds over exactly one of them:
//!
//! ```text
//! sender:                               top-level context:
//!   SignalSender::send(pid, note)
//!     ├─► SignalSpace::post(note)  ───► <tmp>/<context>.signal-context
//!     └─► raise SIGUSR1 at pid ───────► SignalHub (doorbell)
//!                                          ├─► SignalSpace::take()
//!                                          └─► reaction registered for note.kind
//! ```
//!
//! The low-level signal carries no information; it only prompts the receiver
//! to re-read the shared context record. Racing sends collapse to the last
//! write — this channel makes no delivery-ordering or delivery-count
//! guarantee and is unsuitable for rapid-fire signaling without external
//! throttling.

mod hub;
mod note;

pub use hub::{SignalHub, SignalSender};
pub use note::{SignalNote, SignalSpace};
