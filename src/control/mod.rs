//! Cross-context control primitives.
//!
//! - [`signal`]: the shared boolean [`ControlSignal`] and its [`ControlWatch`] reader;
//! - [`slot`]: the set-once [`SignalSlot`] a worker embeds for each signal it may receive.

mod signal;
mod slot;

pub use signal::{ControlSignal, ControlWatch};
pub use slot::SignalSlot;
