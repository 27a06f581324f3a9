//! Set-once holder for an injected [`ControlSignal`].
//!
//! A worker embeds one slot per signal it may receive. A slot filled at
//! construction keeps that signal for the worker's whole life; a later
//! [`SignalSlot::fill`] reports failure instead of replacing it. This is what
//! prevents a supervisor from silently overwriting a signal the tree already
//! wired for a child.

use std::sync::OnceLock;

use crate::control::ControlSignal;

/// Holder for at most one [`ControlSignal`], fillable exactly once.
#[derive(Debug, Default)]
pub struct SignalSlot {
    cell: OnceLock<ControlSignal>,
}

impl SignalSlot {
    /// Creates an empty slot.
    pub fn empty() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Creates a slot already holding `signal`.
    pub fn holding(signal: ControlSignal) -> Self {
        let slot = Self::empty();
        let _ = slot.cell.set(signal);
        slot
    }

    /// Creates a slot from an optional signal.
    pub fn from_option(signal: Option<ControlSignal>) -> Self {
        match signal {
            Some(s) => Self::holding(s),
            None => Self::empty(),
        }
    }

    /// Stores `signal` if the slot is empty.
    ///
    /// Returns `false` (and leaves the slot untouched) when a signal is
    /// already present. Callers treat a failed fill as a configuration
    /// concern, never as a fault.
    pub fn fill(&self, signal: ControlSignal) -> bool {
        self.cell.set(signal).is_ok()
    }

    /// Returns the held signal, if any.
    pub fn get(&self) -> Option<&ControlSignal> {
        self.cell.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_succeeds_only_once() {
        let slot = SignalSlot::empty();
        let first = ControlSignal::new(false);
        let second = ControlSignal::new(false);

        assert!(slot.fill(first.clone()));
        assert!(!slot.fill(second));

        let held = slot.get().unwrap();
        assert!(ControlSignal::same(held, &first));
    }

    #[test]
    fn constructed_holding_rejects_fill() {
        let own = ControlSignal::new(false);
        let slot = SignalSlot::holding(own.clone());
        assert!(!slot.fill(ControlSignal::new(false)));
        assert!(ControlSignal::same(slot.get().unwrap(), &own));
    }
}
