//! # ControlSignal: a shared boolean visible to every execution context that holds it.
//!
//! [`ControlSignal`] is a thin wrapper around [`tokio::sync::watch`] shared by
//! cloning. Every clone observes the same value; a write by any holder is
//! eventually visible to all of them. Two usage disciplines are built on the
//! same primitive:
//!
//! - **Stop flavor**: call [`ControlSignal::set`] only. The value transitions
//!   `false → true` exactly once per tree run and is never reset.
//! - **Wait/active flavor**: toggle freely via [`ControlSignal::store`] or
//!   [`ControlSignal::toggle`]. Readers compare against their last-observed
//!   value to detect an edge, not merely a level.
//!
//! The discipline is enforced by convention, not by the type.
//!
//! ## Rules
//! - Visibility is **eventual**, not lockstep; holders must not assume a
//!   sibling has reacted to a change.
//! - Blocking observation goes through [`ControlSignal::watch`]; callers bound
//!   waits with a small timeout so a change is missed by at most one interval.

use std::sync::Arc;

use tokio::sync::watch;

/// Cross-context shared boolean.
///
/// Cheap to clone; all clones refer to the same underlying value.
#[derive(Clone, Debug)]
pub struct ControlSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ControlSignal {
    /// Creates a new signal with the given initial value.
    pub fn new(initial: bool) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Sets the signal (stop flavor). Idempotent; never unset it afterwards.
    pub fn set(&self) {
        self.store(true);
    }

    /// Stores a value (wait/active flavor).
    pub fn store(&self, value: bool) {
        self.tx.send_replace(value);
    }

    /// Flips the value and returns the new one (wait/active flavor).
    pub fn toggle(&self) -> bool {
        let mut now = false;
        self.tx.send_modify(|v| {
            *v = !*v;
            now = *v;
        });
        now
    }

    /// Returns the current value.
    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// Returns `true` once the signal has been set (stop flavor reading).
    pub fn is_set(&self) -> bool {
        self.get()
    }

    /// Creates an independent reader for edge detection and blocking waits.
    pub fn watch(&self) -> ControlWatch {
        ControlWatch {
            rx: self.tx.subscribe(),
        }
    }

    /// Returns `true` when both handles refer to the same underlying signal.
    ///
    /// Used to verify propagation wiring: a child that received its
    /// supervisor's signal holds the *same* signal, not an equal copy.
    pub fn same(a: &ControlSignal, b: &ControlSignal) -> bool {
        Arc::ptr_eq(&a.tx, &b.tx)
    }
}

/// Reader side of a [`ControlSignal`].
///
/// Each watch tracks the last value it observed, so [`ControlWatch::changed`]
/// resolves once per write, never on repeated reads of an unchanged value.
#[derive(Debug)]
pub struct ControlWatch {
    rx: watch::Receiver<bool>,
}

impl ControlWatch {
    /// Returns the current value without waiting.
    pub fn get(&self) -> bool {
        *self.rx.borrow()
    }

    /// Waits for the next write and returns the value observed.
    ///
    /// If every [`ControlSignal`] handle has been dropped the value can no
    /// longer change; the current value is returned instead of waiting forever.
    pub async fn changed(&mut self) -> bool {
        if self.rx.changed().await.is_err() {
            return *self.rx.borrow();
        }
        *self.rx.borrow_and_update()
    }

    /// Waits until the value is `true`. Returns immediately if it already is.
    ///
    /// Also returns if every signal handle has been dropped (the value is
    /// frozen and waiting would never resolve).
    pub async fn wait_set(&mut self) {
        let _ = self.rx.wait_for(|v| *v).await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn set_is_visible_to_all_clones() {
        let a = ControlSignal::new(false);
        let b = a.clone();
        assert!(!b.is_set());
        a.set();
        assert!(b.is_set());
        // Idempotent.
        b.set();
        assert!(a.is_set());
    }

    #[test]
    fn same_distinguishes_identity_from_equality() {
        let a = ControlSignal::new(false);
        let b = a.clone();
        let c = ControlSignal::new(false);
        assert!(ControlSignal::same(&a, &b));
        assert!(!ControlSignal::same(&a, &c));
    }

    #[test]
    fn toggle_flips_and_reports() {
        let s = ControlSignal::new(false);
        assert!(s.toggle());
        assert!(s.get());
        assert!(!s.toggle());
        assert!(!s.get());
    }

    #[tokio::test]
    async fn watch_sees_one_change_per_write() {
        let s = ControlSignal::new(false);
        let mut w = s.watch();

        s.store(true);
        assert!(w.changed().await);

        // No further write: a bounded wait must time out rather than report
        // the unchanged value again.
        let timed = tokio::time::timeout(Duration::from_millis(20), w.changed()).await;
        assert!(timed.is_err());
    }

    #[tokio::test]
    async fn wait_set_returns_when_already_set() {
        let s = ControlSignal::new(true);
        let mut w = s.watch();
        tokio::time::timeout(Duration::from_millis(20), w.wait_set())
            .await
            .unwrap();
    }
}
