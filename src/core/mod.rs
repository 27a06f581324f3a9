//! Runtime core: the hierarchical supervisor and child launching.
//!
//! Internal modules:
//! - [`supervisor`]: owns a child list, propagates signals, launches and joins;
//! - [`launcher`]: starts one child per the configured concurrency mode.

mod launcher;
mod supervisor;

pub use supervisor::{ConcurrencyMode, Supervisor};
