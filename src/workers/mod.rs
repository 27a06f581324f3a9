//! Worker abstractions.
//!
//! - [`worker`]: the [`Worker`] trait and the fixed lifecycle skeleton behind `run()`;
//! - [`loop_worker`]: the [`LoopWorker`] active/inactive state machine and its
//!   [`LoopHooks`] trait, plus the function-backed [`WorkFn`] adapter.

mod loop_worker;
mod worker;

pub use loop_worker::{LoopHooks, LoopWorker, WorkFn};
pub use worker::{Worker, WorkerRef};
