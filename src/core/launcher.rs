//! # Launch one child worker in its own execution context.
//!
//! The two concurrency modes map onto the host like this:
//!
//! - [`ConcurrencyMode::Threads`]: the child runs as a task on the ambient
//!   tokio runtime — shared executor, shared memory, named only by its span.
//! - [`ConcurrencyMode::Processes`]: the child runs on a dedicated OS thread
//!   named `p-<worker>`, driving its own `current_thread` runtime. The thread
//!   is OS-scheduled independently of the parent's executor, which is the
//!   closest the host gets to the isolation of a process per child without
//!   serializing the worker across an address-space boundary.
//!
//! Either way the worker's `run()` is invoked identically; a worker never
//! learns which mode launched it. Both context kinds are joined through the
//! same [`JoinSet`], so the supervisor waits on one uniform collection.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::core::ConcurrencyMode;
use crate::workers::Worker;

/// Starts `worker` in a fresh execution context and registers its join handle.
///
/// Launch failures (thread spawn, runtime construction) are logged and the
/// child is treated as terminated; they never abort the supervisor.
pub(crate) fn launch(set: &mut JoinSet<()>, mode: ConcurrencyMode, worker: Arc<dyn Worker>) {
    match mode {
        ConcurrencyMode::Threads => {
            set.spawn(async move { worker.run().await });
        }
        ConcurrencyMode::Processes => {
            let context = format!("p-{}", worker.name());
            let spawned = std::thread::Builder::new().name(context.clone()).spawn({
                let context = context.clone();
                move || match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt.block_on(worker.run()),
                    Err(e) => {
                        tracing::error!(context = %context, error = %e, "context runtime unavailable")
                    }
                }
            });

            match spawned {
                Ok(handle) => {
                    set.spawn(async move {
                        match tokio::task::spawn_blocking(move || handle.join()).await {
                            Ok(Ok(())) => {}
                            Ok(Err(_panic)) => {
                                tracing::error!(context = %context, "child context panicked")
                            }
                            Err(e) => {
                                tracing::error!(context = %context, error = %e, "child context join failed")
                            }
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(context = %context, error = %e, "failed to start child context")
                }
            }
        }
    }
}
