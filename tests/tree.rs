//! End-to-end supervision tree scenarios.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use workvisor::{
    ConcurrencyMode, ControlSignal, LoopHooks, LoopOptions, LoopWorker, StatePublisher,
    Supervisor, Worker, WorkerError, WorkerRef,
};

/// Routes worker logs to the test harness; filter with `RUST_LOG`.
fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Loop hooks that count passes and activity edges.
struct Probe {
    name: String,
    passes: Arc<AtomicUsize>,
    activations: Arc<AtomicUsize>,
}

impl Probe {
    fn new(name: &str) -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let passes = Arc::new(AtomicUsize::new(0));
        let activations = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name: name.to_string(),
                passes: passes.clone(),
                activations: activations.clone(),
            },
            passes,
            activations,
        )
    }
}

#[async_trait]
impl LoopHooks for Probe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn work(&self) -> Result<(), WorkerError> {
        self.passes.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(1)).await;
        Ok(())
    }

    async fn on_activate(&self) {
        self.activations.fetch_add(1, Ordering::SeqCst);
    }
}

fn fast() -> LoopOptions {
    LoopOptions::default().poll(Duration::from_millis(1))
}

fn probe_worker(name: &str) -> (Arc<LoopWorker>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let (probe, passes, activations) = Probe::new(name);
    let worker = Arc::new(LoopWorker::new(Arc::new(probe)).with_options(fast()));
    (worker, passes, activations)
}

/// The full scenario: a Processes-mode root holding a logging loop worker and
/// a nested Threads-mode supervisor whose two loop workers share one wait
/// signal. Toggling the wait signal from outside drives both inner workers
/// active together; setting the root stop signal brings every context down
/// and the outer `run()` returns.
#[tokio::test]
async fn mixed_mode_tree_pauses_and_stops_cooperatively() {
    init_tracing();
    let stop = ControlSignal::new(false);
    let wait = ControlSignal::new(false);

    let (logger, logger_passes, _) = probe_worker("logger");
    let (inner_a, passes_a, activations_a) = probe_worker("inner-a");
    let (inner_b, passes_b, activations_b) = probe_worker("inner-b");

    let nested = Arc::new(Supervisor::with_signals(
        "nested",
        ConcurrencyMode::Threads,
        vec![inner_a as WorkerRef, inner_b as WorkerRef],
        None,
        Some(wait.clone()),
    ));

    let root = Supervisor::with_signals(
        "root",
        ConcurrencyMode::Processes,
        vec![logger as WorkerRef, nested as WorkerRef],
        Some(stop.clone()),
        None,
    );

    let handle = tokio::spawn(async move { root.run().await });

    // Inner workers hold a wait signal at false: inactive, no passes.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(activations_a.load(Ordering::SeqCst), 0);
    assert_eq!(activations_b.load(Ordering::SeqCst), 0);
    assert_eq!(passes_a.load(Ordering::SeqCst), 0);

    // The logger has no wait signal: active from the start.
    assert!(logger_passes.load(Ordering::SeqCst) >= 1);

    // Toggle from an external context: both inner workers activate together.
    wait.store(true);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(activations_a.load(Ordering::SeqCst), 1);
    assert_eq!(activations_b.load(Ordering::SeqCst), 1);
    assert!(passes_a.load(Ordering::SeqCst) >= 1);
    assert!(passes_b.load(Ordering::SeqCst) >= 1);

    // Pause again: exactly one more edge would be counted on reactivation,
    // none while the level stays constant.
    wait.store(false);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(activations_a.load(Ordering::SeqCst), 1);

    // Stop the whole tree from outside.
    stop.set();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("root run() must return after the stop cascade")
        .unwrap();
    assert!(stop.is_set());
}

/// Setting the shared stop signal from any holder terminates every worker
/// within a bounded number of passes, and the signal never reads false again.
#[tokio::test]
async fn stop_set_by_any_holder_terminates_all() {
    init_tracing();
    let stop = ControlSignal::new(false);

    let (a, passes_a, _) = probe_worker("a");
    let (b, passes_b, _) = probe_worker("b");

    let root = Supervisor::with_signals(
        "root",
        ConcurrencyMode::Threads,
        vec![a as WorkerRef, b as WorkerRef],
        Some(stop.clone()),
        None,
    );

    let handle = tokio::spawn(async move { root.run().await });
    tokio::time::sleep(Duration::from_millis(30)).await;

    // Any holder may originate the stop; here it is the external test context.
    stop.set();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("tree must come down")
        .unwrap();

    let final_a = passes_a.load(Ordering::SeqCst);
    let final_b = passes_b.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(30)).await;
    // No passes after termination, and the stop signal stays set.
    assert_eq!(passes_a.load(Ordering::SeqCst), final_a);
    assert_eq!(passes_b.load(Ordering::SeqCst), final_b);
    assert!(stop.is_set());
}

/// States published by loop workers are observable (and advisory) from
/// outside the tree.
#[tokio::test]
async fn published_states_track_the_lifecycle() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let publisher = StatePublisher::new(dir.path());
    let stop = ControlSignal::new(false);
    let wait = ControlSignal::new(true);

    let (probe, _, _) = Probe::new("observed");
    let worker = Arc::new(
        LoopWorker::new(Arc::new(probe))
            .with_options(fast())
            .with_publisher(publisher.clone()),
    );

    let root = Supervisor::with_signals(
        "root",
        ConcurrencyMode::Threads,
        vec![worker as WorkerRef],
        Some(stop.clone()),
        Some(wait.clone()),
    );

    let handle = tokio::spawn(async move { root.run().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let record = publisher.read("observed").unwrap().expect("published");
    assert!(record.active);
    assert_eq!(record.status, "active");

    stop.set();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();

    let record = publisher.read("observed").unwrap().expect("published");
    assert!(!record.active);
    assert_eq!(record.status, "stopped");
}
