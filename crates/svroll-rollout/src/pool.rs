//! Worker Pool — a growable set of tasks draining a shared dispatch queue.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

use svroll_core::{LogSink, MetricsSink, Outcome, RestartExecutor};

use crate::unit::UnitRestarter;

/// Dispatches [`UnitRestarter`]s to a pool of workers that grows as the
/// deploy advances from canary to rollout, and collects their [`Outcome`]s
/// on a single channel (spec.md §4.3).
pub struct WorkerPool {
    work_tx: mpsc::Sender<UnitRestarter>,
    work_rx: Arc<Mutex<mpsc::Receiver<UnitRestarter>>>,
    result_tx: mpsc::Sender<Outcome>,
    executor: Arc<dyn RestartExecutor>,
    log: Arc<dyn LogSink>,
    metrics: Option<Arc<dyn MetricsSink>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(
        executor: Arc<dyn RestartExecutor>,
        log: Arc<dyn LogSink>,
        metrics: Option<Arc<dyn MetricsSink>>,
        queue_capacity: usize,
    ) -> (Self, mpsc::Receiver<Outcome>) {
        let (work_tx, work_rx) = mpsc::channel(queue_capacity.max(1));
        let (result_tx, result_rx) = mpsc::channel(queue_capacity.max(1));
        (
            Self {
                work_tx,
                work_rx: Arc::new(Mutex::new(work_rx)),
                result_tx,
                executor,
                log,
                metrics,
                handles: Vec::new(),
            },
            result_rx,
        )
    }

    /// Spawn `count` more workers. Existing workers are never torn down;
    /// they exit on their own once the dispatch queue is closed.
    pub fn grow(&mut self, count: usize) {
        for _ in 0..count {
            let work_rx = Arc::clone(&self.work_rx);
            let result_tx = self.result_tx.clone();
            let executor = Arc::clone(&self.executor);
            let log = Arc::clone(&self.log);
            let metrics = self.metrics.clone();
            self.handles.push(tokio::spawn(async move {
                worker_loop(work_rx, result_tx, executor, log, metrics).await;
            }));
        }
        debug!(spawned = count, total = self.handles.len(), "worker pool grown");
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    pub async fn dispatch(&self, unit: UnitRestarter) {
        if self.work_tx.send(unit).await.is_err() {
            tracing::error!("dispatch queue closed unexpectedly");
        }
    }

    /// Close the dispatch queue. Workers already holding a unit finish it;
    /// idle workers see the channel close and return.
    pub fn close(self) {
        drop(self.work_tx);
    }
}

async fn worker_loop(
    work_rx: Arc<Mutex<mpsc::Receiver<UnitRestarter>>>,
    result_tx: mpsc::Sender<Outcome>,
    executor: Arc<dyn RestartExecutor>,
    log: Arc<dyn LogSink>,
    metrics: Option<Arc<dyn MetricsSink>>,
) {
    loop {
        let unit = {
            let mut rx = work_rx.lock().await;
            rx.recv().await
        };
        let Some(unit) = unit else { break };
        let outcome = unit
            .restart(executor.as_ref(), log.as_ref(), metrics.as_deref())
            .await;
        if result_tx.send(outcome).await.is_err() {
            break;
        }
    }
}
