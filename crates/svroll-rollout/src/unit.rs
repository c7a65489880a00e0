//! Unit Restarter — owns the restart lifecycle of a single service.

use std::sync::Arc;
use std::time::Instant;

use svroll_core::{Latch, LatchHandle, LogSink, MetricsSink, Outcome, RestartExecutor};

/// Restarts one service, classifies the result, and supports preemption.
///
/// State machine: `PENDING -> RUNNING -> {SUCCEEDED | TIMED_OUT | FAILED |
/// PREEMPTED}`. The `RUNNING -> PREEMPTED` transition only happens once
/// the executor's `preemption_acceptable` latch has been raised.
pub struct UnitRestarter {
    service: String,
    index: usize,
    n_services: usize,
    timeout_seconds: u64,
    preempt: LatchHandle,
}

impl UnitRestarter {
    pub fn new(service: String, index: usize, n_services: usize, timeout_seconds: u64) -> Self {
        Self {
            service,
            index,
            n_services,
            timeout_seconds,
            preempt: Latch::new(),
        }
    }

    /// A handle the controller can retain in `all_units` to broadcast preemption.
    pub fn preempt_handle(&self) -> LatchHandle {
        Arc::clone(&self.preempt)
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Run the restart to completion, racing the executor against preemption.
    pub async fn restart(
        &self,
        executor: &dyn RestartExecutor,
        log: &dyn LogSink,
        metrics: Option<&dyn MetricsSink>,
    ) -> Outcome {
        log.stdout(&self.line("restarting"));
        let start = Instant::now();

        let preemption_acceptable = Latch::new();
        let exec_fut = executor.execute(
            self.timeout_seconds,
            &self.service,
            Arc::clone(&preemption_acceptable),
        );
        tokio::pin!(exec_fut);

        let outcome = tokio::select! {
            biased;
            (output, error) = &mut exec_fut => self.classify(output, error),
            _ = self.preempt.wait() => {
                // Mandatory ordering: never report Preempted until the executor
                // says abandoning the wait is safe.
                preemption_acceptable.wait().await;
                Outcome::Preempted { service: self.service.clone() }
            }
        };

        match &outcome {
            Outcome::Success { .. } => log.stdout(&self.line("successfully restarted")),
            Outcome::Timeout { .. } => log.stderr(&self.line("did not restart in time")),
            Outcome::Failed { .. } => log.stderr(&self.line("failed to restart")),
            Outcome::Preempted { .. } => log.stderr(&self.line("was not required to restart in time")),
        }

        if let Some(sink) = metrics {
            sink.record(&self.service, outcome.tag(), start.elapsed());
        }

        outcome
    }

    /// Idempotent: raising an already-raised preempt signal is a no-op.
    pub fn preempt(&self) {
        self.preempt.raise();
    }

    fn classify(&self, output: Vec<u8>, error: Option<String>) -> Outcome {
        match error {
            None => Outcome::Success { service: self.service.clone() },
            Some(_) => {
                let combined = String::from_utf8_lossy(&output);
                if combined.contains("timeout: run: ") {
                    Outcome::Timeout { service: self.service.clone() }
                } else {
                    Outcome::Failed {
                        service: self.service.clone(),
                        message: combined.into_owned(),
                    }
                }
            }
        }
    }

    fn line(&self, message: &str) -> String {
        format!("[{}/{}] ({}) {}", self.index, self.n_services, self.service, message)
    }
}
