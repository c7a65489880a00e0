//! The external-collaborator interfaces the orchestrator core consumes.
//!
//! Each of these is "out of scope" per spec.md §1: the core only depends
//! on the interface, so tests can substitute deterministic stand-ins
//! (see spec.md §9, "Swappable Executor").

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::EnumerateError;

/// A one-shot, idempotent, multi-waiter signal.
///
/// Used for both the per-unit `preempt` signal (controller -> unit) and
/// `preemption_acceptable` (executor -> unit). Raising it twice is a
/// no-op, never an error; any number of tasks may await it.
#[derive(Debug, Default)]
pub struct Latch {
    raised: AtomicBool,
    notify: tokio::sync::Notify,
}

/// Shared handle to a [`Latch`].
pub type LatchHandle = Arc<Latch>;

impl Latch {
    pub fn new() -> LatchHandle {
        Arc::new(Self::default())
    }

    /// Raise the latch. Idempotent: the second and later calls do nothing.
    pub fn raise(&self) {
        if !self.raised.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Wait until the latch is raised. Returns immediately if it already was.
    pub async fn wait(&self) {
        if self.is_raised() {
            return;
        }
        let notified = self.notify.notified();
        if self.is_raised() {
            return;
        }
        notified.await;
    }
}

/// Restarts a single service and reports its combined output and error.
///
/// Implementations must raise `preemption_acceptable` once abandoning the
/// wait is safe (spec.md §4.2, §6) — a grace period after the supervisor
/// subprocess has been spawned is the usual signal.
#[async_trait]
pub trait RestartExecutor: Send + Sync {
    async fn execute(
        &self,
        timeout_seconds: u64,
        service: &str,
        preemption_acceptable: LatchHandle,
    ) -> (Vec<u8>, Option<String>);
}

/// Produces the ordered list of service names matching a glob pattern.
pub trait ServiceEnumerator: Send + Sync {
    fn enumerate(&self, pattern: &str) -> Result<Vec<String>, EnumerateError>;
}

/// Receives already-formatted `[index/N] (service) message` status lines.
pub trait LogSink: Send + Sync {
    fn stdout(&self, line: &str);
    fn stderr(&self, line: &str);
}

/// Optional sink for per-unit timing samples, tagged by outcome.
pub trait MetricsSink: Send + Sync {
    fn record(&self, service: &str, tag: &str, duration: Duration);
}

/// Checked once at the start of each phase (spec.md §6); a present lock
/// aborts the deploy before any unit in that phase is dispatched.
pub trait LockSource: Send + Sync {
    fn is_locked(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn latch_wait_returns_immediately_if_already_raised() {
        let latch = Latch::new();
        latch.raise();
        tokio::time::timeout(Duration::from_millis(50), latch.wait())
            .await
            .expect("wait should not block once raised");
    }

    #[tokio::test]
    async fn latch_wakes_waiters_on_raise() {
        let latch = Latch::new();
        let waiter = tokio::spawn({
            let latch = Arc::clone(&latch);
            async move {
                latch.wait().await;
            }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        latch.raise();

        tokio::time::timeout(Duration::from_millis(200), waiter)
            .await
            .expect("waiter should complete after raise")
            .unwrap();
    }

    #[test]
    fn latch_raise_is_idempotent() {
        let latch = Latch::new();
        latch.raise();
        latch.raise();
        assert!(latch.is_raised());
    }
}
