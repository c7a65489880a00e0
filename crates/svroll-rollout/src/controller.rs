//! Phase Controller — drives the two-phase `CANARY -> ROLLOUT` state machine.

use std::sync::Arc;

use tracing::{debug, info, warn};

use svroll_core::{DeployResult, LatchHandle, LockSource, LogSink, MetricsSink, Plan, RestartExecutor};

use crate::accountant::ToleranceAccountant;
use crate::pool::WorkerPool;
use crate::unit::UnitRestarter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Canary,
    Rollout,
}

/// Owns a single deploy run end to end: sizing the pool, dispatching units,
/// draining results, and deciding success/abort (spec.md §4.1).
pub struct PhaseController {
    plan: Plan,
    executor: Arc<dyn RestartExecutor>,
    log: Arc<dyn LogSink>,
    metrics: Option<Arc<dyn MetricsSink>>,
    lock: Arc<dyn LockSource>,
    per_unit_timeout_seconds: u64,
}

impl PhaseController {
    pub fn new(
        plan: Plan,
        executor: Arc<dyn RestartExecutor>,
        log: Arc<dyn LogSink>,
        metrics: Option<Arc<dyn MetricsSink>>,
        lock: Arc<dyn LockSource>,
        per_unit_timeout_seconds: u64,
    ) -> Self {
        Self { plan, executor, log, metrics, lock, per_unit_timeout_seconds }
    }

    /// Run the deploy to completion. Never returns early while units are
    /// still outstanding except on tolerance breach, per spec.md §5.
    pub async fn run(&self) -> DeployResult {
        let n = self.plan.total_services();
        if n == 0 {
            return DeployResult::Success;
        }

        let mut accountant = ToleranceAccountant::new(
            n,
            self.plan.canary_set.len(),
            self.plan.canary_timeouts_permitted,
            self.plan.failures_permitted,
        );
        let (mut pool, mut results) = WorkerPool::new(
            Arc::clone(&self.executor),
            Arc::clone(&self.log),
            self.metrics.clone(),
            n,
        );

        let mut all_units: Vec<LatchHandle> = Vec::with_capacity(n);
        let mut next_index = 0usize;
        let mut dispatched = 0usize;
        let mut phase = Phase::Canary;

        if self.lock.is_locked() {
            info!("lock file present, skipping deploy");
            return DeployResult::Success;
        }

        if self.plan.canary_set.is_empty() {
            debug!("canary set empty, entering rollout directly");
            accountant.set_timeouts_permitted(self.plan.total_timeouts_permitted);
            phase = Phase::Rollout;
            self.enter_rollout(&mut pool, &mut all_units, &mut next_index, &mut dispatched, n).await;
            if dispatched == 0 {
                return DeployResult::Success;
            }
        } else {
            pool.grow(self.plan.canary_set.len());
            for service in self.plan.canary_set.clone() {
                next_index += 1;
                let unit = UnitRestarter::new(service, next_index, n, self.per_unit_timeout_seconds);
                all_units.push(unit.preempt_handle());
                pool.dispatch(unit).await;
                dispatched += 1;
            }
        }

        while let Some(outcome) = results.recv().await {
            accountant.record(&outcome);

            if accountant.too_many_failures() {
                warn!(failures = accountant.failures(), "aborting deploy: too many failures");
                pool.close();
                return DeployResult::TooManyFailures;
            }
            if accountant.too_many_timeouts() {
                warn!(timeouts = accountant.timeouts(), "aborting deploy: too many timeouts");
                pool.close();
                return DeployResult::TooManyTimeouts;
            }

            match phase {
                Phase::Canary if accountant.canary_passed() => {
                    if self.lock.is_locked() {
                        info!("lock file present, skipping rollout phase");
                        pool.close();
                        return DeployResult::Success;
                    }
                    accountant.set_timeouts_permitted(self.plan.total_timeouts_permitted);
                    phase = Phase::Rollout;
                    self.enter_rollout(&mut pool, &mut all_units, &mut next_index, &mut dispatched, n)
                        .await;
                    if accountant.all_complete() {
                        pool.close();
                        return DeployResult::Success;
                    }
                }
                Phase::Canary => {
                    self.maybe_preempt_rest(&accountant, &all_units, dispatched);
                }
                Phase::Rollout => {
                    if accountant.all_complete() {
                        pool.close();
                        return DeployResult::Success;
                    }
                    self.maybe_preempt_rest(&accountant, &all_units, dispatched);
                }
            }
        }

        // The result channel only closes once every worker has exited,
        // which only happens after the dispatch queue is closed. We never
        // close it before a terminal return above, so reaching this point
        // indicates every unit already resolved.
        if accountant.all_complete() {
            DeployResult::Success
        } else {
            DeployResult::TooManyTimeouts
        }
    }

    async fn enter_rollout(
        &self,
        pool: &mut WorkerPool,
        all_units: &mut Vec<LatchHandle>,
        next_index: &mut usize,
        dispatched: &mut usize,
        n: usize,
    ) {
        let additional_workers =
            self.plan.rollout_concurrency.saturating_sub(self.plan.canary_set.len());
        pool.grow(additional_workers);
        for service in self.plan.rollout_set.clone() {
            *next_index += 1;
            let unit = UnitRestarter::new(service, *next_index, n, self.per_unit_timeout_seconds);
            all_units.push(unit.preempt_handle());
            pool.dispatch(unit).await;
            *dispatched += 1;
        }
    }

    /// Broadcast preemption once the remaining outstanding units could all
    /// time out and the deploy would still be a success (spec.md §4.1, §4.4).
    fn maybe_preempt_rest(&self, accountant: &ToleranceAccountant, all_units: &[LatchHandle], dispatched: usize) {
        let remaining = dispatched.saturating_sub(accountant.results_received());
        if remaining > 0 && accountant.can_preempt_rest(remaining) {
            debug!(remaining, "outcome already determined, preempting outstanding units");
            for handle in all_units {
                handle.raise();
            }
        }
    }
}
