//! The derived canary/rollout plan, computed once from services + config.

use crate::config::DeployConfig;

/// The canary/rollout split and tolerance thresholds derived from a
/// service list and a [`DeployConfig`]. Computed once at the start of a
/// run and never mutated afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub canary_set: Vec<String>,
    pub rollout_set: Vec<String>,
    pub canary_timeouts_permitted: usize,
    pub rollout_timeouts_permitted: usize,
    pub total_timeouts_permitted: usize,
    pub rollout_concurrency: usize,
    /// Failures tolerated per phase. Always `0` today, but kept as an
    /// explicit field rather than a hardcoded literal — see spec.md §9.
    pub failures_permitted: usize,
}

impl Plan {
    /// Partition `services` into canary/rollout sets and compute every
    /// tolerance threshold, per spec.md §3.
    pub fn new(services: &[String], config: &DeployConfig) -> Self {
        let n_canary = ceil_ratio(services.len(), config.canary_ratio);
        let canary_set = services[..n_canary.min(services.len())].to_vec();
        let rollout_set = services[n_canary.min(services.len())..].to_vec();

        let canary_timeouts_permitted = ceil_ratio(canary_set.len(), config.canary_timeout_tolerance);
        let rollout_timeouts_permitted = ceil_ratio(rollout_set.len(), config.timeout_tolerance);
        let total_timeouts_permitted = canary_timeouts_permitted + rollout_timeouts_permitted;
        let rollout_concurrency = ceil_ratio(rollout_set.len(), config.chunk_ratio);

        Self {
            canary_set,
            rollout_set,
            canary_timeouts_permitted,
            rollout_timeouts_permitted,
            total_timeouts_permitted,
            rollout_concurrency,
            failures_permitted: 0,
        }
    }

    /// Total number of services across both phases.
    pub fn total_services(&self) -> usize {
        self.canary_set.len() + self.rollout_set.len()
    }
}

/// `ceil(ratio * n)`, the rounding rule used throughout the plan:
/// canary size, permitted timeouts, and rollout concurrency.
fn ceil_ratio(n: usize, ratio: f64) -> usize {
    (ratio * n as f64).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("svc-{i}")).collect()
    }

    fn config(canary_ratio: f64, chunk_ratio: f64, canary_tol: f64, tol: f64) -> DeployConfig {
        DeployConfig {
            canary_ratio,
            chunk_ratio,
            canary_timeout_tolerance: canary_tol,
            timeout_tolerance: tol,
            per_unit_timeout_seconds: 90,
        }
    }

    #[test]
    fn canary_split_rounding() {
        // n=4, r=0 -> (0, 4)
        let p = Plan::new(&services(4), &config(0.0, 0.2, 0.0, 0.0));
        assert_eq!((p.canary_set.len(), p.rollout_set.len()), (0, 4));

        // n=7, r=0.001 -> (1, 6)
        let p = Plan::new(&services(7), &config(0.001, 0.2, 0.0, 0.0));
        assert_eq!((p.canary_set.len(), p.rollout_set.len()), (1, 6));

        // n=5, r=0.5 -> (3, 2)
        let p = Plan::new(&services(5), &config(0.5, 0.5, 0.0, 0.0));
        assert_eq!((p.canary_set.len(), p.rollout_set.len()), (3, 2));
    }

    #[test]
    fn canary_set_is_a_prefix_in_discovery_order() {
        let svcs = services(5);
        let p = Plan::new(&svcs, &config(0.5, 0.5, 0.0, 0.0));
        assert_eq!(p.canary_set, svcs[..3]);
        assert_eq!(p.rollout_set, svcs[3..]);
    }

    #[test]
    fn permitted_timeouts_rounding() {
        // n=3, tol=0 -> 0
        assert_eq!(ceil_ratio(3, 0.0), 0);
        // n=6, tol=0.001 -> 1
        assert_eq!(ceil_ratio(6, 0.001), 1);
        // n=6, tol=1 -> 6
        assert_eq!(ceil_ratio(6, 1.0), 6);
    }

    #[test]
    fn total_timeouts_permitted_sums_both_phases() {
        let p = Plan::new(&services(10), &config(0.3, 0.3, 0.5, 0.2));
        assert_eq!(
            p.total_timeouts_permitted,
            p.canary_timeouts_permitted + p.rollout_timeouts_permitted
        );
    }

    #[test]
    fn empty_canary_ratio_skips_canary_entirely() {
        let p = Plan::new(&services(4), &config(0.0, 1.0, 0.0, 0.0));
        assert!(p.canary_set.is_empty());
        assert_eq!(p.canary_timeouts_permitted, 0);
        assert_eq!(p.rollout_concurrency, 4);
    }

    #[test]
    fn failures_permitted_defaults_to_zero() {
        let p = Plan::new(&services(3), &config(0.0, 1.0, 0.0, 0.0));
        assert_eq!(p.failures_permitted, 0);
    }
}
