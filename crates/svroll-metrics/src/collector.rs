//! Metrics collector — tracks per-outcome-tag counters and latency samples.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tracing::debug;

use svroll_core::MetricsSink;

/// Per-tag bucket of timing samples (microseconds). A deploy run is
/// short-lived, so buckets only ever grow — there is no reset/snapshot
/// loop here, unlike a long-running service's metrics collector.
#[derive(Default)]
struct Bucket {
    count: u64,
    samples_us: Vec<u64>,
}

/// A snapshot of one outcome tag's counters, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct TagSnapshot {
    pub tag: String,
    pub count: u64,
    pub latency_p50_ms: f64,
    pub latency_p99_ms: f64,
}

/// Collects restart timing samples, tagged by outcome (`status:success`,
/// `status:timeout`, `status:failed`, `status:preempted`).
#[derive(Default)]
pub struct MetricsCollector {
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every tag's counters and latency percentiles, sorted by tag.
    pub fn snapshot(&self) -> Vec<TagSnapshot> {
        let buckets = self.buckets.lock().unwrap();
        let mut snapshots: Vec<TagSnapshot> = buckets
            .iter()
            .map(|(tag, bucket)| {
                let (p50, p99) = compute_percentiles(&bucket.samples_us);
                TagSnapshot {
                    tag: tag.clone(),
                    count: bucket.count,
                    latency_p50_ms: p50,
                    latency_p99_ms: p99,
                }
            })
            .collect();
        snapshots.sort_by(|a, b| a.tag.cmp(&b.tag));
        snapshots
    }
}

impl MetricsSink for MetricsCollector {
    fn record(&self, service: &str, tag: &str, duration: Duration) {
        let mut buckets = self.buckets.lock().unwrap();
        let bucket = buckets.entry(tag.to_string()).or_default();
        bucket.count += 1;
        bucket.samples_us.push(duration.as_micros() as u64);
        debug!(service, tag, micros = duration.as_micros(), "recorded restart outcome");
    }
}

/// Compute P50 and P99 latency (milliseconds) from a list of microsecond
/// samples. Returns `(0.0, 0.0)` for an empty set.
fn compute_percentiles(samples_us: &[u64]) -> (f64, f64) {
    if samples_us.is_empty() {
        return (0.0, 0.0);
    }

    let mut sorted = samples_us.to_vec();
    sorted.sort_unstable();

    let p50_idx = (sorted.len() as f64 * 0.50) as usize;
    let p99_idx = (sorted.len() as f64 * 0.99) as usize;

    let p50 = sorted[p50_idx.min(sorted.len() - 1)] as f64 / 1000.0;
    let p99 = sorted[p99_idx.min(sorted.len() - 1)] as f64 / 1000.0;

    (p50, p99)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_bucketed_by_tag() {
        let collector = MetricsCollector::new();
        collector.record("a", "status:success", Duration::from_millis(5));
        collector.record("b", "status:success", Duration::from_millis(10));
        collector.record("c", "status:failed", Duration::from_millis(1));

        let snapshots = collector.snapshot();
        assert_eq!(snapshots.len(), 2);

        let success = snapshots.iter().find(|s| s.tag == "status:success").unwrap();
        assert_eq!(success.count, 2);

        let failed = snapshots.iter().find(|s| s.tag == "status:failed").unwrap();
        assert_eq!(failed.count, 1);
    }

    #[test]
    fn empty_collector_snapshots_to_nothing() {
        let collector = MetricsCollector::new();
        assert!(collector.snapshot().is_empty());
    }

    #[test]
    fn percentiles_empty() {
        let (p50, p99) = compute_percentiles(&[]);
        assert_eq!(p50, 0.0);
        assert_eq!(p99, 0.0);
    }

    #[test]
    fn percentiles_distribution() {
        let samples: Vec<u64> = (1..=100).map(|i| i * 1000).collect();
        let (p50, p99) = compute_percentiles(&samples);
        assert!(p50 >= 49.0 && p50 <= 51.0, "p50 was {p50}");
        assert!(p99 >= 98.0 && p99 <= 100.0, "p99 was {p99}");
    }
}
