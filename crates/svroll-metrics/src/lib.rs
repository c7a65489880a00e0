//! svroll metrics — observability for a single svroll deploy run.
//!
//! A [`MetricsCollector`] buckets restart outcomes by tag (`status:success`,
//! `status:timeout`, `status:failed`, `status:preempted`), tracking a count
//! and latency distribution per bucket. [`render_prometheus`] turns a
//! snapshot of those buckets into Prometheus text exposition format.
//!
//! Unlike a long-running service's metrics stack, there is no periodic
//! snapshot loop or persistent state store here — a deploy run is
//! short-lived, and the collector is read once at the end of the run.

pub mod collector;
pub mod prometheus;

pub use collector::{MetricsCollector, TagSnapshot};
pub use prometheus::render_prometheus;
