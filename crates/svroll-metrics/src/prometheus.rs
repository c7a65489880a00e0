//! Prometheus text exposition format.
//!
//! Renders outcome-tag snapshots into the Prometheus text exposition
//! format for scraping by a Prometheus server or compatible agent.

use crate::collector::TagSnapshot;

/// Render a list of tag snapshots into Prometheus text format.
///
/// Produces GAUGE metrics labelled by outcome tag (`status:success`, etc).
pub fn render_prometheus(snapshots: &[TagSnapshot]) -> String {
    let mut out = String::new();

    out.push_str("# HELP svroll_restart_count Restarts observed for this outcome.\n");
    out.push_str("# TYPE svroll_restart_count counter\n");
    for s in snapshots {
        out.push_str(&format!("svroll_restart_count{{outcome=\"{}\"}} {}\n", s.tag, s.count));
    }

    out.push_str("# HELP svroll_restart_latency_p50_ms P50 restart latency in milliseconds.\n");
    out.push_str("# TYPE svroll_restart_latency_p50_ms gauge\n");
    for s in snapshots {
        out.push_str(&format!(
            "svroll_restart_latency_p50_ms{{outcome=\"{}\"}} {:.2}\n",
            s.tag, s.latency_p50_ms
        ));
    }

    out.push_str("# HELP svroll_restart_latency_p99_ms P99 restart latency in milliseconds.\n");
    out.push_str("# TYPE svroll_restart_latency_p99_ms gauge\n");
    for s in snapshots {
        out.push_str(&format!(
            "svroll_restart_latency_p99_ms{{outcome=\"{}\"}} {:.2}\n",
            s.tag, s.latency_p99_ms
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(tag: &str) -> TagSnapshot {
        TagSnapshot {
            tag: tag.to_string(),
            count: 3,
            latency_p50_ms: 5.2,
            latency_p99_ms: 45.8,
        }
    }

    #[test]
    fn render_empty() {
        let output = render_prometheus(&[]);
        assert!(output.contains("# HELP svroll_restart_count"));
        assert!(output.contains("# TYPE svroll_restart_count counter"));
    }

    #[test]
    fn render_single_tag() {
        let snapshots = vec![snapshot("status:success")];
        let output = render_prometheus(&snapshots);

        assert!(output.contains("svroll_restart_count{outcome=\"status:success\"} 3"));
        assert!(output.contains("svroll_restart_latency_p50_ms{outcome=\"status:success\"} 5.20"));
        assert!(output.contains("svroll_restart_latency_p99_ms{outcome=\"status:success\"} 45.80"));
    }

    #[test]
    fn render_multiple_tags() {
        let snapshots = vec![snapshot("status:success"), snapshot("status:failed")];
        let output = render_prometheus(&snapshots);

        assert!(output.contains("outcome=\"status:success\""));
        assert!(output.contains("outcome=\"status:failed\""));
    }

    #[test]
    fn render_format_is_prometheus_compatible() {
        let snapshots = vec![snapshot("status:timeout")];
        let output = render_prometheus(&snapshots);

        for line in output.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            assert!(line.contains('{') && line.contains('}'), "line should have labels: {line}");
        }
    }
}
