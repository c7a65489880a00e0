//! The concrete Log Sink: plain stdout/stderr lines.

use svroll_core::LogSink;

/// Writes already-formatted status lines straight to the process's
/// stdout/stderr (spec.md §6).
pub struct StdioLogSink;

impl LogSink for StdioLogSink {
    fn stdout(&self, line: &str) {
        println!("{line}");
    }

    fn stderr(&self, line: &str) {
        eprintln!("{line}");
    }
}
