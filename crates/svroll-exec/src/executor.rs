//! The concrete Restart Executor: shells out to `sv restart` via the
//! runit supervisor CLI.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use svroll_core::{LatchHandle, RestartExecutor};

/// Grace period after spawn before `preemption_acceptable` is raised —
/// long enough for `sv` to have delivered its signal to the old process.
const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(100);

/// Restarts a service by spawning `sv -w <timeout> restart <service>` and
/// capturing its combined output (spec.md §6).
pub struct ProcessRestartExecutor {
    command: String,
    grace_period: Duration,
}

impl ProcessRestartExecutor {
    pub fn new() -> Self {
        Self { command: "sv".to_string(), grace_period: DEFAULT_GRACE_PERIOD }
    }

    /// Override the supervisor binary, e.g. in tests.
    pub fn with_command(command: impl Into<String>) -> Self {
        Self { command: command.into(), ..Self::new() }
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }
}

impl Default for ProcessRestartExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RestartExecutor for ProcessRestartExecutor {
    async fn execute(
        &self,
        timeout_seconds: u64,
        service: &str,
        preemption_acceptable: LatchHandle,
    ) -> (Vec<u8>, Option<String>) {
        let mut cmd = Command::new(&self.command);
        cmd.arg("-w")
            .arg(timeout_seconds.to_string())
            .arg("restart")
            .arg(service)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(service, timeout_seconds, "spawning restart");

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                warn!(service, %err, "failed to spawn supervisor command");
                preemption_acceptable.raise();
                return (Vec::new(), Some(err.to_string()));
            }
        };

        let grace_period = self.grace_period;
        tokio::spawn(async move {
            tokio::time::sleep(grace_period).await;
            preemption_acceptable.raise();
        });

        // Waited on in a detached task so a dropped `execute()` future (the
        // unit was preempted) never cuts the supervisor subprocess's wait
        // short — the process keeps running un-killed, just un-waited-on.
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(child.wait_with_output().await);
        });

        match rx.await {
            Ok(Ok(output)) => {
                let mut combined = output.stdout;
                combined.extend_from_slice(&output.stderr);
                let error = if output.status.success() {
                    None
                } else {
                    Some(format!("exit status: {}", output.status))
                };
                (combined, error)
            }
            Ok(Err(err)) => (Vec::new(), Some(err.to_string())),
            Err(_) => (Vec::new(), Some("restart task ended without a result".to_string())),
        }
    }
}
