//! Per-unit outcomes and deploy-level results.

/// The result of restarting a single service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The restart completed successfully.
    Success { service: String },
    /// The supervisor reported a timeout while restarting.
    Timeout { service: String },
    /// The restart failed for any other reason.
    Failed { service: String, message: String },
    /// The unit was cancelled while still in flight, after it was safe to do so.
    Preempted { service: String },
}

impl Outcome {
    /// The service this outcome belongs to.
    pub fn service(&self) -> &str {
        match self {
            Outcome::Success { service }
            | Outcome::Timeout { service }
            | Outcome::Failed { service, .. }
            | Outcome::Preempted { service } => service,
        }
    }

    /// Short tag used for metrics and logs. `status:failed` for `Failed`,
    /// never `status:success` (an earlier revision of this tool emitted
    /// that for the failure path by mistake).
    pub fn tag(&self) -> &'static str {
        match self {
            Outcome::Success { .. } => "status:success",
            Outcome::Timeout { .. } => "status:timeout",
            Outcome::Failed { .. } => "status:failed",
            Outcome::Preempted { .. } => "status:preempted",
        }
    }
}

/// The outcome of an entire deploy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployResult {
    /// Every unit succeeded, or tolerated timeouts/preemptions stayed within budget.
    Success,
    /// At least one unit failed outright; `failures_permitted` is always 0.
    TooManyFailures,
    /// More units timed out than the phase's tolerance allowed.
    TooManyTimeouts,
}

impl DeployResult {
    /// Process exit code for this result: `0` on success, `1` on any abort.
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployResult::Success => 0,
            DeployResult::TooManyFailures | DeployResult::TooManyTimeouts => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_tags() {
        assert_eq!(Outcome::Success { service: "a".into() }.tag(), "status:success");
        assert_eq!(Outcome::Timeout { service: "a".into() }.tag(), "status:timeout");
        assert_eq!(
            Outcome::Failed { service: "a".into(), message: "boom".into() }.tag(),
            "status:failed"
        );
        assert_eq!(Outcome::Preempted { service: "a".into() }.tag(), "status:preempted");
    }

    #[test]
    fn outcome_service_name() {
        let o = Outcome::Failed { service: "svc".into(), message: "x".into() };
        assert_eq!(o.service(), "svc");
    }

    #[test]
    fn exit_codes() {
        assert_eq!(DeployResult::Success.exit_code(), 0);
        assert_eq!(DeployResult::TooManyFailures.exit_code(), 1);
        assert_eq!(DeployResult::TooManyTimeouts.exit_code(), 1);
    }
}
