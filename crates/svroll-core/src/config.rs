//! The immutable per-run deploy configuration.

use crate::error::ConfigError;

/// Configuration for a single deploy run. Immutable once constructed;
/// every field maps 1:1 to a CLI flag owned by `svroll-cli`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployConfig {
    /// Fraction of services restarted first, as canaries. `0` disables canary.
    pub canary_ratio: f64,
    /// Concurrency of the rollout phase, as a fraction of the rollout set.
    pub chunk_ratio: f64,
    /// Fraction of canaries allowed to time out without failing the deploy.
    pub canary_timeout_tolerance: f64,
    /// Fraction of the full service set allowed to time out.
    pub timeout_tolerance: f64,
    /// Per-unit restart wait, in seconds, passed to the Restart Executor.
    pub per_unit_timeout_seconds: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            canary_ratio: 0.001,
            chunk_ratio: 0.2,
            canary_timeout_tolerance: 0.0,
            timeout_tolerance: 0.0,
            per_unit_timeout_seconds: 90,
        }
    }
}

impl DeployConfig {
    /// Validate the invariants spec.md §3 requires of a config: ratios in
    /// `[0, 1]`, `chunk_ratio >= canary_ratio`, and a positive timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("canary-ratio", self.canary_ratio),
            ("chunk-ratio", self.chunk_ratio),
            ("canary-timeout-tolerance", self.canary_timeout_tolerance),
            ("timeout-tolerance", self.timeout_tolerance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RatioOutOfRange { field, value });
            }
        }

        if self.chunk_ratio < self.canary_ratio {
            return Err(ConfigError::ChunkRatioTooSmall {
                canary_ratio: self.canary_ratio,
                chunk_ratio: self.chunk_ratio,
            });
        }

        if self.per_unit_timeout_seconds == 0 {
            return Err(ConfigError::NonPositiveTimeout(self.per_unit_timeout_seconds));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> DeployConfig {
        DeployConfig::default()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn chunk_ratio_must_be_at_least_canary_ratio() {
        let cfg = DeployConfig { canary_ratio: 0.5, chunk_ratio: 0.1, ..valid() };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ChunkRatioTooSmall { canary_ratio: 0.5, chunk_ratio: 0.1 })
        );
    }

    #[test]
    fn ratios_out_of_range_are_rejected() {
        let cfg = DeployConfig { canary_ratio: 1.5, ..valid() };
        assert!(matches!(cfg.validate(), Err(ConfigError::RatioOutOfRange { .. })));

        let cfg = DeployConfig { timeout_tolerance: -0.1, ..valid() };
        assert!(matches!(cfg.validate(), Err(ConfigError::RatioOutOfRange { .. })));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = DeployConfig { per_unit_timeout_seconds: 0, ..valid() };
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveTimeout(0)));
    }

    #[test]
    fn equal_canary_and_chunk_ratio_is_allowed() {
        let cfg = DeployConfig { canary_ratio: 0.2, chunk_ratio: 0.2, ..valid() };
        assert!(cfg.validate().is_ok());
    }
}
