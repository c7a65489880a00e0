//! The concrete Lock Source: a well-known path checked once per phase.

use std::path::PathBuf;

use svroll_core::LockSource;

/// Default lock path; its presence makes a run a no-op success
/// (spec.md §6).
pub const DEFAULT_LOCK_PATH: &str = "/var/lock/dont-sv-rollout";

pub struct FileLockSource {
    path: PathBuf,
}

impl FileLockSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for FileLockSource {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_PATH)
    }
}

impl LockSource for FileLockSource {
    fn is_locked(&self) -> bool {
        self.path.exists()
    }
}
