//! The concrete Service Enumerator: globs a supervision directory.

use std::path::PathBuf;

use svroll_core::{EnumerateError, ServiceEnumerator};

/// Default runit supervision directory.
const DEFAULT_SUPERVISION_DIR: &str = "/etc/service";

/// Globs `{supervision_dir}/{pattern}` and returns the base name of each
/// match, in the order `glob` yields them (spec.md §6 — the core treats
/// this order as authoritative for canary selection and log indices).
pub struct GlobServiceEnumerator {
    supervision_dir: PathBuf,
}

impl GlobServiceEnumerator {
    pub fn new(supervision_dir: impl Into<PathBuf>) -> Self {
        Self { supervision_dir: supervision_dir.into() }
    }
}

impl Default for GlobServiceEnumerator {
    fn default() -> Self {
        Self::new(DEFAULT_SUPERVISION_DIR)
    }
}

impl ServiceEnumerator for GlobServiceEnumerator {
    fn enumerate(&self, pattern: &str) -> Result<Vec<String>, EnumerateError> {
        let full_pattern = self.supervision_dir.join(pattern).to_string_lossy().into_owned();

        let matches = glob::glob(&full_pattern).map_err(|err| EnumerateError::Pattern {
            pattern: full_pattern.clone(),
            message: err.to_string(),
        })?;

        let mut names = Vec::new();
        for entry in matches {
            let path = entry.map_err(glob::GlobError::into_error)?;
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn supervision_dir_with(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        dir
    }

    #[test]
    fn matches_are_returned_as_base_names() {
        let dir = supervision_dir_with(&["web-1", "web-2", "worker-1"]);
        let enumerator = GlobServiceEnumerator::new(dir.path());
        let mut names = enumerator.enumerate("web-*").unwrap();
        names.sort();
        assert_eq!(names, vec!["web-1", "web-2"]);
    }

    #[test]
    fn no_matches_is_an_empty_list_not_an_error() {
        let dir = supervision_dir_with(&["web-1"]);
        let enumerator = GlobServiceEnumerator::new(dir.path());
        assert_eq!(enumerator.enumerate("nothing-*").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn invalid_pattern_is_a_pattern_error() {
        let dir = TempDir::new().unwrap();
        let enumerator = GlobServiceEnumerator::new(dir.path());
        let err = enumerator.enumerate("[").unwrap_err();
        assert!(matches!(err, EnumerateError::Pattern { .. }));
    }
}
