//! Repository configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, RepositoryError};

/// Where the repository looks for artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub path: PathBuf,
}

impl RepositoryConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load a config from a YAML file such as:
    ///
    /// ```yaml
    /// path: /var/lib/config-models
    /// ```
    pub fn load_at(file: &Path) -> Result<Self, RepositoryError> {
        let contents = std::fs::read_to_string(file).map_err(|e| io_err(file, e))?;
        serde_yaml::from_str(&contents).map_err(|e| RepositoryError::Config {
            path: file.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_yaml_config() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("repository.yaml");
        std::fs::write(&file, "path: /var/lib/config-models\n").unwrap();
        let config = RepositoryConfig::load_at(&file).unwrap();
        assert_eq!(config, RepositoryConfig::new("/var/lib/config-models"));
    }

    #[test]
    fn malformed_yaml_reports_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("repository.yaml");
        std::fs::write(&file, "path: [unterminated\n").unwrap();
        let err = RepositoryConfig::load_at(&file).unwrap_err();
        assert!(matches!(err, RepositoryError::Config { .. }));
        assert!(err.to_string().contains("repository.yaml"));
    }

    #[test]
    fn missing_config_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = RepositoryConfig::load_at(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, RepositoryError::Io { .. }));
    }
}
