//! Error types for config-model-repository.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while discovering or activating model artifacts.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The artifact is missing, is not a loadable module, or was built by an
    /// incompatible toolchain.
    #[error("failed to load model artifact {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// The artifact loaded but does not export the plugin declaration.
    #[error("model artifact {path} does not export `{symbol}`")]
    SymbolNotFound { path: PathBuf, symbol: String },

    /// The exported declaration does not carry the expected header.
    #[error("model artifact {path} has an invalid plugin declaration: {reason}")]
    InvalidContract { path: PathBuf, reason: String },

    /// Directory walk failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on config load.
    #[error("failed to parse repository config at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RepositoryError {
    RepositoryError::Io {
        path: path.into(),
        source,
    }
}
