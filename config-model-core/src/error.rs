//! Error types for config-model-core.

use thiserror::Error;

/// Errors raised while parsing or validating model descriptors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// A module key did not split into exactly two `@`-separated parts.
    #[error("module key '{key}' must be in the format $name@$version")]
    Format { key: String },

    #[error("model name must not be empty")]
    EmptyName,

    #[error("version of model '{model}' must not be empty")]
    EmptyVersion { model: String },

    #[error("module #{index} of model '{model}' has an empty name or version")]
    EmptyModuleField { model: String, index: usize },

    #[error("module {name}@{version} is declared twice in model '{model}'")]
    DuplicateModule {
        model: String,
        name: String,
        version: String,
    },
}

/// Errors a loaded model reports from its marshal, unmarshal and validate
/// operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("failed to unmarshal configuration: {0}")]
    Unmarshal(String),

    #[error("failed to marshal configuration: {0}")]
    Marshal(String),

    #[error("configuration is invalid: {0}")]
    Invalid(String),

    /// The tree handed to a validator was produced by another model.
    #[error("configuration root does not belong to model {0}")]
    ForeignRoot(String),
}
