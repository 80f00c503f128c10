//! Error types for config-model-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from rendering a template definition.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template definition file does not exist.
    #[error("template definition not found at {path}")]
    NotFound { path: PathBuf },

    /// Tera could not parse the definition or render it with the context.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Reading the definition or writing the rendered target failed.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// True for lookup and parse failures, false for target I/O failures.
    pub fn is_template_error(&self) -> bool {
        matches!(self, RenderError::NotFound { .. } | RenderError::Tera(_))
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
