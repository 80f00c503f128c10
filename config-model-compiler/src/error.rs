//! Error types for config-model-compiler.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use config_model_core::DescriptorError;
use config_model_renderer::RenderError;

/// Pipeline steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompileStep {
    EnsureOutputRoot,
    EnsureModuleDir,
    GenerateManifest,
    GenerateEntryPoint,
    EnsurePackageDir,
    GenerateModel,
    GenerateUnmarshaller,
    GenerateValidator,
    GeneratePlugin,
    EnsureSchemaDir,
    CopyModules,
    GenerateBindings,
    Build,
}

impl fmt::Display for CompileStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompileStep::EnsureOutputRoot => "ensure output root",
            CompileStep::EnsureModuleDir => "ensure module dir",
            CompileStep::GenerateManifest => "generate manifest",
            CompileStep::GenerateEntryPoint => "generate entry point",
            CompileStep::EnsurePackageDir => "ensure package dir",
            CompileStep::GenerateModel => "generate model",
            CompileStep::GenerateUnmarshaller => "generate unmarshaller",
            CompileStep::GenerateValidator => "generate validator",
            CompileStep::GeneratePlugin => "generate plugin",
            CompileStep::EnsureSchemaDir => "ensure schema dir",
            CompileStep::CopyModules => "copy modules",
            CompileStep::GenerateBindings => "generate bindings",
            CompileStep::Build => "build",
        };
        f.write_str(name)
    }
}

/// All errors a compile can end with. Everything except `Descriptor` carries
/// the step that failed.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The model descriptor failed validation; nothing was written.
    #[error("invalid model descriptor: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("{step}: I/O error at {path}: {source}")]
    Io {
        step: CompileStep,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template definition was missing or malformed.
    #[error("{step}: {source}")]
    Template {
        step: CompileStep,
        #[source]
        source: RenderError,
    },

    /// The binding generator or the build toolchain could not be started or
    /// exited unsuccessfully.
    #[error("{step}: `{program}` {reason}")]
    ExternalProcess {
        step: CompileStep,
        program: String,
        reason: String,
    },
}

impl CompileError {
    /// The step that produced this error, if any.
    pub fn step(&self) -> Option<CompileStep> {
        match self {
            CompileError::Descriptor(_) => None,
            CompileError::Io { step, .. }
            | CompileError::Template { step, .. }
            | CompileError::ExternalProcess { step, .. } => Some(*step),
        }
    }

    /// Wrap a render failure, keeping target I/O failures as [`CompileError::Io`].
    pub(crate) fn render(step: CompileStep, err: RenderError) -> Self {
        match err {
            RenderError::Io { path, source } => CompileError::Io { step, path, source },
            other => CompileError::Template { step, source: other },
        }
    }
}

/// Convenience constructor for [`CompileError::Io`].
pub(crate) fn io_err(step: CompileStep, path: impl Into<PathBuf>, source: std::io::Error) -> CompileError {
    CompileError::Io {
        step,
        path: path.into(),
        source,
    }
}
