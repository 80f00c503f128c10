//! External collaborators: the schema binding generator and the build
//! toolchain.
//!
//! The pipeline only talks to the [`Toolchain`] trait, so tests substitute a
//! fake that records calls. [`CommandToolchain`] is the real implementation:
//! it spawns the configured programs with the working tree as their working
//! directory and inherits stdout/stderr unchanged. Neither call has a timeout.

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::{Path, PathBuf};
use std::process::Command;

use config_model_core::Mode;

use crate::error::{io_err, CompileError, CompileStep};

/// Binding generator invoked when none is configured.
pub const DEFAULT_BINDING_GENERATOR: &str = "yang-bindgen";

/// A generated source tree ready for the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    /// Per-model working directory (`<output>/<safe_name>`).
    pub root: PathBuf,
    /// Library target name declared in the generated manifest.
    pub lib_name: String,
}

/// Capability the pipeline needs from the outside world.
pub trait Toolchain {
    /// Turn the schema files into one bindings file inside `package`.
    ///
    /// `schema_files` and `output_file` are relative to `tree.root`.
    fn generate_bindings(
        &self,
        tree: &SourceTree,
        schema_files: &[PathBuf],
        output_file: &Path,
        package: &str,
    ) -> Result<(), CompileError>;

    /// Build `tree` into a dynamically loadable artifact at `artifact`.
    fn build(&self, tree: &SourceTree, artifact: &Path, mode: Mode) -> Result<(), CompileError>;
}

/// Runs a binding-generator program and `cargo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandToolchain {
    pub binding_generator: String,
    pub cargo: String,
}

impl Default for CommandToolchain {
    fn default() -> Self {
        Self {
            binding_generator: DEFAULT_BINDING_GENERATOR.to_string(),
            cargo: std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string()),
        }
    }
}

impl CommandToolchain {
    pub fn with_binding_generator(mut self, program: impl Into<String>) -> Self {
        self.binding_generator = program.into();
        self
    }

    /// Path of the library cargo produces for `tree`.
    pub fn built_library(tree: &SourceTree) -> PathBuf {
        tree.root
            .join("target")
            .join("release")
            .join(format!("{DLL_PREFIX}{}{DLL_SUFFIX}", tree.lib_name))
    }
}

impl Toolchain for CommandToolchain {
    fn generate_bindings(
        &self,
        tree: &SourceTree,
        schema_files: &[PathBuf],
        output_file: &Path,
        package: &str,
    ) -> Result<(), CompileError> {
        let mut cmd = Command::new(&self.binding_generator);
        cmd.current_dir(&tree.root)
            .arg(format!("--path={}", config_model_core::naming::SCHEMA_DIR))
            .arg(format!("--output_file={}", output_file.display()))
            .arg(format!("--package_name={package}"))
            .arg("--generate_fakeroot")
            .args(schema_files);
        run(CompileStep::GenerateBindings, &self.binding_generator, cmd)
    }

    fn build(&self, tree: &SourceTree, artifact: &Path, mode: Mode) -> Result<(), CompileError> {
        tracing::info!(%mode, "building {}", tree.root.display());
        let mut cmd = Command::new(&self.cargo);
        cmd.current_dir(&tree.root)
            .args(["build", "--release", "--lib"])
            .args(["--manifest-path", "Cargo.toml"])
            .args(["--target-dir", "target"]);
        run(CompileStep::Build, &self.cargo, cmd)?;

        let built = Self::built_library(tree);
        std::fs::copy(&built, artifact).map_err(|e| io_err(CompileStep::Build, &built, e))?;
        Ok(())
    }
}

fn run(step: CompileStep, program: &str, mut cmd: Command) -> Result<(), CompileError> {
    tracing::debug!("running {:?}", cmd);
    let status = cmd.status().map_err(|e| CompileError::ExternalProcess {
        step,
        program: program.to_string(),
        reason: format!("could not be started: {e}"),
    })?;
    if !status.success() {
        return Err(CompileError::ExternalProcess {
            step,
            program: program.to_string(),
            reason: format!("exited with {status}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree(dir: &TempDir) -> SourceTree {
        SourceTree {
            root: dir.path().to_path_buf(),
            lib_name: "devicesim_1_0_0".to_string(),
        }
    }

    #[test]
    fn missing_binding_generator_cannot_start() {
        let dir = TempDir::new().unwrap();
        let toolchain =
            CommandToolchain::default().with_binding_generator("config-model-no-such-generator");
        let err = toolchain
            .generate_bindings(&tree(&dir), &[], Path::new("src/plugin/generated.rs"), "plugin")
            .unwrap_err();
        assert_eq!(err.step(), Some(CompileStep::GenerateBindings));
        assert!(err.to_string().contains("could not be started"), "got: {err}");
    }

    #[test]
    #[cfg(unix)]
    fn failing_program_reports_exit_status() {
        let dir = TempDir::new().unwrap();
        let toolchain = CommandToolchain::default().with_binding_generator("false");
        let err = toolchain
            .generate_bindings(&tree(&dir), &[], Path::new("src/plugin/generated.rs"), "plugin")
            .unwrap_err();
        assert!(matches!(err, CompileError::ExternalProcess { .. }));
        assert!(err.to_string().contains("exited with"), "got: {err}");
    }

    #[test]
    fn built_library_uses_platform_naming() {
        let dir = TempDir::new().unwrap();
        let path = CommandToolchain::built_library(&tree(&dir));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(name, format!("{DLL_PREFIX}devicesim_1_0_0{DLL_SUFFIX}"));
        assert!(path.starts_with(dir.path().join("target").join("release")));
    }
}
