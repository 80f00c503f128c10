//! Plugin compiler: the ordered pipeline from descriptor to artifact.
//!
//! Steps run strictly in [`CompileStep`] order. There is no retry and no
//! rollback: a failure returns the first error and leaves whatever was
//! already written on disk. Directory creation is idempotent, and schema
//! copies follow the configured [`CopyPolicy`](config_model_core::CopyPolicy),
//! so a later compile of the same `(name, version)` steps over the residue.

use std::path::{Path, PathBuf};

use config_model_core::{naming, ArtifactDescriptor, CompilationSettings, ModelDescriptor};
use config_model_renderer::{render_template, TemplateContext, TemplateKind};

use crate::error::{io_err, CompileError, CompileStep};
use crate::toolchain::{CommandToolchain, SourceTree, Toolchain};
use crate::writer::{write_module, WriteResult};

/// Compile `model` with `settings` and the default [`CommandToolchain`].
pub fn compile_plugin(
    model: &ModelDescriptor,
    settings: CompilationSettings,
) -> Result<ArtifactDescriptor, CompileError> {
    PluginCompiler::new(settings).compile_plugin(model)
}

/// Drives source-tree generation and the external tools for one settings set.
pub struct PluginCompiler<T = CommandToolchain> {
    settings: CompilationSettings,
    toolchain: T,
}

impl PluginCompiler<CommandToolchain> {
    pub fn new(settings: CompilationSettings) -> Self {
        Self::with_toolchain(settings, CommandToolchain::default())
    }
}

impl<T: Toolchain> PluginCompiler<T> {
    pub fn with_toolchain(settings: CompilationSettings, toolchain: T) -> Self {
        Self { settings, toolchain }
    }

    pub fn settings(&self) -> &CompilationSettings {
        &self.settings
    }

    pub fn toolchain(&self) -> &T {
        &self.toolchain
    }

    /// Run the full pipeline for `model`.
    ///
    /// The descriptor is validated before anything touches the filesystem.
    pub fn compile_plugin(&self, model: &ModelDescriptor) -> Result<ArtifactDescriptor, CompileError> {
        model.validate()?;
        let output = self.settings.output_path.as_path();
        tracing::info!(
            model = %model.name,
            version = %model.version,
            "compiling model plugin into {}",
            output.display()
        );

        ensure_dir(CompileStep::EnsureOutputRoot, output)?;
        ensure_dir(CompileStep::EnsureModuleDir, &naming::module_dir(output, model))?;
        self.generate(model, TemplateKind::Manifest)?;
        // The entry point is the first file under `src/`.
        ensure_dir(CompileStep::GenerateEntryPoint, &naming::source_dir(output, model))?;
        self.generate(model, TemplateKind::EntryPoint)?;

        ensure_dir(CompileStep::EnsurePackageDir, &naming::package_dir(output, model))?;
        self.generate(model, TemplateKind::Model)?;
        self.generate(model, TemplateKind::Unmarshaller)?;
        self.generate(model, TemplateKind::Validator)?;
        self.generate(model, TemplateKind::Plugin)?;

        ensure_dir(CompileStep::EnsureSchemaDir, &naming::schema_dir(output, model))?;
        self.copy_modules(model)?;

        let tree = SourceTree {
            root: naming::module_dir(output, model),
            lib_name: naming::lib_name(model),
        };
        self.generate_bindings(model, &tree)?;

        let artifact = naming::plugin_file(output, model);
        tracing::info!("[{}] {}", CompileStep::Build, artifact.display());
        self.toolchain.build(&tree, &artifact, self.settings.mode)?;

        tracing::info!("compiled {}", artifact.display());
        Ok(ArtifactDescriptor::new(
            model.name.clone(),
            model.version.clone(),
            artifact,
        ))
    }

    /// Context for one render. Rebuilt every time so each file sees the
    /// current working directory.
    fn template_context(&self, model: &ModelDescriptor, step: CompileStep) -> Result<TemplateContext, CompileError> {
        let cwd = std::env::current_dir().map_err(|e| io_err(step, ".", e))?;
        let module_dir = naming::module_dir(&self.settings.output_path, model);
        let module_dir = if module_dir.is_absolute() {
            module_dir
        } else {
            cwd.join(module_dir)
        };
        Ok(TemplateContext::new(
            model,
            self.settings.mode,
            &self.settings.toolchain_version,
            &naming::relative_path(&module_dir, &cwd),
        ))
    }

    fn generate(&self, model: &ModelDescriptor, kind: TemplateKind) -> Result<(), CompileError> {
        let step = step_for(kind);
        let ctx = self.template_context(model, step)?;
        let definition = kind.definition_path(&self.settings.template_path);
        let target = output_path(&self.settings.output_path, model, kind);
        tracing::info!("[{step}] {}", target.display());
        render_template(kind, &definition, &ctx, &target).map_err(|e| CompileError::render(step, e))
    }

    fn copy_modules(&self, model: &ModelDescriptor) -> Result<Vec<WriteResult>, CompileError> {
        let output = self.settings.output_path.as_path();
        let mut writes = Vec::with_capacity(model.modules.len());
        for module in &model.modules {
            let path = naming::schema_path(output, model, module);
            writes.push(write_module(&path, &module.data, self.settings.copy_policy)?);
        }
        let skipped = writes
            .iter()
            .filter(|w| matches!(w, WriteResult::Skipped { .. }))
            .count();
        tracing::info!(
            "[{}] {} written, {} already present",
            CompileStep::CopyModules,
            writes.len() - skipped,
            skipped
        );
        Ok(writes)
    }

    fn generate_bindings(&self, model: &ModelDescriptor, tree: &SourceTree) -> Result<(), CompileError> {
        let schema_files: Vec<PathBuf> = model
            .modules
            .iter()
            .map(|m| Path::new(naming::SCHEMA_DIR).join(naming::schema_file(m)))
            .collect();
        let output_file = Path::new(naming::SOURCE_DIR)
            .join(naming::PACKAGE_NAME)
            .join(naming::GENERATED_FILE);
        tracing::info!("[{}] {}", CompileStep::GenerateBindings, output_file.display());
        self.toolchain
            .generate_bindings(tree, &schema_files, &output_file, naming::PACKAGE_NAME)
    }
}

/// Where a rendered file lands inside the working tree.
pub fn output_path(output: &Path, model: &ModelDescriptor, kind: TemplateKind) -> PathBuf {
    match kind {
        TemplateKind::Manifest => naming::module_path(output, model, kind.output_file()),
        TemplateKind::EntryPoint => naming::source_dir(output, model).join(kind.output_file()),
        _ => naming::package_path(output, model, kind.output_file()),
    }
}

fn step_for(kind: TemplateKind) -> CompileStep {
    match kind {
        TemplateKind::Manifest => CompileStep::GenerateManifest,
        TemplateKind::EntryPoint => CompileStep::GenerateEntryPoint,
        TemplateKind::Model => CompileStep::GenerateModel,
        TemplateKind::Unmarshaller => CompileStep::GenerateUnmarshaller,
        TemplateKind::Validator => CompileStep::GenerateValidator,
        TemplateKind::Plugin => CompileStep::GeneratePlugin,
    }
}

fn ensure_dir(step: CompileStep, dir: &Path) -> Result<(), CompileError> {
    std::fs::create_dir_all(dir).map_err(|e| io_err(step, dir, e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use config_model_core::{ModuleDescriptor, Mode};
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingToolchain {
        calls: RefCell<Vec<&'static str>>,
    }

    impl Toolchain for RecordingToolchain {
        fn generate_bindings(
            &self,
            _tree: &SourceTree,
            _schema_files: &[PathBuf],
            _output_file: &Path,
            _package: &str,
        ) -> Result<(), CompileError> {
            self.calls.borrow_mut().push("bindings");
            Ok(())
        }

        fn build(&self, _tree: &SourceTree, artifact: &Path, _mode: Mode) -> Result<(), CompileError> {
            self.calls.borrow_mut().push("build");
            std::fs::write(artifact, b"artifact").map_err(|e| io_err(CompileStep::Build, artifact, e))
        }
    }

    fn template_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("templates")
    }

    fn devicesim() -> ModelDescriptor {
        ModelDescriptor::new("devicesim", "1.0.0")
            .with_module(ModuleDescriptor::new("devicesim", "1.0.0", b"module devicesim {}".to_vec()))
    }

    #[test]
    fn output_paths_follow_layout() {
        let out = Path::new("/tmp/out");
        let model = devicesim();
        assert_eq!(
            output_path(out, &model, TemplateKind::Manifest),
            PathBuf::from("/tmp/out/devicesim_1_0_0/Cargo.toml")
        );
        assert_eq!(
            output_path(out, &model, TemplateKind::EntryPoint),
            PathBuf::from("/tmp/out/devicesim_1_0_0/src/lib.rs")
        );
        assert_eq!(
            output_path(out, &model, TemplateKind::Plugin),
            PathBuf::from("/tmp/out/devicesim_1_0_0/src/plugin/plugin.rs")
        );
    }

    #[test]
    fn every_kind_maps_to_a_distinct_step() {
        let steps: std::collections::HashSet<_> =
            TemplateKind::all().iter().map(|k| step_for(*k)).collect();
        assert_eq!(steps.len(), TemplateKind::all().len());
    }

    #[test]
    fn bindings_run_before_build() {
        let out = TempDir::new().unwrap();
        let settings = CompilationSettings {
            template_path: template_root(),
            output_path: out.path().to_path_buf(),
            ..CompilationSettings::default()
        };
        let compiler = PluginCompiler::with_toolchain(settings, RecordingToolchain::default());
        compiler.compile_plugin(&devicesim()).expect("compile");
        assert_eq!(*compiler.toolchain().calls.borrow(), ["bindings", "build"]);
    }

    #[test]
    fn relative_output_produces_relative_artifact_path() {
        let out = TempDir::new_in(".").unwrap();
        let relative = PathBuf::from(out.path().file_name().unwrap());
        let settings = CompilationSettings {
            template_path: template_root(),
            output_path: relative.clone(),
            ..CompilationSettings::default()
        };
        let compiler = PluginCompiler::with_toolchain(settings, RecordingToolchain::default());
        let artifact = compiler.compile_plugin(&devicesim()).expect("compile");
        assert_eq!(artifact.file(), relative.join("devicesim_1_0_0").join("devicesim.so.1.0.0"));

        let manifest =
            std::fs::read_to_string(relative.join("devicesim_1_0_0").join("Cargo.toml")).unwrap();
        assert!(manifest.contains("path = \"../../config-model-core\""), "got:\n{manifest}");
    }
}
