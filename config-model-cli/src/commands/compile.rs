//! `config-model compile-plugin`: build one model plugin artifact.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use config_model_compiler::{CommandToolchain, PluginCompiler};
use config_model_core::types::{DEFAULT_TEMPLATE_PATH, DEFAULT_TOOLCHAIN_VERSION};
use config_model_core::{CompilationSettings, CopyPolicy, ModelDescriptor, ModuleKey};

use super::super::ModeArg;

/// Compile schema modules into a loadable model plugin.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Model name.
    #[arg(long, short = 'n')]
    pub name: String,

    /// Model version.
    #[arg(long = "version", short = 'v', value_name = "VERSION")]
    pub model_version: String,

    /// Schema module as `name@version=path`. Repeat for each module.
    #[arg(long = "module", short = 'm', value_name = "NAME@VERSION=PATH")]
    pub modules: Vec<String>,

    /// Output directory for the generated source tree and artifact.
    #[arg(long, short = 'o', default_value = ".")]
    pub output: PathBuf,

    /// Directory holding the template definitions.
    #[arg(long, short = 't', default_value = DEFAULT_TEMPLATE_PATH)]
    pub templates: PathBuf,

    /// Entry point flavour: module | binary.
    #[arg(long, default_value = "module")]
    pub mode: ModeArg,

    /// Minimum toolchain version written into the generated manifest.
    #[arg(long, default_value = DEFAULT_TOOLCHAIN_VERSION)]
    pub toolchain_version: String,

    /// Rewrite schema files that already exist in the output tree.
    #[arg(long)]
    pub overwrite_modules: bool,

    /// Program that turns schema files into bindings.
    #[arg(long, value_name = "PROGRAM")]
    pub binding_generator: Option<String>,
}

impl CompileArgs {
    pub fn run(self) -> Result<()> {
        // Every key is checked before any schema file is read.
        let keys = self
            .modules
            .iter()
            .map(|raw| parse_module_arg(raw))
            .collect::<Result<Vec<_>>>()?;

        let mut model = ModelDescriptor::new(self.name.as_str(), self.model_version.as_str());
        for (key, path) in keys {
            let data = std::fs::read(&path)
                .with_context(|| format!("cannot read module {key} from '{}'", path.display()))?;
            model = model.with_module(key.into_module(data));
        }

        let settings = CompilationSettings {
            template_path: self.templates,
            output_path: self.output,
            mode: self.mode.into(),
            toolchain_version: self.toolchain_version,
            copy_policy: if self.overwrite_modules {
                CopyPolicy::Overwrite
            } else {
                CopyPolicy::SkipExisting
            },
        };

        let mut toolchain = CommandToolchain::default();
        if let Some(program) = self.binding_generator {
            toolchain = toolchain.with_binding_generator(program);
        }

        let artifact = PluginCompiler::with_toolchain(settings, toolchain)
            .compile_plugin(&model)
            .with_context(|| format!("failed to compile model {}@{}", model.name, model.version))?;

        println!(
            "✓ Compiled {} {} → {}",
            artifact.name(),
            artifact.version(),
            artifact.file().display()
        );
        Ok(())
    }
}

/// Split `name@version=path` into its key and path.
fn parse_module_arg(raw: &str) -> Result<(ModuleKey, PathBuf)> {
    let (key, path) = raw
        .split_once('=')
        .with_context(|| format!("module '{raw}' must have the form name@version=path"))?;
    let key: ModuleKey = key.parse()?;
    if path.is_empty() {
        anyhow::bail!("module '{key}' has an empty path");
    }
    Ok((key, PathBuf::from(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_module_arg() {
        let (key, path) = parse_module_arg("devicesim@1.0.0=yang/devicesim.yang").unwrap();
        assert_eq!(key.to_string(), "devicesim@1.0.0");
        assert_eq!(path, PathBuf::from("yang/devicesim.yang"));
    }

    #[test]
    fn rejects_malformed_module_args() {
        for raw in ["devicesim=x.yang", "a@b@c=x.yang", "@1.0=x.yang", "devicesim@1.0", "devicesim@1.0="] {
            assert!(parse_module_arg(raw).is_err(), "{raw} should be rejected");
        }
    }
}
