//! Template context: serializable rendering payload built from a
//! [`ModelDescriptor`] plus derived build metadata.

use std::path::Path;

use serde::{Deserialize, Serialize};

use config_model_core::{naming, plugin, Mode, ModelDescriptor};

use crate::error::RenderError;

/// Payload handed to every template. Built fresh per render and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateContext {
    pub model: ModelCtx,
    pub compiler: CompilerCtx,
}

/// The model being compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCtx {
    pub name: String,
    pub version: String,
    /// Working directory name, also the generated package name.
    pub safe_name: String,
    /// Library target name of the generated crate.
    pub lib_name: String,
    pub modules: Vec<ModuleCtx>,
}

/// One schema module. Raw bytes are deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCtx {
    pub name: String,
    pub organization: Option<String>,
    pub version: String,
    /// File name under the schema directory.
    pub file: String,
}

/// Build metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerCtx {
    pub mode: Mode,
    /// Minimum toolchain version for the generated manifest.
    pub version: String,
    /// Path from the generated module back to the invoking program, always
    /// with `/` separators.
    pub relative_path: String,
    /// Rust module holding the generated package.
    pub package: String,
    /// Exported symbol name of the plugin contract.
    pub symbol: String,
    /// Version of the config-model crates that generated the tree.
    pub crate_version: String,
}

impl TemplateContext {
    /// Build a [`TemplateContext`] for `model`.
    pub fn new(
        model: &ModelDescriptor,
        mode: Mode,
        toolchain_version: &str,
        relative_path: &Path,
    ) -> Self {
        let modules = model
            .modules
            .iter()
            .map(|m| ModuleCtx {
                name: m.name.0.clone(),
                organization: m.organization.clone(),
                version: m.version.0.clone(),
                file: naming::schema_file(m),
            })
            .collect();

        TemplateContext {
            model: ModelCtx {
                name: model.name.0.clone(),
                version: model.version.0.clone(),
                safe_name: naming::safe_qualified_name(model),
                lib_name: naming::lib_name(model),
                modules,
            },
            compiler: CompilerCtx {
                mode,
                version: toolchain_version.to_string(),
                relative_path: relative_path.to_string_lossy().replace('\\', "/"),
                package: naming::PACKAGE_NAME.to_string(),
                symbol: plugin::PLUGIN_SYMBOL.to_string(),
                crate_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
