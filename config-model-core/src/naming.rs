//! Deterministic naming and path derivation.
//!
//! # Layout
//!
//! ```text
//! <output>/
//!   <name>_<version>/                (dots replaced by underscores)
//!     Cargo.toml
//!     src/lib.rs
//!     src/plugin/{model,unmarshaller,validator,plugin,generated}.rs
//!     yang/<module>@<version>.yang
//!     <name>.so.<version>
//! ```
//!
//! Every function here is pure: no filesystem access, same inputs give the
//! same paths. The repository relies on [`plugin_file_name`] producing exactly
//! what the compiler wrote.

use std::path::{Component, Path, PathBuf};

use crate::types::{ModelDescriptor, ModuleDescriptor, Name, Version};

/// Source root of the generated crate.
pub const SOURCE_DIR: &str = "src";
/// Rust module that holds the generated package inside the working tree.
pub const PACKAGE_NAME: &str = "plugin";
/// Directory holding copied schema modules.
pub const SCHEMA_DIR: &str = "yang";
/// Extension of copied schema modules.
pub const SCHEMA_EXTENSION: &str = "yang";
/// File the binding generator writes into the package directory.
pub const GENERATED_FILE: &str = "generated.rs";
/// Substring every artifact file name contains.
pub const PLUGIN_FILE_MARKER: &str = ".so.";

/// `<name>_<version>` with every `.` replaced by `_`.
pub fn safe_qualified_name(model: &ModelDescriptor) -> String {
    format!("{}_{}", model.name, model.version).replace('.', "_")
}

/// Library target name of the generated crate (`-` is not allowed there).
pub fn lib_name(model: &ModelDescriptor) -> String {
    safe_qualified_name(model).replace('-', "_")
}

/// `<output>/<safe_name>`
pub fn module_dir(output: &Path, model: &ModelDescriptor) -> PathBuf {
    output.join(safe_qualified_name(model))
}

/// `<output>/<safe_name>/<file>`
pub fn module_path(output: &Path, model: &ModelDescriptor, file: impl AsRef<Path>) -> PathBuf {
    module_dir(output, model).join(file)
}

/// `<output>/<safe_name>/src`
pub fn source_dir(output: &Path, model: &ModelDescriptor) -> PathBuf {
    module_dir(output, model).join(SOURCE_DIR)
}

/// `<output>/<safe_name>/src/plugin`
pub fn package_dir(output: &Path, model: &ModelDescriptor) -> PathBuf {
    source_dir(output, model).join(PACKAGE_NAME)
}

/// `<output>/<safe_name>/src/plugin/<file>`
pub fn package_path(output: &Path, model: &ModelDescriptor, file: &str) -> PathBuf {
    package_dir(output, model).join(file)
}

/// `<output>/<safe_name>/yang`
pub fn schema_dir(output: &Path, model: &ModelDescriptor) -> PathBuf {
    module_dir(output, model).join(SCHEMA_DIR)
}

/// `<module>@<version>.yang`
pub fn schema_file(module: &ModuleDescriptor) -> String {
    format!("{}@{}.{}", module.name, module.version, SCHEMA_EXTENSION)
}

/// `<output>/<safe_name>/yang/<module>@<version>.yang`
pub fn schema_path(output: &Path, model: &ModelDescriptor, module: &ModuleDescriptor) -> PathBuf {
    schema_dir(output, model).join(schema_file(module))
}

/// `<name>.so.<version>`
pub fn plugin_file_name(name: &Name, version: &Version) -> String {
    format!("{name}.so.{version}")
}

/// `<output>/<safe_name>/<name>.so.<version>`
pub fn plugin_file(output: &Path, model: &ModelDescriptor) -> PathBuf {
    module_path(output, model, plugin_file_name(&model.name, &model.version))
}

/// Whether the file name of `path` carries the artifact marker.
pub fn is_plugin_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().contains(PLUGIN_FILE_MARKER))
        .unwrap_or(false)
}

/// Resolve `.` and `..` components lexically.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Lexical path leading from directory `from` to `to`.
///
/// Both paths should be absolute; they are normalized first. Returns `.` when
/// they are the same directory.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from = normalize(from);
    let to = normalize(to);
    let from_parts: Vec<_> = from.components().collect();
    let to_parts: Vec<_> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..from_parts.len() {
        rel.push("..");
    }
    for part in &to_parts[common..] {
        rel.push(part.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
