//! Tera rendering: [`TemplateKind`] and [`render_template`].
//!
//! # Definition → output mapping
//!
//! | Kind          | Definition             | Output (under module dir)     |
//! |---------------|------------------------|-------------------------------|
//! | Manifest      | `Cargo.toml.tera`      | `Cargo.toml`                  |
//! | EntryPoint    | `lib.rs.tera`          | `src/lib.rs`                  |
//! | Model         | `model.rs.tera`        | `src/plugin/model.rs`         |
//! | Unmarshaller  | `unmarshaller.rs.tera` | `src/plugin/unmarshaller.rs`  |
//! | Validator     | `validator.rs.tera`    | `src/plugin/validator.rs`     |
//! | Plugin        | `plugin.rs.tera`       | `src/plugin/plugin.rs`        |
//!
//! Templates get two filters on top of Tera's built-ins: `quote` and
//! `replace(search=, with=)`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::{Tera, Value};

use crate::context::TemplateContext;
use crate::error::{io_err, RenderError};

// ---------------------------------------------------------------------------
// TemplateKind
// ---------------------------------------------------------------------------

/// Every file the compiler renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Manifest,
    EntryPoint,
    Model,
    Unmarshaller,
    Validator,
    Plugin,
}

impl TemplateKind {
    /// All kinds in pipeline order.
    pub fn all() -> &'static [TemplateKind] {
        &[
            TemplateKind::Manifest,
            TemplateKind::EntryPoint,
            TemplateKind::Model,
            TemplateKind::Unmarshaller,
            TemplateKind::Validator,
            TemplateKind::Plugin,
        ]
    }

    /// Definition file name under the template directory.
    pub fn definition_file(&self) -> &'static str {
        match self {
            TemplateKind::Manifest     => "Cargo.toml.tera",
            TemplateKind::EntryPoint   => "lib.rs.tera",
            TemplateKind::Model        => "model.rs.tera",
            TemplateKind::Unmarshaller => "unmarshaller.rs.tera",
            TemplateKind::Validator    => "validator.rs.tera",
            TemplateKind::Plugin       => "plugin.rs.tera",
        }
    }

    /// Output file name. Package files live under `src/plugin/`.
    pub fn output_file(&self) -> &'static str {
        match self {
            TemplateKind::Manifest     => "Cargo.toml",
            TemplateKind::EntryPoint   => "lib.rs",
            TemplateKind::Model        => "model.rs",
            TemplateKind::Unmarshaller => "unmarshaller.rs",
            TemplateKind::Validator    => "validator.rs",
            TemplateKind::Plugin       => "plugin.rs",
        }
    }

    /// True for the four files rendered into the package directory.
    pub fn is_package_file(&self) -> bool {
        !matches!(self, TemplateKind::Manifest | TemplateKind::EntryPoint)
    }

    /// `<template_root>/<definition_file>`
    pub fn definition_path(&self, template_root: &Path) -> PathBuf {
        template_root.join(self.definition_file())
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

fn quote(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = tera::try_get_value!("quote", "value", String, value);
    Ok(Value::String(format!("\"{s}\"")))
}

fn replace(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = tera::try_get_value!("replace", "value", String, value);
    let search = match args.get("search") {
        Some(v) => tera::try_get_value!("replace", "search", String, v),
        None => return Err(tera::Error::msg("filter `replace` expects a `search` argument")),
    };
    let with = match args.get("with") {
        Some(v) => tera::try_get_value!("replace", "with", String, v),
        None => return Err(tera::Error::msg("filter `replace` expects a `with` argument")),
    };
    Ok(Value::String(s.replace(&search, &with)))
}

fn build_tera(name: &str, source: &str) -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.register_filter("quote", quote);
    tera.register_filter("replace", replace);
    tera.add_raw_template(name, source)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the definition at `definition` with `ctx` and return the text.
pub fn render_to_string(
    kind: TemplateKind,
    definition: &Path,
    ctx: &TemplateContext,
) -> Result<String, RenderError> {
    if !definition.is_file() {
        return Err(RenderError::NotFound {
            path: definition.to_path_buf(),
        });
    }
    let source = std::fs::read_to_string(definition).map_err(|e| io_err(definition, e))?;
    let tera = build_tera(kind.definition_file(), &source)?;
    let tera_ctx = ctx.to_tera_context()?;
    Ok(tera.render(kind.definition_file(), &tera_ctx)?)
}

/// Render the definition at `definition` with `ctx` and write it to `target`,
/// replacing any previous content.
pub fn render_template(
    kind: TemplateKind,
    definition: &Path,
    ctx: &TemplateContext,
    target: &Path,
) -> Result<(), RenderError> {
    let content = render_to_string(kind, definition, ctx)?;
    std::fs::write(target, content).map_err(|e| io_err(target, e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
