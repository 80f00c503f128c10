//! # config-model-renderer
//!
//! Tera-based renderer that turns template definitions plus a
//! [`TemplateContext`] into the source files of a model plugin crate.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use config_model_core::{Mode, ModelDescriptor};
//! use config_model_renderer::{render_template, TemplateContext, TemplateKind};
//!
//! fn render_manifest(model: &ModelDescriptor) {
//!     let ctx = TemplateContext::new(model, Mode::Module, "1.75", Path::new("../.."));
//!     let kind = TemplateKind::Manifest;
//!     let definition = kind.definition_path(Path::new("templates"));
//!     if let Err(e) = render_template(kind, &definition, &ctx, Path::new("out/Cargo.toml")) {
//!         eprintln!("{e}");
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::TemplateContext;
pub use engine::{render_template, render_to_string, TemplateKind};
pub use error::RenderError;
