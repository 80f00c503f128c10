//! # config-model-compiler
//!
//! Turns a [`ModelDescriptor`](config_model_core::ModelDescriptor) into a
//! loadable model plugin artifact.
//!
//! Call [`compile_plugin`] for the default external tools, or build a
//! [`PluginCompiler`] with your own [`Toolchain`].

pub mod compiler;
pub mod error;
pub mod toolchain;
pub mod writer;

pub use compiler::{compile_plugin, PluginCompiler};
pub use error::{CompileError, CompileStep};
pub use toolchain::{CommandToolchain, SourceTree, Toolchain};
pub use writer::WriteResult;
