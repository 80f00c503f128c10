//! config-model core library: descriptors, naming, plugin contract, errors.
//!
//! - [`types`]: model, module and artifact descriptors plus compiler settings
//! - [`naming`]: pure path derivation shared by compiler and repository
//! - [`plugin`]: the exported-symbol contract every artifact satisfies
//! - [`error`]: [`DescriptorError`] and [`ModelError`]

pub mod error;
pub mod naming;
pub mod plugin;
pub mod types;

pub use error::{DescriptorError, ModelError};
pub use plugin::{ConfigModel, ConfigRoot, ModelInfo, ModelPlugin, ModuleInfo, Unmarshaller, Validate, Validator};
pub use types::{
    ArtifactDescriptor, CompilationSettings, CopyPolicy, Mode, ModelDescriptor, ModuleDescriptor,
    ModuleKey, Name, Version,
};
