//! Capability contract between the repository and compiled model plugins.
//!
//! Every artifact exports one `#[no_mangle]` static named [`PLUGIN_SYMBOL`]
//! of type [`ModelPlugin`]. The header fields (`magic`, `abi_version`,
//! `toolchain`) sit at fixed `#[repr(C)]` offsets, so the loader can check them
//! before it touches anything that depends on the Rust ABI.
//!
//! ```rust,ignore
//! #[no_mangle]
//! pub static MODEL_PLUGIN: ModelPlugin = ModelPlugin::new(plugin::plugin::model);
//! ```

use std::any::Any;

use crate::error::ModelError;
use crate::types::{Name, Version};

/// Exported symbol every artifact must define.
pub const PLUGIN_SYMBOL: &str = "MODEL_PLUGIN";

/// `"CMPLUGIN"` in ASCII.
pub const PLUGIN_MAGIC: u64 = 0x434d_504c_5547_494e;

/// Bumped whenever [`ModelPlugin`] or the traits below change shape.
pub const PLUGIN_ABI_VERSION: u32 = 1;

/// `rustc --version` of the toolchain that compiled this crate.
pub const RUSTC_VERSION: &str = env!("CONFIG_MODEL_RUSTC_VERSION");

/// Size of the zero-padded toolchain fingerprint in [`ModelPlugin`].
pub const TOOLCHAIN_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Model metadata
// ---------------------------------------------------------------------------

/// Metadata for one schema module compiled into a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: Name,
    pub organization: Option<String>,
    pub version: Version,
}

/// Metadata a loaded model reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: Name,
    pub version: Version,
    pub modules: Vec<ModuleInfo>,
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Implemented by the root type the binding generator emits.
pub trait Validate {
    fn validate(&self) -> Result<(), ModelError>;
}

/// A typed configuration tree held behind a trait object.
pub trait ConfigRoot: Send + Sync {
    /// Serialize the tree back to its wire form.
    fn marshal(&self) -> Result<Vec<u8>, ModelError>;

    /// Downcast hook for callers that link against the generated types.
    fn as_any(&self) -> &dyn Any;
}

pub trait Unmarshaller: Send + Sync {
    fn unmarshal(&self, data: &[u8]) -> Result<Box<dyn ConfigRoot>, ModelError>;
}

pub trait Validator: Send + Sync {
    fn validate(&self, root: &dyn ConfigRoot) -> Result<(), ModelError>;
}

/// The handle a loaded artifact yields.
pub trait ConfigModel: Send + Sync {
    fn info(&self) -> ModelInfo;
    fn unmarshaller(&self) -> &dyn Unmarshaller;
    fn validator(&self) -> &dyn Validator;
}

// ---------------------------------------------------------------------------
// Exported declaration
// ---------------------------------------------------------------------------

/// Value of the exported [`PLUGIN_SYMBOL`].
#[repr(C)]
pub struct ModelPlugin {
    pub magic: u64,
    pub abi_version: u32,
    /// Zero-padded `rustc --version` of the plugin's build.
    pub toolchain: [u8; TOOLCHAIN_LEN],
    /// The one capability operation: produce the model handle.
    pub model: fn() -> Box<dyn ConfigModel>,
}

impl ModelPlugin {
    /// Declaration stamped with this crate's magic, ABI version and toolchain.
    pub const fn new(model: fn() -> Box<dyn ConfigModel>) -> Self {
        Self {
            magic: PLUGIN_MAGIC,
            abi_version: PLUGIN_ABI_VERSION,
            toolchain: toolchain_fingerprint(RUSTC_VERSION),
            model,
        }
    }

    /// Toolchain fingerprint with the padding stripped.
    pub fn toolchain(&self) -> &str {
        let end = self
            .toolchain
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(TOOLCHAIN_LEN);
        std::str::from_utf8(&self.toolchain[..end]).unwrap_or("")
    }

    /// Invoke the capability operation.
    pub fn model(&self) -> Box<dyn ConfigModel> {
        (self.model)()
    }
}

/// Copy `version` into a zero-padded, truncated fixed buffer.
pub const fn toolchain_fingerprint(version: &str) -> [u8; TOOLCHAIN_LEN] {
    let src = version.as_bytes();
    let mut out = [0u8; TOOLCHAIN_LEN];
    let mut i = 0;
    while i < src.len() && i < TOOLCHAIN_LEN {
        out[i] = src[i];
        i += 1;
    }
    out
}
