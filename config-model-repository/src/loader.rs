//! Native artifact activation.
//!
//! Activation opens the shared library, resolves [`PLUGIN_SYMBOL`], checks the
//! declaration header and asks the declaration for its model handle. The whole
//! sequence runs under [`LOAD_LOCK`]. Opened libraries are pushed onto the
//! list the lock guards and are never closed, so every handle a plugin hands
//! out stays valid for the life of the process.

use std::path::Path;
use std::sync::Mutex;

use config_model_core::plugin::{
    ConfigModel, ModelPlugin, PLUGIN_ABI_VERSION, PLUGIN_MAGIC, PLUGIN_SYMBOL, RUSTC_VERSION,
};
use libloading::Library;

use crate::error::RepositoryError;

/// Serializes native loads and keeps every opened library alive.
static LOAD_LOCK: Mutex<Vec<Library>> = Mutex::new(Vec::new());

/// Turns an artifact path into a model handle.
pub trait Loader {
    fn activate(&self, path: &Path) -> Result<Box<dyn ConfigModel>, RepositoryError>;
}

/// Loads artifacts into the current process with the platform dynamic loader.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeLoader;

impl Loader for NativeLoader {
    fn activate(&self, path: &Path) -> Result<Box<dyn ConfigModel>, RepositoryError> {
        if !path.is_file() {
            return Err(RepositoryError::Load {
                path: path.to_path_buf(),
                reason: "no such file".to_string(),
            });
        }

        let mut libraries = LOAD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        tracing::debug!(path = %path.display(), "opening model artifact");

        // SAFETY: running library initializers is inherent to loading a
        // plugin; artifacts are produced by the plugin compiler.
        let library = unsafe { Library::new(path) }.map_err(|e| RepositoryError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // SAFETY: the symbol is declared as `static MODEL_PLUGIN: ModelPlugin`,
        // so its address is a `*const ModelPlugin`.
        let declaration: *const ModelPlugin =
            match unsafe { library.get::<*const ModelPlugin>(PLUGIN_SYMBOL.as_bytes()) } {
                Ok(symbol) => *symbol,
                Err(_) => {
                    return Err(RepositoryError::SymbolNotFound {
                        path: path.to_path_buf(),
                        symbol: PLUGIN_SYMBOL.to_string(),
                    })
                }
            };
        if declaration.is_null() {
            return Err(RepositoryError::SymbolNotFound {
                path: path.to_path_buf(),
                symbol: PLUGIN_SYMBOL.to_string(),
            });
        }

        // SAFETY: non-null and backed by `library`, which is kept alive below.
        let declaration = unsafe { &*declaration };
        verify_declaration(path, declaration)?;

        let model = declaration.model();
        libraries.push(library);
        let info = model.info();
        tracing::info!(model = %info.name, version = %info.version, "activated {}", path.display());
        Ok(model)
    }
}

/// Check the `#[repr(C)]` header of an exported declaration.
///
/// A foreign magic number or ABI version means the symbol is not a model
/// plugin declaration at all. A different toolchain means the trait objects
/// behind `model` cannot be trusted, which is reported as a load failure.
pub fn verify_declaration(path: &Path, declaration: &ModelPlugin) -> Result<(), RepositoryError> {
    if declaration.magic != PLUGIN_MAGIC {
        return Err(RepositoryError::InvalidContract {
            path: path.to_path_buf(),
            reason: format!("unexpected magic {:#x}", declaration.magic),
        });
    }
    if declaration.abi_version != PLUGIN_ABI_VERSION {
        return Err(RepositoryError::InvalidContract {
            path: path.to_path_buf(),
            reason: format!(
                "ABI version {} (expected {PLUGIN_ABI_VERSION})",
                declaration.abi_version
            ),
        });
    }
    if declaration.toolchain() != RUSTC_VERSION {
        return Err(RepositoryError::Load {
            path: path.to_path_buf(),
            reason: format!(
                "built with incompatible toolchain '{}' (host: '{RUSTC_VERSION}')",
                declaration.toolchain()
            ),
        });
    }
    Ok(())
}
