//! Artifact discovery and model lookup.

use std::fs;
use std::path::{Path, PathBuf};

use config_model_core::plugin::ConfigModel;
use config_model_core::{naming, Name, Version};

use crate::config::RepositoryConfig;
use crate::error::{io_err, RepositoryError};
use crate::loader::{Loader, NativeLoader};

/// A directory of compiled model artifacts.
///
/// Nothing is cached: every call walks or activates afresh.
pub struct Repository<L = NativeLoader> {
    config: RepositoryConfig,
    loader: L,
}

impl Repository<NativeLoader> {
    pub fn new(config: RepositoryConfig) -> Self {
        Self::with_loader(config, NativeLoader)
    }
}

impl<L: Loader> Repository<L> {
    pub fn with_loader(config: RepositoryConfig, loader: L) -> Self {
        Self { config, loader }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Activate `<path>/<name>.so.<version>`.
    ///
    /// The lookup is flat. The compiler places each artifact one level down,
    /// at `<output>/<name>_<version>/<name>.so.<version>`, so `get_model`
    /// finds it only when the repository path is that per-model directory.
    /// [`list_models`](Self::list_models) walks recursively and finds it from
    /// the output root as well.
    pub fn get_model(&self, name: &Name, version: &Version) -> Result<Box<dyn ConfigModel>, RepositoryError> {
        let file = self.config.path.join(naming::plugin_file_name(name, version));
        self.loader.activate(&file)
    }

    /// Every artifact under the repository path, sorted, without activating any.
    ///
    /// The walk is recursive. A regular file qualifies when its file name
    /// contains the plugin marker; directory names are not considered.
    pub fn list_artifacts(&self) -> Result<Vec<PathBuf>, RepositoryError> {
        let mut artifacts: Vec<PathBuf> = collect_files(&self.config.path)?
            .into_iter()
            .filter(|p| naming::is_plugin_file(p))
            .collect();
        artifacts.sort();
        tracing::debug!(
            count = artifacts.len(),
            "found model artifacts under {}",
            self.config.path.display()
        );
        Ok(artifacts)
    }

    /// Activate every artifact in [`list_artifacts`](Self::list_artifacts)
    /// order. The first failure aborts the listing.
    pub fn list_models(&self) -> Result<Vec<Box<dyn ConfigModel>>, RepositoryError> {
        self.list_artifacts()?
            .iter()
            .map(|path| self.loader.activate(path))
            .collect()
    }
}

/// Breadth-first walk returning every regular file below `root`.
fn collect_files(root: &Path) -> Result<Vec<PathBuf>, RepositoryError> {
    let mut dirs = vec![root.to_path_buf()];
    let mut files = Vec::new();
    let mut cursor = 0;
    while cursor < dirs.len() {
        let current = dirs[cursor].clone();
        cursor += 1;
        let entries = fs::read_dir(&current).map_err(|e| io_err(&current, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&current, e))?;
            let ty = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
            if ty.is_dir() {
                dirs.push(entry.path());
            } else if ty.is_file() {
                files.push(entry.path());
            }
        }
    }
    Ok(files)
}
