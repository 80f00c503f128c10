//! Descriptor types shared by the compiler, the repository and the CLI.
//!
//! Filesystem paths are always `PathBuf`. Module data is opaque bytes and is
//! never serialized.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;

/// Minimum toolchain version written into generated manifests unless the
/// caller pins another one.
pub const DEFAULT_TOOLCHAIN_VERSION: &str = "1.75";

/// Template directory used when none is configured.
pub const DEFAULT_TEMPLATE_PATH: &str = "templates";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name of a model or of one of its modules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Version of a model or of one of its modules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version(pub String);

impl Version {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How the generated entry point exposes the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Standalone build: the model is linked into a host program and no
    /// loader symbol is exported.
    Binary,
    /// Dynamically loadable module exporting the plugin symbol.
    #[default]
    Module,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Binary => write!(f, "binary"),
            Mode::Module => write!(f, "module"),
        }
    }
}

/// What to do when a schema file is already present in the working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CopyPolicy {
    /// Leave the existing file untouched, even if its content differs.
    #[default]
    SkipExisting,
    /// Always rewrite the file from the descriptor's bytes.
    Overwrite,
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// One schema module belonging to a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: Name,
    pub organization: Option<String>,
    pub version: Version,
    /// Raw schema content, copied verbatim into the working tree.
    pub data: Vec<u8>,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<Name>, version: impl Into<Version>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            organization: None,
            version: version.into(),
            data: data.into(),
        }
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }
}

/// A named, versioned model made of one or more schema modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub name: Name,
    pub version: Version,
    pub modules: Vec<ModuleDescriptor>,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<Name>, version: impl Into<Version>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            modules: Vec::new(),
        }
    }

    pub fn with_module(mut self, module: ModuleDescriptor) -> Self {
        self.modules.push(module);
        self
    }

    /// Check the identity invariants: non-empty name and version on the model
    /// and on every module, and no two modules sharing `(name, version)`.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.name.0.is_empty() {
            return Err(DescriptorError::EmptyName);
        }
        if self.version.0.is_empty() {
            return Err(DescriptorError::EmptyVersion {
                model: self.name.0.clone(),
            });
        }

        let mut seen = HashSet::new();
        for (index, module) in self.modules.iter().enumerate() {
            if module.name.0.is_empty() || module.version.0.is_empty() {
                return Err(DescriptorError::EmptyModuleField {
                    model: self.name.0.clone(),
                    index,
                });
            }
            if !seen.insert((&module.name, &module.version)) {
                return Err(DescriptorError::DuplicateModule {
                    model: self.name.0.clone(),
                    name: module.name.0.clone(),
                    version: module.version.0.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A `name@version` module key as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleKey {
    pub name: Name,
    pub version: Version,
}

impl ModuleKey {
    /// Attach the raw schema bytes read from disk.
    pub fn into_module(self, data: Vec<u8>) -> ModuleDescriptor {
        ModuleDescriptor::new(self.name, self.version, data)
    }
}

impl FromStr for ModuleKey {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('@').collect();
        match parts.as_slice() {
            [name, version] if !name.is_empty() && !version.is_empty() => Ok(Self {
                name: Name::from(*name),
                version: Version::from(*version),
            }),
            _ => Err(DescriptorError::Format { key: s.to_string() }),
        }
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Result of a successful compile. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactDescriptor {
    name: Name,
    version: Version,
    file: PathBuf,
}

impl ArtifactDescriptor {
    pub fn new(name: Name, version: Version, file: PathBuf) -> Self {
        Self { name, version, file }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Path to the produced artifact.
    pub fn file(&self) -> &Path {
        &self.file
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Compiler configuration. Every field has a default, so partial YAML or JSON
/// documents deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilationSettings {
    /// Directory holding the template definitions.
    pub template_path: PathBuf,
    /// Root under which the working tree and the artifact are created.
    pub output_path: PathBuf,
    pub mode: Mode,
    /// Minimum toolchain version recorded in the generated manifest.
    pub toolchain_version: String,
    pub copy_policy: CopyPolicy,
}

impl Default for CompilationSettings {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            output_path: PathBuf::from("."),
            mode: Mode::default(),
            toolchain_version: DEFAULT_TOOLCHAIN_VERSION.to_string(),
            copy_policy: CopyPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
