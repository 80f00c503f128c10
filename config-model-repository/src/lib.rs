//! # config-model-repository
//!
//! Discovers compiled model artifacts on disk and activates them in-process.
//!
//! ```rust,ignore
//! let repo = Repository::new(RepositoryConfig::new("/var/lib/config-models"));
//! let model = repo.get_model(&"devicesim".into(), &"1.0.0".into())?;
//! let root = model.unmarshaller().unmarshal(json)?;
//! model.validator().validate(root.as_ref())?;
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod repository;

pub use config::RepositoryConfig;
pub use error::RepositoryError;
pub use loader::{verify_declaration, Loader, NativeLoader};
pub use repository::Repository;
