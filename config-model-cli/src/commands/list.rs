//! `config-model list-models`: show what a repository directory holds.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use config_model_repository::{Repository, RepositoryConfig};

/// List models available in a repository directory.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Directory to search for artifacts.
    #[arg(long, conflicts_with = "config")]
    pub path: Option<PathBuf>,

    /// YAML file with a `path:` entry.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print matching artifact files without loading them.
    #[arg(long)]
    pub artifacts_only: bool,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let config = match (self.path, self.config) {
            (_, Some(file)) => RepositoryConfig::load_at(&file)
                .with_context(|| format!("cannot load repository config '{}'", file.display()))?,
            (Some(path), None) => RepositoryConfig::new(path),
            (None, None) => RepositoryConfig::new("."),
        };
        let repo = Repository::new(config);

        if self.artifacts_only {
            let artifacts = repo
                .list_artifacts()
                .with_context(|| format!("cannot search '{}'", repo.path().display()))?;
            if artifacts.is_empty() {
                println!("No model artifacts under {}", repo.path().display());
            }
            for path in artifacts {
                println!("{}", path.display());
            }
            return Ok(());
        }

        let models = repo
            .list_models()
            .with_context(|| format!("cannot list models in '{}'", repo.path().display()))?;
        if models.is_empty() {
            println!("No models under {}", repo.path().display());
        }
        for model in models {
            let info = model.info();
            println!("{} {}", info.name, info.version);
            for module in info.modules {
                match module.organization {
                    Some(org) => println!("  · {}@{} ({org})", module.name, module.version),
                    None => println!("  · {}@{}", module.name, module.version),
                }
            }
        }
        Ok(())
    }
}
