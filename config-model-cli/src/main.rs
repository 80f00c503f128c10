//! config-model: compile schema modules into model plugins and list them.
//!
//! # Usage
//!
//! ```text
//! config-model compile-plugin -n <name> -v <version> -m <name@version=path>... [-o DIR] [-t DIR]
//!                             [--mode binary|module] [--toolchain-version V]
//!                             [--overwrite-modules] [--binding-generator PROGRAM]
//! config-model list-models [--path DIR | --config FILE] [--artifacts-only]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{compile::CompileArgs, list::ListArgs};
use config_model_core::Mode;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "config-model",
    version,
    about = "Compile and inspect configuration model plugins",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate, bind and build a model plugin artifact.
    CompilePlugin(CompileArgs),

    /// List the models available in a repository directory.
    ListModels(ListArgs),
}

// ---------------------------------------------------------------------------
// Shared Mode argument
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse `Mode` from CLI args.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeArg(pub Mode);

impl FromStr for ModeArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" => Ok(Self(Mode::Binary)),
            "module" => Ok(Self(Mode::Module)),
            other => Err(format!("unknown mode '{other}'; expected: binary, module")),
        }
    }
}

impl fmt::Display for ModeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        m.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    match cli.command {
        Commands::CompilePlugin(args) => args.run(),
        Commands::ListModels(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
