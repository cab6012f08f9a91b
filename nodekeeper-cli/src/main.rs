//! nodekeeper CLI - Command-line interface
//!
//! This binary bootstraps and supervises a mev-commit node using the
//! nodekeeper library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::artifact::ArtifactArgs;
use commands::common::NodeOverrides;
use commands::config::ConfigCommands;
use commands::start::StartArgs;

#[derive(Debug, Parser)]
#[command(name = "nodekeeper")]
#[command(version = nodekeeper::VERSION)]
#[command(about = "Bootstrap and supervise a mev-commit bidder or provider node", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Install, launch, fund and register the node, then supervise it
    Start {
        #[command(flatten)]
        overrides: NodeOverrides,

        /// Enable debug-level logging
        #[arg(long)]
        debug: bool,
    },

    /// Show the release archive the node would be installed from
    Artifact {
        #[command(flatten)]
        overrides: NodeOverrides,

        /// Target operating system (defaults to the host)
        #[arg(long, requires = "arch")]
        os: Option<String>,

        /// Target CPU architecture (defaults to the host)
        #[arg(long, requires = "os")]
        arch: Option<String>,
    },

    /// View and modify configuration settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Start { overrides, debug } => commands::start::run(StartArgs { overrides, debug }),
        Commands::Artifact {
            overrides,
            os,
            arch,
        } => commands::artifact::run(ArtifactArgs {
            overrides,
            os,
            arch,
        }),
        Commands::Config(command) => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
