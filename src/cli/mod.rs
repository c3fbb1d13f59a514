//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod context;
pub mod handlers;

pub use args::CollectorArgs;
pub use context::CommandContext;

/// Collects image metadata and application versions from a Kubernetes cluster
#[derive(Parser, Debug)]
#[command(name = "collector")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the image collector, the version collector and the metrics endpoint
    Run(CollectorArgs),

    /// Collect image metadata and namespace descriptions only
    Images(CollectorArgs),

    /// Collect application versions and serve them as metrics
    Versions(CollectorArgs),

    /// Display version information
    Version,

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   collector completion bash > /etc/bash_completion.d/collector
  zsh:    collector completion zsh > \"${fpath[1]}/_collector\"
  fish:   collector completion fish > ~/.config/fish/completions/collector.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Debug flag of the collector commands
    pub fn debug(&self) -> bool {
        match self {
            Commands::Run(args) | Commands::Images(args) | Commands::Versions(args) => {
                args.run.debug
            }
            Commands::Version | Commands::Completion { .. } => false,
        }
    }
}
