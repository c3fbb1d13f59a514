//! Image metadata collector - Kubernetes image inventory and version metrics

use clap::{CommandFactory, Parser};

mod cli;
mod client;
mod collector;
mod config;
mod error;
mod models;
mod semantic;
mod storage;
mod versions;

use cli::{Cli, CommandContext, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.debug());

    match cli.command {
        Commands::Version => {
            println!("collector version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "collector", &mut std::io::stdout());
            Ok(())
        }
        Commands::Images(args) => {
            let config = args.into_config()?;
            config.require_environment()?;
            let ctx = CommandContext::new(config).await?;
            let storage = storage::from_config(&ctx.config.storage).await?;
            cli::handlers::images(&ctx, storage.as_ref()).await
        }
        Commands::Versions(args) => {
            let ctx = CommandContext::new(args.into_config()?).await?;
            cli::handlers::versions(&ctx).await
        }
        Commands::Run(args) => {
            let config = args.into_config()?;
            config.require_environment()?;
            let ctx = CommandContext::new(config).await?;
            let storage = storage::from_config(&ctx.config.storage).await?;
            cli::handlers::run(&ctx, storage.as_ref()).await
        }
    }
}

/// `info` by default, `debug` with `--debug`; `RUST_LOG` overrides both
fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}
