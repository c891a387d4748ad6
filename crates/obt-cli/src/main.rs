//! obt CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use obt_cli::cmd;
use obt_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let history = cli.history_path();

    match cli.command {
        Commands::Install {
            repo,
            path,
            binary,
            tag,
            yes,
        } => {
            let args = cmd::install::InstallArgs {
                repo,
                path,
                binary,
                tag,
                yes,
            };
            cmd::install::install(&history, args).await
        }
        Commands::Update { jobs } => cmd::update::update(&history, jobs).await,
        Commands::List => cmd::list::list(&history),
        Commands::Config { default_path } => cmd::config::config(default_path),
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(())
        }
    }
}
