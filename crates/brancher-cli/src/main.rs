mod commands;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "brancher",
    about = "Merge, build, and push a docker image for each branch"
)]
#[command(version)]
struct Cli {
    /// Build every local branch instead of only the checked-out one
    #[arg(long, short = 'a')]
    all: bool,
    /// Configuration file (defaults to ./brancher.toml when present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
    /// Hosts to build on (accepted but not used yet)
    hosts: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    commands::build(cli.all, cli.config.as_deref(), &cli.hosts).await?;

    Ok(())
}
