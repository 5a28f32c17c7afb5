//! Stargaze CLI - GitHub star counts in bulk, within your rate limit.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::RateLimit { json } => commands::rate_limit::run(&cli.global, json).await,
        Commands::Stars { repos, json } => commands::stars::run(&cli.global, &repos, json).await,
        Commands::Awesome { repo, json } => commands::awesome::run(&cli.global, &repo, json).await,
        Commands::Token => commands::token::run(&cli.global).await,
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays pipeable.
fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("stargaze=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stargaze=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
