//! Command definitions and dispatch targets.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod awesome;
pub mod completions;
pub mod rate_limit;
pub mod stars;
pub mod token;
pub mod utils;

#[derive(Parser)]
#[command(name = "stargaze")]
#[command(version)]
#[command(about = "GitHub star counts in bulk, within your rate limit")]
#[command(
    long_about = "Stargaze looks up stargazer counts for many repositories with one aliased \
GraphQL query, falls back to the REST API for renamed or deleted repositories, and refuses \
to run a batch once less than half of your API quota is left."
)]
#[command(after_long_help = r#"EXAMPLES
    Show the binding rate limit:
        $ stargaze rate-limit

    Star counts for a few repositories:
        $ stargaze stars golang/go rust-lang/rust

    Check a repository against the awesome list:
        $ stargaze awesome avelino/awesome-go

CONFIGURATION
    Stargaze reads ~/.config/stargaze/config.toml (or the file given with
    --config / $STARGAZE_CONFIG). A missing file means defaults.

ENVIRONMENT VARIABLES
    GITHUB_TOKEN           GitHub token (falls back to `gh auth token`)
    STARGAZE_TOKEN         Token override, takes precedence over GITHUB_TOKEN
    STARGAZE_API_URL       REST base URL override
    STARGAZE_GRAPHQL_URL   GraphQL endpoint override
    RUST_LOG               Log filter (default: stargaze=warn)
"#)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that talks to GitHub.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Path to the config file
    #[arg(long, global = true, env = "STARGAZE_CONFIG")]
    pub config: Option<PathBuf>,

    /// GitHub token to use instead of GITHUB_TOKEN or the gh CLI
    #[arg(long, global = true, env = "STARGAZE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the remaining API quota
    RateLimit {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up stargazer counts
    Stars {
        /// Repositories as owner/name
        #[arg(required = true, value_name = "OWNER/NAME")]
        repos: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a repository is on the awesome list
    Awesome {
        /// Repository as owner/name
        #[arg(value_name = "OWNER/NAME")]
        repo: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report whether a GitHub token is in use
    Token,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
