//! `stargaze token` command - Report whether requests are authenticated.

use anyhow::{Context, Result};

use super::GlobalArgs;
use super::utils::build_app;
use crate::output;

/// Run the token command.
pub async fn run(global: &GlobalArgs) -> Result<()> {
    let app = build_app(global)?;
    let session = app
        .service
        .sessions()
        .session()
        .await
        .context("Failed to read GitHub credentials")?;

    if session.is_authenticated() {
        output::success("Using a GitHub token");
    } else {
        output::warn("No GitHub token found, requests are unauthenticated");
        output::info("Set GITHUB_TOKEN, pass --token, or run `gh auth login`");
    }

    Ok(())
}
