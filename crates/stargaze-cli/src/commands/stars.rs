//! `stargaze stars` command - Stargazer counts for many repositories.

use anyhow::{Context, Result};
use stargaze_core::Error as CoreError;

use super::GlobalArgs;
use super::utils::{build_app, parse_references};
use crate::output;

/// Run the stars command.
pub async fn run(global: &GlobalArgs, repos: &[String], json: bool) -> Result<()> {
    let references = parse_references(repos)?;
    let app = build_app(global)?;

    let results = match app.service.fetch_multiple_star_count(&references).await {
        Ok(results) => results,
        Err(e @ CoreError::RateLimitExceeded { .. }) => {
            output::warn("Not enough API quota left to run this batch. Try again after the reset.");
            return Err(e.into());
        }
        Err(e) => return Err(e).context("Failed to fetch star counts"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let width = results
        .iter()
        .map(|r| r.owner.len() + r.name.len() + 1)
        .max()
        .unwrap_or(0);

    for result in &results {
        let full_name = format!("{}/{}", result.owner, result.name);
        output::essential(&format!(
            "{full_name:<width$}  {}",
            output::star_count(result.star_count)
        ));
    }

    Ok(())
}
