//! `stargaze rate-limit` command - Show the binding API quota.

use anyhow::{Context, Result};
use serde::Serialize;
use stargaze_core::MENU_RATE_LIMIT;

use super::GlobalArgs;
use super::utils::build_app;
use crate::output::{self, QuotaBand};

#[derive(Serialize)]
struct JsonOutput {
    remaining: i64,
    limit: i64,
}

/// Run the rate-limit command.
pub async fn run(global: &GlobalArgs, json: bool) -> Result<()> {
    let app = build_app(global)?;

    let snapshot = match app.service.fetch_rate_limit().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            output::essential("N/A");
            return Err(e).context("Failed to fetch rate limit");
        }
    };

    if json {
        let output = JsonOutput {
            remaining: snapshot.remaining,
            limit: snapshot.limit,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let title = app
        .menu
        .title(MENU_RATE_LIMIT)
        .unwrap_or_else(|| stargaze_core::format_title(&snapshot));
    let band = QuotaBand::for_percent(snapshot.percent());
    output::essential(&band.paint(&title).to_string());

    if let Some(reset) = snapshot.reset {
        output::info(&format!("Resets at {}", reset.format("%Y-%m-%d %H:%M:%S UTC")));
    }

    Ok(())
}
