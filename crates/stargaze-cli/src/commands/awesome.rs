//! `stargaze awesome` command - Awesome list membership.

use anyhow::{Context, Result};
use serde::Serialize;

use super::GlobalArgs;
use super::utils::{build_app, parse_references};
use crate::output;

#[derive(Serialize)]
struct JsonOutput<'a> {
    owner: &'a str,
    name: &'a str,
    awesome: bool,
}

/// Run the awesome command.
pub async fn run(global: &GlobalArgs, repo: &str, json: bool) -> Result<()> {
    let references = parse_references(&[repo.to_string()])?;
    let reference = &references[0];
    let app = build_app(global)?;

    let listed = app
        .service
        .is_awesome_list(reference)
        .await
        .context("Failed to fetch the awesome list")?;

    if json {
        let output = JsonOutput {
            owner: reference.owner(),
            name: reference.name(),
            awesome: listed,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if listed {
        output::success(&format!("{reference} is on the awesome list"));
    } else {
        output::info(&format!("{reference} is not on the awesome list"));
    }

    Ok(())
}
