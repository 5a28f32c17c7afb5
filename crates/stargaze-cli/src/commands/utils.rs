use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use stargaze_core::{Config, CredentialStore, MemoryCache, MenuTitles, StarService};
use stargaze_github::{Auth, RepositoryReference, SecretString};

use super::GlobalArgs;

/// Service wired for one CLI invocation, plus the menu it publishes to.
pub struct App {
    pub service: StarService<CredentialStore>,
    pub menu: Arc<MenuTitles>,
}

/// Resolve the config file location: `--config`/`$STARGAZE_CONFIG`, then the
/// platform config directory.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        dirs::config_dir().map(|dir| dir.join("stargaze").join("config.toml"))
    })
}

/// Load the config file and apply environment overrides.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match config_path(explicit) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    apply_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Apply `STARGAZE_API_URL` and `STARGAZE_GRAPHQL_URL` on top of the file.
pub fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let set = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(url) = set("STARGAZE_API_URL") {
        config.github.api_url = url;
    }
    if let Some(url) = set("STARGAZE_GRAPHQL_URL") {
        config.github.graphql_url = url;
    }
}

/// Build the service for this invocation.
pub fn build_app(global: &GlobalArgs) -> Result<App> {
    let config = load_config(global.config.as_deref())?;

    let credentials = CredentialStore::new(Auth::auto());
    if let Some(token) = &global.token {
        credentials.set(Some(SecretString::from(token.clone())));
    }

    let menu = Arc::new(MenuTitles::new());
    let service = StarService::new(
        &config,
        credentials,
        Arc::new(MemoryCache::new()),
        menu.clone(),
    )?;

    Ok(App { service, menu })
}

/// Parse `owner/name` arguments, failing on the first bad one.
pub fn parse_references(repos: &[String]) -> Result<Vec<RepositoryReference>> {
    repos
        .iter()
        .map(|repo| {
            RepositoryReference::parse(repo).with_context(|| format!("Invalid repository '{repo}'"))
        })
        .collect()
}
