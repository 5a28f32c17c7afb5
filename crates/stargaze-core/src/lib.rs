//! # stargaze-core
//!
//! Core logic for Stargaze: the session holder that binds both GitHub clients
//! to one credential, the rate-limit guard, batched stargazer counts with
//! single-repository fallback, and the awesome list index.
//!
//! Collaborators (credential storage, caching, menu rendering) are reached
//! through the traits in [`traits`], with in-process implementations provided.

pub mod awesome;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod menu;
pub mod rate_limit;
pub mod service;
pub mod session;
pub mod traits;

#[cfg(test)]
mod test_mocks;

pub use awesome::{AWESOME_LIST_KEY, AWESOME_LIST_URL, AwesomeListIndex, HttpListSource, ListSource};
pub use cache::MemoryCache;
pub use config::{AwesomeConfig, Config, GitHubConfig, RateLimitConfig};
pub use credentials::CredentialStore;
pub use error::{Error, Result};
pub use fetcher::{BatchStarFetcher, MAX_ALIASES_PER_QUERY, StarResult};
pub use menu::{MENU_RATE_LIMIT, MenuTitles, NoopMenu};
pub use rate_limit::{
    DEFAULT_THRESHOLD, RateLimitGuard, enforce_threshold, format_title, group_thousands,
    select_binding,
};
pub use service::StarService;
pub use session::{Session, SessionManager};
pub use traits::{Cache, ContextMenu, TokenSource};
