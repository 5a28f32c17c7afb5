//! # stargaze-github
//!
//! GitHub API plumbing for Stargaze: an aliased GraphQL bulk client, a REST
//! client for single-repository lookups, rate-limit queries for both
//! protocols, and a raw-content client for plain-text lists.
//!
//! # Security
//!
//! Tokens are held as `SecretString`, which zeroizes memory on drop, and the
//! authorization header is marked sensitive so it never shows up in debug
//! output.

mod auth;
mod client;
mod config;
mod error;
mod graphql;
mod query;
mod raw;
mod traits;
mod types;

pub use auth::Auth;
pub use client::RestClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use graphql::{
    GraphQLClient, GraphQLResponse, GraphQLWarning, OwnerNode, RepositoryMap, RepositoryNode,
    StargazerConnection,
};
pub use query::{Alias, Cue, GraphQLRequest, QueryDocument};
pub use raw::RawClient;
// Re-export SecretString for constructing Auth::Token
pub use secrecy::SecretString;
pub use traits::{BulkQueryApi, SingleItemApi};
pub use types::{RateLimitSnapshot, RepositoryReference};
