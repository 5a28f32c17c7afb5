//! GitHub GraphQL client for bulk queries.
//!
//! GraphQL-level errors (the `errors` array of a 200 response) do not fail a
//! call. They come back as warnings next to whatever `data` the server did
//! return, so a partial answer stays usable.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::{build_http_client, handle_response};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::query::{GraphQLRequest, QueryDocument};
use crate::traits::BulkQueryApi;
use crate::types::RateLimitSnapshot;

/// A GraphQL error entry reported alongside data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphQLWarning {
    /// Human-readable message.
    pub message: String,

    /// Error classification, e.g. `NOT_FOUND`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Response path the error applies to, e.g. `["repository1"]`.
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

/// Response data plus any GraphQL-level errors that came with it.
#[derive(Debug, Clone)]
pub struct GraphQLResponse<T> {
    /// Data returned by the server, if any.
    pub data: Option<T>,

    /// Errors that did not prevent the response from being returned.
    pub warnings: Vec<GraphQLWarning>,
}

#[derive(Deserialize)]
struct RawResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQLWarning>>,
}

/// A repository as returned by the aliased bulk query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryNode {
    /// Current owner.
    pub owner: OwnerNode,

    /// Current name.
    pub name: String,

    /// Stargazer connection.
    pub stargazers: StargazerConnection,
}

/// Owner of a [`RepositoryNode`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OwnerNode {
    /// Owner login.
    pub login: String,
}

/// Stargazer connection of a [`RepositoryNode`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StargazerConnection {
    /// Number of stargazers.
    pub total_count: u64,
}

/// Bulk query data keyed by alias. A `None` value is an alias the server
/// could not resolve.
pub type RepositoryMap = HashMap<String, Option<RepositoryNode>>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitData {
    rate_limit: Option<RateLimitNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitNode {
    remaining: i64,
    limit: i64,
    reset_at: Option<DateTime<Utc>>,
}

/// Client for the bulk-query (GraphQL) protocol.
pub struct GraphQLClient {
    client: Client,
    endpoint: String,
}

impl GraphQLClient {
    /// Default GitHub GraphQL endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.github.com/graphql";

    /// Create a GraphQL client from its configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Post a request and split the body into data and warnings.
    ///
    /// # Errors
    /// Returns error on transport failures, non-2xx statuses, or a body that
    /// does not match `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &GraphQLRequest,
    ) -> Result<GraphQLResponse<T>> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let raw: RawResponse<T> = handle_response(response).await?;

        let warnings = raw.errors.unwrap_or_default();
        for warning in &warnings {
            warn!(message = %warning.message, kind = ?warning.kind, "suppressed GraphQL error");
        }

        Ok(GraphQLResponse {
            data: raw.data,
            warnings,
        })
    }

    /// Fetch the GraphQL rate limit.
    ///
    /// A response without a `rateLimit` object yields [`RateLimitSnapshot::unknown`].
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn rate_limit(&self) -> Result<RateLimitSnapshot> {
        let response: GraphQLResponse<RateLimitData> =
            self.execute(&QueryDocument::rate_limit().render()).await?;

        Ok(response
            .data
            .and_then(|d| d.rate_limit)
            .map_or_else(RateLimitSnapshot::unknown, |node| RateLimitSnapshot {
                remaining: node.remaining,
                limit: node.limit,
                reset: node.reset_at,
            }))
    }

    /// Run an aliased repository lookup document.
    ///
    /// # Errors
    /// Returns error if the request fails or a resolved node is malformed.
    pub async fn repositories(
        &self,
        document: &QueryDocument,
    ) -> Result<GraphQLResponse<RepositoryMap>> {
        let response: GraphQLResponse<RepositoryMap> = self.execute(&document.render()).await?;

        let resolved = response
            .data
            .as_ref()
            .map_or(0, |d| d.values().filter(|node| node.is_some()).count());
        debug!(
            requested = document.len(),
            resolved, "bulk repository query finished"
        );

        Ok(response)
    }
}

impl std::fmt::Debug for GraphQLClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQLClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

// === Trait Implementation ===

impl BulkQueryApi for GraphQLClient {
    async fn rate_limit(&self) -> Result<RateLimitSnapshot> {
        self.rate_limit().await
    }

    async fn repositories(&self, document: &QueryDocument) -> Result<GraphQLResponse<RepositoryMap>> {
        self.repositories(document).await
    }
}
