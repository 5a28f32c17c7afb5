//! Trait abstractions for the two GitHub protocols.
//!
//! The star fetcher and rate-limit guard only talk to these traits, so they
//! can run against the real clients or against scripted mocks in tests.

use crate::Result;
use crate::graphql::{GraphQLResponse, RepositoryMap};
use crate::query::QueryDocument;
use crate::types::RateLimitSnapshot;

/// Bulk-query (GraphQL) protocol operations.
pub trait BulkQueryApi: Send + Sync {
    /// Rate limit as reported by the bulk protocol.
    fn rate_limit(&self) -> impl std::future::Future<Output = Result<RateLimitSnapshot>> + Send;

    /// Run one aliased repository lookup document.
    ///
    /// GraphQL-level errors are returned as warnings, not as `Err`.
    fn repositories(
        &self,
        document: &QueryDocument,
    ) -> impl std::future::Future<Output = Result<GraphQLResponse<RepositoryMap>>> + Send;
}

/// Single-item (REST) protocol operations.
pub trait SingleItemApi: Send + Sync {
    /// Rate limit as reported by the single-item protocol.
    fn rate_limit(&self) -> impl std::future::Future<Output = Result<RateLimitSnapshot>> + Send;

    /// Stargazer count of one repository addressed by owner and name.
    fn stargazers_count(
        &self,
        owner: &str,
        name: &str,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;
}
