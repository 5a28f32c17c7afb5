//! Batched stargazer counts with per-repository fallback.
//!
//! One call turns N repository references into aliased GraphQL lookups,
//! then reconciles every alias. Aliases the bulk query could not resolve
//! (renamed or deleted repositories) are retried one by one over REST, which
//! follows redirects for renamed repositories. Results always come back in
//! input order, one per reference.

use std::collections::HashMap;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use stargaze_github::{
    BulkQueryApi, Cue, Error as GitHubError, QueryDocument, RepositoryNode, RepositoryReference,
    SingleItemApi,
};
use tracing::{debug, warn};

use crate::error::Result;
use crate::rate_limit::RateLimitGuard;

/// Most aliases GitHub accepts comfortably in one document.
pub const MAX_ALIASES_PER_QUERY: usize = 100;

/// Stargazer count for one input reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarResult {
    /// Owner as supplied by the caller.
    pub owner: String,

    /// Name as supplied by the caller.
    pub name: String,

    /// Stargazer count, `None` when the repository no longer exists.
    pub star_count: Option<u64>,
}

impl StarResult {
    fn new(reference: &RepositoryReference, star_count: Option<u64>) -> Self {
        Self {
            owner: reference.owner().to_string(),
            name: reference.name().to_string(),
            star_count,
        }
    }
}

/// Fetches stargazer counts through a bulk client with single-item fallback.
pub struct BatchStarFetcher<'a, B: BulkQueryApi, S: SingleItemApi> {
    bulk: &'a B,
    single: &'a S,
}

impl<'a, B: BulkQueryApi, S: SingleItemApi> BatchStarFetcher<'a, B, S> {
    /// Create a fetcher over a pair of protocol clients.
    #[must_use]
    pub const fn new(bulk: &'a B, single: &'a S) -> Self {
        Self { bulk, single }
    }

    /// Fetch stargazer counts for `references`, in input order.
    ///
    /// The rate-limit guard is consulted before any bulk query is issued; if
    /// headroom is insufficient nothing else is sent.
    ///
    /// # Errors
    /// Returns [`crate::Error::RateLimitExceeded`] when the guard refuses the
    /// batch, or the remote error that aborted it.
    pub async fn fetch_many(
        &self,
        guard: &RateLimitGuard,
        references: &[RepositoryReference],
    ) -> Result<Vec<StarResult>> {
        if references.is_empty() {
            return Ok(Vec::new());
        }

        let snapshot = guard.check(self.bulk, self.single).await?;
        guard.enforce(&snapshot)?;

        let cues = Cue::assign(references);
        let mut nodes = self.query_nodes(&cues).await?;

        try_join_all(cues.iter().map(|cue| {
            let node = nodes.remove(&cue.alias.to_string()).flatten();
            self.reconcile(cue, node)
        }))
        .await
    }

    /// Run the aliased lookups, one document per chunk, and merge the data.
    async fn query_nodes(&self, cues: &[Cue]) -> Result<HashMap<String, Option<RepositoryNode>>> {
        let mut nodes = HashMap::with_capacity(cues.len());

        for chunk in cues.chunks(MAX_ALIASES_PER_QUERY) {
            let response = self
                .bulk
                .repositories(&QueryDocument::repositories(chunk))
                .await?;

            if !response.warnings.is_empty() {
                debug!(
                    count = response.warnings.len(),
                    "bulk query returned partial data"
                );
            }
            if let Some(data) = response.data {
                nodes.extend(data);
            }
        }

        debug!(
            requested = cues.len(),
            resolved = nodes.values().filter(|node| node.is_some()).count(),
            "repositories fetched"
        );
        Ok(nodes)
    }

    /// Turn one cue into a result, falling back to the single-item protocol
    /// when the bulk query had nothing for its alias.
    async fn reconcile(&self, cue: &Cue, node: Option<RepositoryNode>) -> Result<StarResult> {
        let reference = &cue.reference;

        if let Some(node) = node {
            return Ok(StarResult::new(
                reference,
                Some(node.stargazers.total_count),
            ));
        }

        warn!(
            owner = reference.owner(),
            name = reference.name(),
            alias = %cue.alias,
            "repository missing from bulk response, falling back to REST"
        );

        match self
            .single
            .stargazers_count(reference.owner(), reference.name())
            .await
        {
            Ok(count) => Ok(StarResult::new(reference, Some(count))),
            Err(GitHubError::RepoNotFound(_)) => {
                warn!(repository = %reference, "repository no longer exists");
                Ok(StarResult::new(reference, None))
            }
            Err(e) => Err(e.into()),
        }
    }
}
