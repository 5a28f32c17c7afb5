//! Operation surface consumed by front ends.

use std::sync::Arc;

use stargaze_github::{ClientConfig, RateLimitSnapshot, RepositoryReference};

use crate::awesome::{AwesomeListIndex, HttpListSource, ListSource};
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{BatchStarFetcher, StarResult};
use crate::rate_limit::RateLimitGuard;
use crate::session::SessionManager;
use crate::traits::{Cache, ContextMenu, TokenSource};

/// Stargazer counts, rate limits and awesome-list membership behind one handle.
pub struct StarService<T: TokenSource, L: ListSource = HttpListSource> {
    sessions: SessionManager<T>,
    guard: RateLimitGuard,
    awesome: AwesomeListIndex<L>,
}

impl<T: TokenSource> StarService<T> {
    /// Wire a service from configuration.
    ///
    /// # Errors
    /// Returns error if the list client cannot be built.
    pub fn new(
        config: &Config,
        tokens: T,
        cache: Arc<dyn Cache>,
        menu: Arc<dyn ContextMenu>,
    ) -> Result<Self> {
        let list_client = ClientConfig::new(&config.awesome.list_url)
            .with_timeout(config.github.timeout());
        let source = HttpListSource::new(&config.awesome.list_url, &list_client)?;

        Ok(Self::with_parts(
            SessionManager::new(tokens, config.github.clone()),
            RateLimitGuard::new(config.rate_limit.threshold, menu),
            AwesomeListIndex::new(source, cache),
        ))
    }
}

impl<T: TokenSource, L: ListSource> StarService<T, L> {
    /// Assemble a service from prebuilt components.
    #[must_use]
    pub const fn with_parts(
        sessions: SessionManager<T>,
        guard: RateLimitGuard,
        awesome: AwesomeListIndex<L>,
    ) -> Self {
        Self {
            sessions,
            guard,
            awesome,
        }
    }

    /// Query both protocols and return the binding rate limit.
    ///
    /// # Errors
    /// Returns error if either rate-limit query fails.
    pub async fn fetch_rate_limit(&self) -> Result<RateLimitSnapshot> {
        let session = self.sessions.session().await?;
        self.guard.check(&session.bulk, &session.single).await
    }

    /// Stargazer counts for `references`, in input order.
    ///
    /// # Errors
    /// Returns error if quota is too low or a remote call aborts the batch.
    pub async fn fetch_multiple_star_count(
        &self,
        references: &[RepositoryReference],
    ) -> Result<Vec<StarResult>> {
        if references.is_empty() {
            return Ok(Vec::new());
        }

        let session = self.sessions.session().await?;
        BatchStarFetcher::new(&session.bulk, &session.single)
            .fetch_many(&self.guard, references)
            .await
    }

    /// Whether `reference` is listed on the awesome list.
    ///
    /// # Errors
    /// Returns error if the list cannot be fetched.
    pub async fn is_awesome_list(&self, reference: &RepositoryReference) -> Result<bool> {
        self.awesome.contains(reference).await
    }

    /// Session holder, for credential changes and invalidation.
    #[must_use]
    pub const fn sessions(&self) -> &SessionManager<T> {
        &self.sessions
    }

    /// Binding snapshot from the last rate-limit check.
    #[must_use]
    pub fn latest_rate_limit(&self) -> Option<RateLimitSnapshot> {
        self.guard.latest()
    }
}
