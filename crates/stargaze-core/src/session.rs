//! Session lifecycle for the two GitHub clients.
//!
//! A session pairs a bulk (GraphQL) client with a single-item (REST) client,
//! both bound to the same credential. The manager is the only writer of the
//! session: it hands out shared snapshots and rebuilds them when the
//! credential moves.

use std::sync::Arc;

use secrecy::ExposeSecret;
use stargaze_github::{GraphQLClient, RestClient, SecretString};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::GitHubConfig;
use crate::error::Result;
use crate::traits::TokenSource;

/// Clients bound to one credential.
pub struct Session {
    /// Bulk-query client.
    pub bulk: GraphQLClient,

    /// Single-item client.
    pub single: RestClient,

    bound_credential: Option<SecretString>,
}

impl Session {
    fn build(config: &GitHubConfig, credential: Option<SecretString>) -> Result<Self> {
        let token = credential.as_ref();
        Ok(Self {
            bulk: GraphQLClient::new(&config.graphql_client(token))?,
            single: RestClient::new(&config.rest_client(token))?,
            bound_credential: credential,
        })
    }

    /// Whether the clients send an authorization header.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.bound_credential.is_some()
    }

    fn is_bound_to(&self, credential: Option<&SecretString>) -> bool {
        self.bound_credential.as_ref().map(ExposeSecret::expose_secret)
            == credential.map(ExposeSecret::expose_secret)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("bulk", &self.bulk)
            .field("single", &self.single)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Owns the current [`Session`] and rebuilds it on credential change.
pub struct SessionManager<T: TokenSource> {
    tokens: T,
    config: GitHubConfig,
    current: Mutex<Option<Arc<Session>>>,
}

impl<T: TokenSource> SessionManager<T> {
    /// Create a manager with no session yet.
    #[must_use]
    pub fn new(tokens: T, config: GitHubConfig) -> Self {
        Self {
            tokens,
            config,
            current: Mutex::new(None),
        }
    }

    /// The token source the sessions are bound to.
    #[must_use]
    pub const fn tokens(&self) -> &T {
        &self.tokens
    }

    /// Return the current session, rebuilding it first when none exists,
    /// the credential differs from the bound one, or the token source
    /// reports a change. Makes no network call.
    ///
    /// # Errors
    /// Returns error if the token cannot be read or a client cannot be built.
    pub async fn session(&self) -> Result<Arc<Session>> {
        let credential = self.tokens.load().await?;
        let mut current = self.current.lock().await;

        if let Some(session) = current.as_ref()
            && !self.tokens.changed()
            && session.is_bound_to(credential.as_ref())
        {
            return Ok(Arc::clone(session));
        }

        debug!(
            authenticated = credential.is_some(),
            "building GitHub clients"
        );
        let session = Arc::new(Session::build(&self.config, credential)?);
        *current = Some(Arc::clone(&session));
        self.tokens.clear_changed();

        Ok(session)
    }

    /// Drop the current session so the next request rebuilds it.
    pub async fn invalidate(&self) {
        self.current.lock().await.take();
    }
}
