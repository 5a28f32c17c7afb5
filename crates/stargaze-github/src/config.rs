//! Per-client connection settings.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

/// Recognized options for building one protocol client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL (REST) or full endpoint URL (GraphQL).
    pub endpoint: String,

    /// Value for the `Authorization` header. `None` sends no header at all.
    pub auth_header: Option<SecretString>,

    /// Timeout applied to every request made by the client.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Default timeout for every remote call.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Unauthenticated config for `endpoint` with the default timeout.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_header: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Derive the bearer header from a token. An empty token leaves the
    /// client unauthenticated.
    #[must_use]
    pub fn with_token(mut self, token: Option<&SecretString>) -> Self {
        self.auth_header = token
            .filter(|t| !t.expose_secret().trim().is_empty())
            .map(|t| SecretString::from(format!("Bearer {}", t.expose_secret().trim())));
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field(
                "auth_header",
                &self.auth_header.as_ref().map(|_| "[redacted]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}
