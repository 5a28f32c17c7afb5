//! Error types for stargaze-github.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub API operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Authentication failed (bad or revoked token).
    #[error("GitHub authentication failed - check the configured token")]
    AuthenticationFailed,

    /// Token not found.
    #[error("no GitHub token found - run `gh auth login` or set GITHUB_TOKEN")]
    NoToken,

    /// API rate limit exceeded on the remote side.
    #[error("GitHub API rate limit exceeded - wait and try again")]
    RateLimited,

    /// Repository not found or no access.
    #[error("repository not found or no access: {0}")]
    RepoNotFound(String),

    /// API error with status code.
    #[error("GitHub API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Network error, including timeouts.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("failed to parse GitHub response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Stargazer count was present but not an integer.
    #[error("malformed stargazer count: {value}")]
    MalformedCount { value: String },

    /// A repository reference could not be used in a request.
    #[error("invalid repository reference '{reference}': {reason}")]
    InvalidReference {
        /// The rejected reference as given.
        reference: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A configured API endpoint cannot be used as a base URL.
    #[error("invalid API endpoint '{url}': {reason}")]
    InvalidEndpoint {
        /// The endpoint as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The token contains bytes that are not valid in an HTTP header.
    #[error("token cannot be used as an authorization header")]
    InvalidHeader,

    /// IO error (e.g., reading gh CLI token).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error came from the transport itself rather than from a
    /// response the remote sent back.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
