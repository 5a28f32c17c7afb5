//! Error types for stargaze-core.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in stargaze-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Not enough quota left to run a batch.
    #[error("rate limit {remaining}/{limit} is below threshold {threshold}")]
    RateLimitExceeded {
        /// Calls left when the check ran.
        remaining: i64,
        /// Calls allowed per window.
        limit: i64,
        /// Minimum fraction of quota that must remain.
        threshold: f64,
    },

    /// A remote call failed or returned data that could not be used.
    #[error(transparent)]
    GitHub(#[from] stargaze_github::Error),

    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("toml error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// Whether this error came from the transport rather than a remote answer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::GitHub(e) if e.is_transport())
    }
}
