//! GitHub API types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifies a remote repository by owner and name.
///
/// Both parts are validated on construction, including when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawReference")]
pub struct RepositoryReference {
    owner: String,
    name: String,
}

#[derive(Deserialize)]
struct RawReference {
    owner: String,
    name: String,
}

impl TryFrom<RawReference> for RepositoryReference {
    type Error = Error;

    fn try_from(raw: RawReference) -> Result<Self> {
        Self::new(raw.owner, raw.name)
    }
}

impl RepositoryReference {
    /// Create a reference, validating both parts.
    ///
    /// # Errors
    /// Returns [`Error::InvalidReference`] if either part is empty or contains
    /// characters GitHub never allows in owner or repository names.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let name = name.into();
        let display = format!("{owner}/{name}");

        for (part, label) in [(&owner, "owner"), (&name, "name")] {
            if part.is_empty() {
                return Err(invalid(&display, format!("{label} is empty")));
            }
            if let Some(c) = part.chars().find(|c| !is_allowed(*c)) {
                return Err(invalid(&display, format!("{label} contains {c:?}")));
            }
            if matches!(part.as_str(), "." | "..") {
                return Err(invalid(&display, format!("{label} is a dot segment")));
            }
        }

        Ok(Self { owner, name })
    }

    /// Owner login (user or organization).
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse an `owner/name` string.
    ///
    /// # Errors
    /// Returns [`Error::InvalidReference`] if the input is not exactly two
    /// valid parts separated by a single `/`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let Some((owner, name)) = trimmed.split_once('/') else {
            return Err(invalid(trimmed, "expected owner/name".into()));
        };
        Self::new(owner, name)
    }
}

impl FromStr for RepositoryReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

const fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn invalid(reference: &str, reason: String) -> Error {
    Error::InvalidReference {
        reference: reference.to_string(),
        reason,
    }
}

/// Remaining and total quota reported by one protocol.
///
/// A `remaining` of `-1` or a `limit` of `0`/`-1` means the quota is unknown
/// and must be treated as exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    /// Calls left in the current window.
    pub remaining: i64,

    /// Calls allowed per window.
    pub limit: i64,

    /// When the window resets, if the remote reported it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<DateTime<Utc>>,
}

impl RateLimitSnapshot {
    /// Create a snapshot without reset information.
    #[must_use]
    pub const fn new(remaining: i64, limit: i64) -> Self {
        Self {
            remaining,
            limit,
            reset: None,
        }
    }

    /// A snapshot for a quota the remote did not report.
    #[must_use]
    pub const fn unknown() -> Self {
        Self::new(-1, -1)
    }

    /// Whether the numbers can be used for a headroom decision.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        self.remaining >= 0 && self.limit > 0
    }

    /// Fraction of quota left, `None` when unusable.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> Option<f64> {
        self.is_usable()
            .then(|| self.remaining as f64 / self.limit as f64)
    }

    /// Whole percentage of quota left, 0 when unusable.
    #[must_use]
    pub const fn percent(&self) -> i64 {
        if self.is_usable() {
            self.remaining.saturating_mul(100) / self.limit
        } else {
            0
        }
    }
}
