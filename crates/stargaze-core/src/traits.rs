//! Collaborator seams of the core.
//!
//! The core does not own credential storage, caching, or menu rendering. It
//! reaches them through these traits so hosts can plug in their own.

use stargaze_github::SecretString;

use crate::Result;

/// Supplies the current credential and reports whether it changed.
pub trait TokenSource: Send + Sync {
    /// Read the current token. `None` means run unauthenticated.
    fn load(&self) -> impl std::future::Future<Output = Result<Option<SecretString>>> + Send;

    /// Whether the token changed since the flag was last cleared.
    fn changed(&self) -> bool;

    /// Acknowledge a change.
    fn clear_changed(&self);
}

/// Generic key to value store.
pub trait Cache: Send + Sync {
    /// Look up `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    fn set(&self, key: &str, value: String);
}

/// Receives display titles keyed by menu id. Fire-and-forget.
pub trait ContextMenu: Send + Sync {
    /// Create or replace the entry `menu_id`.
    fn upsert(&self, menu_id: &str, title: &str);
}
