//! Credential store backing the session's token source.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use secrecy::ExposeSecret;
use stargaze_github::{Auth, SecretString};
use tracing::debug;

use crate::error::Result;
use crate::traits::TokenSource;

/// Token source with a runtime override on top of an [`Auth`] fallback.
///
/// Setting or clearing the override raises the changed flag, which makes the
/// next session request rebuild both clients.
pub struct CredentialStore {
    auth: Auth,
    override_token: RwLock<Option<SecretString>>,
    changed: AtomicBool,
}

impl CredentialStore {
    /// Create a store that falls back to `auth`.
    #[must_use]
    pub const fn new(auth: Auth) -> Self {
        Self {
            auth,
            override_token: RwLock::new(None),
            changed: AtomicBool::new(false),
        }
    }

    /// Replace the override token. An empty token clears it.
    pub fn set(&self, token: Option<SecretString>) {
        let token = token.filter(|t| !t.expose_secret().trim().is_empty());
        if let Ok(mut current) = self.override_token.write() {
            *current = token;
        }
        self.changed.store(true, Ordering::SeqCst);
    }

    fn override_token(&self) -> Option<SecretString> {
        self.override_token.read().ok().and_then(|t| t.clone())
    }
}

impl TokenSource for CredentialStore {
    async fn load(&self) -> Result<Option<SecretString>> {
        if let Some(token) = self.override_token() {
            return Ok(Some(token));
        }

        // Resolving through the gh CLI spawns a process.
        let auth = self.auth.clone();
        let token = tokio::task::spawn_blocking(move || auth.resolve_optional())
            .await
            .map_err(std::io::Error::other)??;

        if token.is_none() {
            debug!("no GitHub token available, running unauthenticated");
        }
        Ok(token)
    }

    fn changed(&self) -> bool {
        self.changed.load(Ordering::SeqCst)
    }

    fn clear_changed(&self) {
        self.changed.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("override_token", &self.override_token().map(|_| "[redacted]"))
            .field("changed", &self.changed())
            .finish_non_exhaustive()
    }
}
