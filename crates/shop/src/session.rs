//! Authentication state for a shopping session.
//!
//! The storefront client never mints or refreshes tokens; it is handed an
//! access token at login and drops it at logout. Each reconciliation
//! controller tracks its own [`SyncState`] derived from that token plus the
//! health of the remote store.

use secrecy::{ExposeSecret, SecretString};

/// Bearer token for the storefront REST backend.
///
/// Implements `Debug` with the token redacted.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Expose the raw token for constructing an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

impl From<SecretString> for AccessToken {
    fn from(token: SecretString) -> Self {
        Self(token)
    }
}

/// Where a controller currently sources its canonical snapshot.
///
/// ```text
/// AnonymousLocal --(login)--> Remote      [load(): fetch + one-time merge]
/// Remote --(fetch/mutation failure)--> Degraded   [serve the local mirror]
/// Degraded --(successful fetch)--> Remote
/// Remote/Degraded --(logout)--> AnonymousLocal    [remote store abandoned]
/// ```
#[derive(Debug, Clone)]
pub enum SyncState {
    /// Not authenticated; the local cache is canonical.
    AnonymousLocal,
    /// Authenticated and the remote store is healthy.
    Remote { token: AccessToken },
    /// Authenticated but remote calls are failing; the local mirror stands
    /// in until the next successful fetch.
    Degraded { token: AccessToken },
}

impl SyncState {
    /// The access token, when authenticated.
    #[must_use]
    pub const fn token(&self) -> Option<&AccessToken> {
        match self {
            Self::AnonymousLocal => None,
            Self::Remote { token } | Self::Degraded { token } => Some(token),
        }
    }

    /// Whether the controller is operating against the remote store.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        !matches!(self, Self::AnonymousLocal)
    }

    /// Whether the controller is serving the local mirror while
    /// authenticated.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Short label for tracing output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AnonymousLocal => "anonymous_local",
            Self::Remote { .. } => "remote",
            Self::Degraded { .. } => "degraded",
        }
    }
}
