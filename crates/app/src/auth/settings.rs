//! Auth settings.

use std::time::Duration;

use jiff::SignedDuration;

use crate::auth::HasherConfig;

/// Default lifetime of an issued token.
pub const DEFAULT_TOKEN_TTL: SignedDuration = SignedDuration::from_hours(24);

/// Default upper bound on a single credential store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(3);

/// Credential lifecycle policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSettings {
    /// Lifetime of tokens issued at login.
    pub token_ttl: SignedDuration,

    /// Upper bound on every credential store call.
    pub store_timeout: Duration,

    /// Password hashing cost.
    pub hasher: HasherConfig,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_ttl: DEFAULT_TOKEN_TTL,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            hasher: HasherConfig::default(),
        }
    }
}
