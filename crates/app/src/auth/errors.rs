//! Auth service errors.

use thiserror::Error;

use crate::auth::{SecretHasherError, StoreError, TokenError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Unknown email or wrong password; deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is inactive")]
    AccountInactive,

    #[error("malformed credential")]
    MalformedCredential,

    #[error("unknown token")]
    UnknownToken,

    #[error("expired token")]
    ExpiredToken,

    #[error("token generation failed")]
    TokenGeneration(#[source] TokenError),

    /// The hasher could not run at all. A corrupt stored secret is not this; login
    /// reports that as [`Self::InvalidCredentials`].
    #[error("password hasher failed")]
    Hasher(#[source] SecretHasherError),

    #[error("credential store unavailable")]
    Store(#[source] StoreError),
}

impl AuthServiceError {
    /// Whether the error means "present a different credential" rather than an outage.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            Self::TokenGeneration(_) | Self::Hasher(_) | Self::Store(_)
        )
    }
}

impl From<StoreError> for AuthServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Inactive => Self::AccountInactive,
            other => Self::Store(other),
        }
    }
}
