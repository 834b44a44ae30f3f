//! Identities service errors.

use thiserror::Error;

use crate::auth::{SecretHasherError, StoreError};

/// Identity management error variants.
#[derive(Debug, Error)]
pub enum IdentitiesServiceError {
    /// An identity with the same email already exists.
    #[error("identity already exists")]
    AlreadyExists,

    /// Identity was not found.
    #[error("identity not found")]
    NotFound,

    /// Provided data failed validation.
    #[error("invalid data: {0}")]
    InvalidData(&'static str),

    /// Password hashing failed.
    #[error("password hashing failed")]
    Hasher(#[source] SecretHasherError),

    /// Underlying credential store failure.
    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for IdentitiesServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::AlreadyExists => Self::AlreadyExists,
            StoreError::NotFound => Self::NotFound,
            StoreError::Inactive | StoreError::Timeout(_) | StoreError::Sql(_) => {
                Self::Store(error)
            }
        }
    }
}

impl From<SecretHasherError> for IdentitiesServiceError {
    fn from(error: SecretHasherError) -> Self {
        Self::Hasher(error)
    }
}
