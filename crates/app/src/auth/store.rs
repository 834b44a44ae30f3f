//! Credential store contract.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    auth::{
        models::{CredentialTokenRecord, NewCredentialToken},
        token::LookupHash,
    },
    identities::{
        data::IdentityUpdate,
        records::{IdentityId, IdentityRecord, NewIdentityRecord},
    },
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("record already exists")]
    AlreadyExists,

    #[error("record not found")]
    NotFound,

    #[error("identity is inactive")]
    Inactive,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::NotFound,
            Some(_) | None => Self::Sql(error),
        }
    }
}

/// Persistence boundary for identities and their tokens.
///
/// Every method is a single atomic operation against the backing store.
#[automock]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_identity_by_email(
        &self,
        email: &str,
    ) -> Result<Option<IdentityRecord>, StoreError>;

    async fn find_identity_by_id(
        &self,
        id: IdentityId,
    ) -> Result<Option<IdentityRecord>, StoreError>;

    async fn find_token_by_lookup_hash(
        &self,
        hash: &LookupHash,
    ) -> Result<Option<CredentialTokenRecord>, StoreError>;

    /// Returns the number of tokens removed.
    async fn delete_tokens_for_identity(&self, id: IdentityId) -> Result<u64, StoreError>;

    async fn insert_token(
        &self,
        token: NewCredentialToken,
    ) -> Result<CredentialTokenRecord, StoreError>;

    /// Delete every token of `token.identity_id` and insert `token`, serialised per identity.
    ///
    /// Fails with [`StoreError::Inactive`] when the identity is inactive once locked.
    async fn replace_token(
        &self,
        token: NewCredentialToken,
    ) -> Result<CredentialTokenRecord, StoreError>;

    /// Idempotent; returns the number of tokens removed.
    async fn delete_token_by_lookup_hash(&self, hash: &LookupHash) -> Result<u64, StoreError>;

    /// Clear the active flag and delete every token of the identity together.
    /// Returns `false` when no such identity exists.
    async fn deactivate_identity(&self, id: IdentityId) -> Result<bool, StoreError>;

    async fn insert_identity(
        &self,
        identity: NewIdentityRecord,
    ) -> Result<IdentityRecord, StoreError>;

    /// Overwrite the profile fields. Clearing `active` deletes every token of the identity
    /// in the same unit. Returns `None` when no such identity exists.
    async fn update_identity(
        &self,
        id: IdentityId,
        update: IdentityUpdate,
    ) -> Result<Option<IdentityRecord>, StoreError>;

    /// Remove the identity together with its tokens.
    /// Returns `false` when no such identity exists.
    async fn delete_identity(&self, id: IdentityId) -> Result<bool, StoreError>;

    /// All identities ordered by last name, then id.
    async fn list_identities(&self) -> Result<Vec<IdentityRecord>, StoreError>;

    /// Replace the password hash and delete every token of the identity together.
    /// Returns `false` when no such identity exists.
    async fn update_password_hash(
        &self,
        id: IdentityId,
        password_hash: String,
    ) -> Result<bool, StoreError>;

    /// Returns the number of tokens removed.
    async fn delete_expired_tokens(&self, now: Timestamp) -> Result<u64, StoreError>;
}

/// Run a store call, failing with [`StoreError::Timeout`] once `limit` elapses.
pub(crate) async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_elapsed| StoreError::Timeout(limit))?
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn bounded_passes_through_fast_results() {
        let result = bounded(Duration::from_secs(1), async { Ok::<_, StoreError>(5) }).await;

        assert!(matches!(result, Ok(5)));
    }

    #[tokio::test]
    async fn bounded_times_out_stalled_calls() {
        let result = bounded(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(30)).await;

            Ok::<_, StoreError>(())
        })
        .await;

        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            StoreError::from(Error::RowNotFound),
            StoreError::NotFound
        ));
    }

    #[test]
    fn other_sql_errors_are_kept() {
        assert!(matches!(
            StoreError::from(Error::PoolTimedOut),
            StoreError::Sql(_)
        ));
    }
}
