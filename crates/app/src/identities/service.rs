//! Identities Service

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::{AuthSettings, CredentialStore, SecretHasher, SecretHasherError, bounded},
    identities::{
        IdentitiesServiceError,
        data::{IdentityUpdate, NewIdentity},
        records::{Identity, IdentityId, NewIdentityRecord},
    },
};

/// Identity management over a [`CredentialStore`].
#[derive(Clone)]
pub struct StoreIdentitiesService {
    store: Arc<dyn CredentialStore>,
    hasher: SecretHasher,
    store_timeout: Duration,
}

impl std::fmt::Debug for StoreIdentitiesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreIdentitiesService")
            .field("hasher", &self.hasher)
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

impl StoreIdentitiesService {
    /// Build the service over `store`.
    ///
    /// # Errors
    ///
    /// Returns an error when the hasher parameters in `settings` are rejected.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        settings: &AuthSettings,
    ) -> Result<Self, SecretHasherError> {
        Ok(Self {
            store,
            hasher: SecretHasher::new(settings.hasher)?,
            store_timeout: settings.store_timeout,
        })
    }
}

#[async_trait]
impl IdentitiesService for StoreIdentitiesService {
    async fn create_identity(
        &self,
        identity: NewIdentity,
    ) -> Result<Identity, IdentitiesServiceError> {
        let email = identity.email.trim();

        if email.is_empty() {
            return Err(IdentitiesServiceError::InvalidData("email is required"));
        }

        if identity.password.is_empty() {
            return Err(IdentitiesServiceError::InvalidData("password is required"));
        }

        let password_hash = self.hasher.hash_blocking(&identity.password).await?;

        let record = bounded(
            self.store_timeout,
            self.store.insert_identity(NewIdentityRecord {
                email: email.to_string(),
                first_name: identity.first_name.trim().to_string(),
                last_name: identity.last_name.trim().to_string(),
                active: identity.active,
                password_hash,
            }),
        )
        .await?;

        info!(identity_id = %record.id, "created identity");

        Ok(Identity::from(record))
    }

    async fn get_identity(&self, id: IdentityId) -> Result<Identity, IdentitiesServiceError> {
        bounded(self.store_timeout, self.store.find_identity_by_id(id))
            .await?
            .map(Identity::from)
            .ok_or(IdentitiesServiceError::NotFound)
    }

    async fn list_identities(&self) -> Result<Vec<Identity>, IdentitiesServiceError> {
        let records = bounded(self.store_timeout, self.store.list_identities()).await?;

        Ok(records.into_iter().map(Identity::from).collect())
    }

    async fn update_identity(
        &self,
        id: IdentityId,
        update: IdentityUpdate,
    ) -> Result<Identity, IdentitiesServiceError> {
        let email = update.email.trim();

        if email.is_empty() {
            return Err(IdentitiesServiceError::InvalidData("email is required"));
        }

        let update = IdentityUpdate {
            email: email.to_string(),
            first_name: update.first_name.trim().to_string(),
            last_name: update.last_name.trim().to_string(),
            active: update.active,
        };

        let record = bounded(self.store_timeout, self.store.update_identity(id, update))
            .await?
            .ok_or(IdentitiesServiceError::NotFound)?;

        info!(identity_id = %id, active = record.active, "updated identity");

        Ok(Identity::from(record))
    }

    async fn delete_identity(&self, id: IdentityId) -> Result<(), IdentitiesServiceError> {
        let existed = bounded(self.store_timeout, self.store.delete_identity(id)).await?;

        if !existed {
            return Err(IdentitiesServiceError::NotFound);
        }

        info!(identity_id = %id, "deleted identity and its tokens");

        Ok(())
    }

    async fn reset_password(
        &self,
        id: IdentityId,
        password: &str,
    ) -> Result<(), IdentitiesServiceError> {
        if password.is_empty() {
            return Err(IdentitiesServiceError::InvalidData("password is required"));
        }

        let password_hash = self.hasher.hash_blocking(password).await?;

        let updated = bounded(
            self.store_timeout,
            self.store.update_password_hash(id, password_hash),
        )
        .await?;

        if !updated {
            return Err(IdentitiesServiceError::NotFound);
        }

        info!(identity_id = %id, "reset password and revoked tokens");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait IdentitiesService: Send + Sync {
    /// Hash the password and persist a new identity.
    async fn create_identity(
        &self,
        identity: NewIdentity,
    ) -> Result<Identity, IdentitiesServiceError>;

    async fn get_identity(&self, id: IdentityId) -> Result<Identity, IdentitiesServiceError>;

    /// All identities ordered by last name.
    async fn list_identities(&self) -> Result<Vec<Identity>, IdentitiesServiceError>;

    /// Overwrite email, names and the active flag. Deactivating revokes every token;
    /// setting `active` again is the only way back in after a deactivation.
    async fn update_identity(
        &self,
        id: IdentityId,
        update: IdentityUpdate,
    ) -> Result<Identity, IdentitiesServiceError>;

    /// Remove the identity and every token it holds.
    async fn delete_identity(&self, id: IdentityId) -> Result<(), IdentitiesServiceError>;

    /// Replace the password and revoke every token the identity holds.
    async fn reset_password(
        &self,
        id: IdentityId,
        password: &str,
    ) -> Result<(), IdentitiesServiceError>;
}
