//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{
        AuthService, AuthSettings, CredentialAuthService, CredentialStore, PgCredentialStore,
        SecretHasherError,
    },
    database,
    identities::{IdentitiesService, StoreIdentitiesService},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("invalid password hasher settings")]
    Hasher(#[source] SecretHasherError),
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub identities: Arc<dyn IdentitiesService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails or the hasher
    /// settings are invalid.
    pub async fn from_database_url(
        url: &str,
        settings: AuthSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url, settings.store_timeout)
            .await
            .map_err(AppInitError::Database)?;

        Self::from_store(Arc::new(PgCredentialStore::new(pool)), settings)
    }

    /// Build application context over any credential store.
    ///
    /// # Errors
    ///
    /// Returns an error when the hasher settings are invalid.
    pub fn from_store(
        store: Arc<dyn CredentialStore>,
        settings: AuthSettings,
    ) -> Result<Self, AppInitError> {
        let identities = StoreIdentitiesService::new(Arc::clone(&store), &settings)
            .map_err(AppInitError::Hasher)?;

        let auth = CredentialAuthService::new(store, settings).map_err(AppInitError::Hasher)?;

        Ok(Self {
            auth: Arc::new(auth),
            identities: Arc::new(identities),
        })
    }
}
