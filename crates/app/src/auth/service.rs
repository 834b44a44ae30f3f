//! Auth service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, error, info, warn};

use crate::{
    auth::{
        AuthServiceError, AuthSettings, CredentialStore, SecretHasher, SecretHasherError,
        StoreError, bounded,
        models::{IssuedToken, Session},
        token::{LookupHash, generate_token, is_well_formed, parse_bearer},
    },
    identities::records::{Identity, IdentityId},
};

/// Login, request authentication, and revocation over a [`CredentialStore`].
#[derive(Clone)]
pub struct CredentialAuthService {
    store: Arc<dyn CredentialStore>,
    hasher: SecretHasher,
    settings: AuthSettings,
}

impl std::fmt::Debug for CredentialAuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialAuthService")
            .field("hasher", &self.hasher)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CredentialAuthService {
    /// Build the service over `store`.
    ///
    /// # Errors
    ///
    /// Returns an error when the hasher parameters in `settings` are rejected.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        settings: AuthSettings,
    ) -> Result<Self, SecretHasherError> {
        let hasher = SecretHasher::new(settings.hasher)?;

        Ok(Self {
            store,
            hasher,
            settings,
        })
    }

    /// Resolve a well-formed plaintext token to its active owner.
    async fn resolve(&self, plaintext: &str) -> Result<Identity, AuthServiceError> {
        let limit = self.settings.store_timeout;
        let lookup_hash = LookupHash::of(plaintext);

        let token = bounded(limit, self.store.find_token_by_lookup_hash(&lookup_hash))
            .await?
            .ok_or(AuthServiceError::UnknownToken)?;

        if token.is_expired_at(Timestamp::now()) {
            debug!(token_id = %token.id, "rejected expired token");

            return Err(AuthServiceError::ExpiredToken);
        }

        let Some(identity) = bounded(limit, self.store.find_identity_by_id(token.identity_id))
            .await?
        else {
            warn!(
                token_id = %token.id,
                identity_id = %token.identity_id,
                "token references a missing identity"
            );

            return Err(AuthServiceError::UnknownToken);
        };

        if !identity.active {
            debug!(identity_id = %identity.id, "rejected token of inactive identity");

            return Err(AuthServiceError::AccountInactive);
        }

        Ok(Identity::from(identity))
    }
}

#[async_trait]
impl AuthService for CredentialAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthServiceError> {
        let limit = self.settings.store_timeout;

        let Some(record) = bounded(limit, self.store.find_identity_by_email(email)).await? else {
            // Pay the hashing cost anyway so response time does not reveal unknown emails.
            if let Err(error) = self.hasher.hash_blocking(password).await {
                warn!(%error, "decoy hash failed");
            }

            debug!("login rejected");

            return Err(AuthServiceError::InvalidCredentials);
        };

        match self
            .hasher
            .verify_blocking(&record.password_hash, password)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                debug!(identity_id = %record.id, "login rejected");

                return Err(AuthServiceError::InvalidCredentials);
            }
            Err(SecretHasherError::MalformedSecret(source)) => {
                error!(
                    identity_id = %record.id,
                    error = %source,
                    "stored password hash is malformed"
                );

                return Err(AuthServiceError::InvalidCredentials);
            }
            Err(other) => return Err(AuthServiceError::Hasher(other)),
        }

        if !record.active {
            debug!(identity_id = %record.id, "login refused for inactive identity");

            return Err(AuthServiceError::AccountInactive);
        }

        let token = generate_token(record.id, self.settings.token_ttl)
            .map_err(AuthServiceError::TokenGeneration)?;

        let stored = bounded(limit, self.store.replace_token(token.to_new_token()))
            .await
            .map_err(|error| match error {
                StoreError::NotFound => AuthServiceError::InvalidCredentials,
                StoreError::Inactive => {
                    debug!(identity_id = %record.id, "identity deactivated during login");

                    AuthServiceError::AccountInactive
                }
                other => AuthServiceError::from(other),
            })?;

        info!(identity_id = %record.id, token_id = %stored.id, "issued token");

        Ok(Session {
            identity: Identity::from(record),
            token: IssuedToken {
                id: stored.id,
                token: token.plaintext,
                created_at: stored.created_at,
                expires_at: stored.expires_at,
            },
        })
    }

    async fn authenticate(&self, authorization: &str) -> Result<Identity, AuthServiceError> {
        let plaintext = parse_bearer(authorization)
            .map_err(|_malformed| AuthServiceError::MalformedCredential)?;

        self.resolve(plaintext).await
    }

    async fn validate_token(&self, plaintext: &str) -> Result<bool, AuthServiceError> {
        if !is_well_formed(plaintext) {
            return Ok(false);
        }

        match self.resolve(plaintext).await {
            Ok(_) => Ok(true),
            Err(error) if error.is_rejection() => Ok(false),
            Err(error) => Err(error),
        }
    }

    async fn logout(&self, plaintext: &str) -> Result<(), AuthServiceError> {
        if !is_well_formed(plaintext) {
            return Ok(());
        }

        let removed = bounded(
            self.settings.store_timeout,
            self.store
                .delete_token_by_lookup_hash(&LookupHash::of(plaintext)),
        )
        .await?;

        debug!(removed, "logged out");

        Ok(())
    }

    async fn deactivate_and_revoke(&self, id: IdentityId) -> Result<bool, AuthServiceError> {
        let existed = bounded(self.settings.store_timeout, self.store.deactivate_identity(id))
            .await?;

        if existed {
            info!(identity_id = %id, "deactivated identity and revoked its tokens");
        }

        Ok(existed)
    }

    async fn sweep_expired_tokens(&self) -> Result<u64, AuthServiceError> {
        let removed = bounded(
            self.settings.store_timeout,
            self.store.delete_expired_tokens(Timestamp::now()),
        )
        .await?;

        info!(removed, "swept expired tokens");

        Ok(removed)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify `email` and `password` and issue a fresh token, replacing any earlier one.
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthServiceError>;

    /// Resolve an `Authorization` header value of the form `Bearer <token>`.
    async fn authenticate(&self, authorization: &str) -> Result<Identity, AuthServiceError>;

    /// Whether a bare token currently authenticates. Rejections are `false`.
    async fn validate_token(&self, plaintext: &str) -> Result<bool, AuthServiceError>;

    /// Revoke a token. Unknown tokens are ignored.
    async fn logout(&self, plaintext: &str) -> Result<(), AuthServiceError>;

    /// Deactivate an identity and revoke all of its tokens.
    /// Returns `false` when no such identity exists.
    async fn deactivate_and_revoke(&self, id: IdentityId) -> Result<bool, AuthServiceError>;

    /// Delete tokens past their expiry.
    async fn sweep_expired_tokens(&self) -> Result<u64, AuthServiceError>;
}
