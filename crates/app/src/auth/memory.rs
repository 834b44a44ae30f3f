//! In-process credential store.

use std::collections::HashMap;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    auth::{
        CredentialStore, StoreError,
        models::{CredentialTokenRecord, NewCredentialToken, TokenId},
        token::LookupHash,
    },
    identities::{
        data::IdentityUpdate,
        records::{IdentityId, IdentityRecord, NewIdentityRecord},
    },
};

#[derive(Debug, Default)]
struct StoreData {
    identities: HashMap<IdentityId, IdentityRecord>,
    tokens: HashMap<LookupHash, CredentialTokenRecord>,
    next_identity_id: i64,
    next_token_id: i64,
}

impl StoreData {
    fn remove_tokens_for(&mut self, id: IdentityId) -> u64 {
        let before = self.tokens.len();

        self.tokens.retain(|_, token| token.identity_id != id);

        (before - self.tokens.len()) as u64
    }

    fn push_token(
        &mut self,
        token: NewCredentialToken,
    ) -> Result<CredentialTokenRecord, StoreError> {
        if !self.identities.contains_key(&token.identity_id) {
            return Err(StoreError::NotFound);
        }

        if self.tokens.contains_key(&token.lookup_hash)
            || self
                .tokens
                .values()
                .any(|existing| existing.identity_id == token.identity_id)
        {
            return Err(StoreError::AlreadyExists);
        }

        self.next_token_id += 1;

        let record = CredentialTokenRecord {
            id: TokenId::from_i64(self.next_token_id),
            identity_id: token.identity_id,
            lookup_hash: token.lookup_hash,
            created_at: token.created_at,
            expires_at: token.expires_at,
        };

        self.tokens
            .insert(record.lookup_hash.clone(), record.clone());

        Ok(record)
    }
}

/// Credential store held in process memory.
///
/// Enforces the same constraints as the database schema: unique emails and at most one
/// token per identity. A single lock guards all state, so every method is atomic.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    data: Mutex<StoreData>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_identity_by_email(
        &self,
        email: &str,
    ) -> Result<Option<IdentityRecord>, StoreError> {
        let data = self.data.lock().await;

        Ok(data
            .identities
            .values()
            .find(|identity| identity.email == email)
            .cloned())
    }

    async fn find_identity_by_id(
        &self,
        id: IdentityId,
    ) -> Result<Option<IdentityRecord>, StoreError> {
        Ok(self.data.lock().await.identities.get(&id).cloned())
    }

    async fn find_token_by_lookup_hash(
        &self,
        hash: &LookupHash,
    ) -> Result<Option<CredentialTokenRecord>, StoreError> {
        Ok(self.data.lock().await.tokens.get(hash).cloned())
    }

    async fn delete_tokens_for_identity(&self, id: IdentityId) -> Result<u64, StoreError> {
        Ok(self.data.lock().await.remove_tokens_for(id))
    }

    async fn insert_token(
        &self,
        token: NewCredentialToken,
    ) -> Result<CredentialTokenRecord, StoreError> {
        self.data.lock().await.push_token(token)
    }

    async fn replace_token(
        &self,
        token: NewCredentialToken,
    ) -> Result<CredentialTokenRecord, StoreError> {
        let mut data = self.data.lock().await;

        match data.identities.get(&token.identity_id) {
            None => return Err(StoreError::NotFound),
            Some(identity) if !identity.active => return Err(StoreError::Inactive),
            Some(_) => {}
        }

        let removed = data.remove_tokens_for(token.identity_id);

        debug!(identity_id = %token.identity_id, removed, "replacing identity token");

        data.push_token(token)
    }

    async fn delete_token_by_lookup_hash(&self, hash: &LookupHash) -> Result<u64, StoreError> {
        Ok(self
            .data
            .lock()
            .await
            .tokens
            .remove(hash)
            .map_or(0, |_| 1))
    }

    async fn deactivate_identity(&self, id: IdentityId) -> Result<bool, StoreError> {
        let mut data = self.data.lock().await;

        let Some(identity) = data.identities.get_mut(&id) else {
            return Ok(false);
        };

        identity.active = false;
        identity.updated_at = Timestamp::now();

        data.remove_tokens_for(id);

        Ok(true)
    }

    async fn insert_identity(
        &self,
        identity: NewIdentityRecord,
    ) -> Result<IdentityRecord, StoreError> {
        let mut data = self.data.lock().await;

        if data
            .identities
            .values()
            .any(|existing| existing.email == identity.email)
        {
            return Err(StoreError::AlreadyExists);
        }

        data.next_identity_id += 1;

        let now = Timestamp::now();
        let record = IdentityRecord {
            id: IdentityId::from_i64(data.next_identity_id),
            email: identity.email,
            first_name: identity.first_name,
            last_name: identity.last_name,
            active: identity.active,
            password_hash: identity.password_hash,
            created_at: now,
            updated_at: now,
        };

        data.identities.insert(record.id, record.clone());

        Ok(record)
    }

    async fn update_identity(
        &self,
        id: IdentityId,
        update: IdentityUpdate,
    ) -> Result<Option<IdentityRecord>, StoreError> {
        let mut data = self.data.lock().await;

        if !data.identities.contains_key(&id) {
            return Ok(None);
        }

        if data
            .identities
            .values()
            .any(|existing| existing.id != id && existing.email == update.email)
        {
            return Err(StoreError::AlreadyExists);
        }

        let Some(identity) = data.identities.get_mut(&id) else {
            return Ok(None);
        };

        identity.email = update.email;
        identity.first_name = update.first_name;
        identity.last_name = update.last_name;
        identity.active = update.active;
        identity.updated_at = Timestamp::now();

        let updated = identity.clone();

        if !updated.active {
            data.remove_tokens_for(id);
        }

        Ok(Some(updated))
    }

    async fn delete_identity(&self, id: IdentityId) -> Result<bool, StoreError> {
        let mut data = self.data.lock().await;

        if data.identities.remove(&id).is_none() {
            return Ok(false);
        }

        data.remove_tokens_for(id);

        Ok(true)
    }

    async fn list_identities(&self) -> Result<Vec<IdentityRecord>, StoreError> {
        let data = self.data.lock().await;

        let mut identities: Vec<IdentityRecord> = data.identities.values().cloned().collect();

        identities.sort_by(|a, b| a.last_name.cmp(&b.last_name).then(a.id.cmp(&b.id)));

        Ok(identities)
    }

    async fn update_password_hash(
        &self,
        id: IdentityId,
        password_hash: String,
    ) -> Result<bool, StoreError> {
        let mut data = self.data.lock().await;

        let Some(identity) = data.identities.get_mut(&id) else {
            return Ok(false);
        };

        identity.password_hash = password_hash;
        identity.updated_at = Timestamp::now();

        data.remove_tokens_for(id);

        Ok(true)
    }

    async fn delete_expired_tokens(&self, now: Timestamp) -> Result<u64, StoreError> {
        let mut data = self.data.lock().await;
        let before = data.tokens.len();

        data.tokens.retain(|_, token| !token.is_expired_at(now));

        Ok((before - data.tokens.len()) as u64)
    }
}
