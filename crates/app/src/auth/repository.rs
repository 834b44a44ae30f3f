//! PostgreSQL credential store.

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, PgPool, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
};

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

const FIND_IDENTITY_BY_EMAIL_SQL: &str = include_str!("sql/find_identity_by_email.sql");
const FIND_IDENTITY_BY_ID_SQL: &str = include_str!("sql/find_identity_by_id.sql");
const LOCK_IDENTITY_SQL: &str = include_str!("sql/lock_identity.sql");
const LIST_IDENTITIES_SQL: &str = include_str!("sql/list_identities.sql");
const INSERT_IDENTITY_SQL: &str = include_str!("sql/insert_identity.sql");
const UPDATE_IDENTITY_SQL: &str = include_str!("sql/update_identity.sql");
const DELETE_IDENTITY_SQL: &str = include_str!("sql/delete_identity.sql");
const DEACTIVATE_IDENTITY_SQL: &str = include_str!("sql/deactivate_identity.sql");
const UPDATE_PASSWORD_HASH_SQL: &str = include_str!("sql/update_password_hash.sql");
const FIND_TOKEN_BY_LOOKUP_HASH_SQL: &str = include_str!("sql/find_token_by_lookup_hash.sql");
const INSERT_TOKEN_SQL: &str = include_str!("sql/insert_token.sql");
const DELETE_TOKENS_FOR_IDENTITY_SQL: &str = include_str!("sql/delete_tokens_for_identity.sql");
const DELETE_TOKEN_BY_LOOKUP_HASH_SQL: &str = include_str!("sql/delete_token_by_lookup_hash.sql");
const DELETE_EXPIRED_TOKENS_SQL: &str = include_str!("sql/delete_expired_tokens.sql");

/// PostgreSQL-backed credential store.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Take the identity row lock that serialises token changes for one identity.
    ///
    /// Returns the locked row's `active` flag, or `None` when the identity does not exist.
    async fn lock_identity(
        tx: &mut Transaction<'_, Postgres>,
        id: IdentityId,
    ) -> Result<Option<bool>, sqlx::Error> {
        query_scalar::<Postgres, bool>(LOCK_IDENTITY_SQL)
            .bind(id.into_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    async fn insert_token_in(
        tx: &mut Transaction<'_, Postgres>,
        token: &NewCredentialToken,
    ) -> Result<CredentialTokenRecord, sqlx::Error> {
        query_as::<Postgres, CredentialTokenRecord>(INSERT_TOKEN_SQL)
            .bind(token.identity_id.into_i64())
            .bind(token.lookup_hash.as_str())
            .bind(SqlxTimestamp::from(token.created_at))
            .bind(SqlxTimestamp::from(token.expires_at))
            .fetch_one(&mut **tx)
            .await
    }

    async fn delete_tokens_in(
        tx: &mut Transaction<'_, Postgres>,
        id: IdentityId,
    ) -> Result<u64, sqlx::Error> {
        query(DELETE_TOKENS_FOR_IDENTITY_SQL)
            .bind(id.into_i64())
            .execute(&mut **tx)
            .await
            .map(|result| result.rows_affected())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_identity_by_email(
        &self,
        email: &str,
    ) -> Result<Option<IdentityRecord>, StoreError> {
        query_as::<Postgres, IdentityRecord>(FIND_IDENTITY_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from)
    }

    async fn find_identity_by_id(
        &self,
        id: IdentityId,
    ) -> Result<Option<IdentityRecord>, StoreError> {
        query_as::<Postgres, IdentityRecord>(FIND_IDENTITY_BY_ID_SQL)
            .bind(id.into_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from)
    }

    async fn find_token_by_lookup_hash(
        &self,
        hash: &LookupHash,
    ) -> Result<Option<CredentialTokenRecord>, StoreError> {
        query_as::<Postgres, CredentialTokenRecord>(FIND_TOKEN_BY_LOOKUP_HASH_SQL)
            .bind(hash.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from)
    }

    async fn delete_tokens_for_identity(&self, id: IdentityId) -> Result<u64, StoreError> {
        let rows_affected = query(DELETE_TOKENS_FOR_IDENTITY_SQL)
            .bind(id.into_i64())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn insert_token(
        &self,
        token: NewCredentialToken,
    ) -> Result<CredentialTokenRecord, StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted = Self::insert_token_in(&mut tx, &token).await?;

        tx.commit().await?;

        Ok(inserted)
    }

    async fn replace_token(
        &self,
        token: NewCredentialToken,
    ) -> Result<CredentialTokenRecord, StoreError> {
        let mut tx = self.pool.begin().await?;

        match Self::lock_identity(&mut tx, token.identity_id).await? {
            None => return Err(StoreError::NotFound),
            Some(false) => return Err(StoreError::Inactive),
            Some(true) => {}
        }

        Self::delete_tokens_in(&mut tx, token.identity_id).await?;

        let inserted = Self::insert_token_in(&mut tx, &token).await?;

        tx.commit().await?;

        Ok(inserted)
    }

    async fn delete_token_by_lookup_hash(&self, hash: &LookupHash) -> Result<u64, StoreError> {
        let rows_affected = query(DELETE_TOKEN_BY_LOOKUP_HASH_SQL)
            .bind(hash.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn deactivate_identity(&self, id: IdentityId) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        if Self::lock_identity(&mut tx, id).await?.is_none() {
            return Ok(false);
        }

        query(DEACTIVATE_IDENTITY_SQL)
            .bind(id.into_i64())
            .execute(&mut *tx)
            .await?;

        Self::delete_tokens_in(&mut tx, id).await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn insert_identity(
        &self,
        identity: NewIdentityRecord,
    ) -> Result<IdentityRecord, StoreError> {
        query_as::<Postgres, IdentityRecord>(INSERT_IDENTITY_SQL)
            .bind(identity.email)
            .bind(identity.first_name)
            .bind(identity.last_name)
            .bind(identity.active)
            .bind(identity.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from)
    }

    async fn update_identity(
        &self,
        id: IdentityId,
        update: IdentityUpdate,
    ) -> Result<Option<IdentityRecord>, StoreError> {
        let mut tx = self.pool.begin().await?;

        if Self::lock_identity(&mut tx, id).await?.is_none() {
            return Ok(None);
        }

        let updated = query_as::<Postgres, IdentityRecord>(UPDATE_IDENTITY_SQL)
            .bind(id.into_i64())
            .bind(update.email)
            .bind(update.first_name)
            .bind(update.last_name)
            .bind(update.active)
            .fetch_one(&mut *tx)
            .await?;

        if !updated.active {
            Self::delete_tokens_in(&mut tx, id).await?;
        }

        tx.commit().await?;

        Ok(Some(updated))
    }

    async fn delete_identity(&self, id: IdentityId) -> Result<bool, StoreError> {
        // Tokens go with the row through `ON DELETE CASCADE`.
        let rows_affected = query(DELETE_IDENTITY_SQL)
            .bind(id.into_i64())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn list_identities(&self) -> Result<Vec<IdentityRecord>, StoreError> {
        query_as::<Postgres, IdentityRecord>(LIST_IDENTITIES_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from)
    }

    async fn update_password_hash(
        &self,
        id: IdentityId,
        password_hash: String,
    ) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        if Self::lock_identity(&mut tx, id).await?.is_none() {
            return Ok(false);
        }

        query(UPDATE_PASSWORD_HASH_SQL)
            .bind(id.into_i64())
            .bind(password_hash)
            .execute(&mut *tx)
            .await?;

        Self::delete_tokens_in(&mut tx, id).await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn delete_expired_tokens(&self, now: Timestamp) -> Result<u64, StoreError> {
        let rows_affected = query(DELETE_EXPIRED_TOKENS_SQL)
            .bind(SqlxTimestamp::from(now))
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for IdentityRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: IdentityId::from_i64(row.try_get("id")?),
            email: row.try_get("email")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            active: row.try_get("active")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CredentialTokenRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: TokenId::from_i64(row.try_get("id")?),
            identity_id: IdentityId::from_i64(row.try_get("user_id")?),
            lookup_hash: LookupHash::from_stored(row.try_get("token_hash")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
        })
    }
}
