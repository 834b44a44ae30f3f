//! Auth data models.

use jiff::Timestamp;

use crate::{
    auth::token::{LookupHash, PlaintextToken},
    identities::records::{Identity, IdentityId},
    ids::TypedId,
};

/// Token ID
pub type TokenId = TypedId<CredentialTokenRecord>;

/// Freshly generated token, before persistence.
#[derive(Debug, Clone)]
pub struct CredentialToken {
    pub identity_id: IdentityId,
    pub plaintext: PlaintextToken,
    pub lookup_hash: LookupHash,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl CredentialToken {
    /// The persistable part of the token. Leaves the plaintext behind.
    #[must_use]
    pub fn to_new_token(&self) -> NewCredentialToken {
        NewCredentialToken {
            identity_id: self.identity_id,
            lookup_hash: self.lookup_hash.clone(),
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

/// Token persistence payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCredentialToken {
    pub identity_id: IdentityId,
    pub lookup_hash: LookupHash,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Token row as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialTokenRecord {
    pub id: TokenId,
    pub identity_id: IdentityId,
    pub lookup_hash: LookupHash,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl CredentialTokenRecord {
    /// Whether the token is past its expiry at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

/// Token issuance result with the one-time plaintext.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub id: TokenId,
    pub token: PlaintextToken,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
    pub token: IssuedToken,
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use super::*;

    fn record(expires_at: Timestamp) -> CredentialTokenRecord {
        CredentialTokenRecord {
            id: TokenId::from_i64(1),
            identity_id: IdentityId::from_i64(1),
            lookup_hash: LookupHash::of("x"),
            created_at: Timestamp::UNIX_EPOCH,
            expires_at,
        }
    }

    #[test]
    fn expiry_boundary_counts_as_expired() -> TestResult {
        let now = Timestamp::now();

        assert!(record(now).is_expired_at(now));
        assert!(record(now.checked_sub(SignedDuration::from_secs(1))?).is_expired_at(now));
        assert!(!record(now.checked_add(SignedDuration::from_secs(1))?).is_expired_at(now));

        Ok(())
    }
}
