//! Identity Records

use std::fmt;

use jiff::Timestamp;

use crate::ids::TypedId;

/// Identity ID
pub type IdentityId = TypedId<IdentityRecord>;

/// Identity row as persisted, including the stored password hash.
///
/// This type never leaves the crate boundary through a service; callers receive
/// [`Identity`] instead.
#[derive(Clone)]
pub struct IdentityRecord {
    pub id: IdentityId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub active: bool,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl fmt::Debug for IdentityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("active", &self.active)
            .field("password_hash", &"**redacted**")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Identity as exposed to callers. Carries no password material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<IdentityRecord> for Identity {
    fn from(record: IdentityRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            active: record.active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// New identity persistence payload; the password is already hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct NewIdentityRecord {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub active: bool,
    pub password_hash: String,
}

impl fmt::Debug for NewIdentityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewIdentityRecord")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("active", &self.active)
            .field("password_hash", &"**redacted**")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> IdentityRecord {
        IdentityRecord {
            id: IdentityId::from_i64(7),
            email: "a@x.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            active: true,
            password_hash: "$argon2id$v=19$secret".to_string(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn debug_output_redacts_password_hash() {
        let rendered = format!("{:?}", record());

        assert!(!rendered.contains("argon2id"), "hash leaked: {rendered}");
        assert!(rendered.contains("**redacted**"));
    }

    #[test]
    fn identity_from_record_keeps_profile_fields() {
        let identity = Identity::from(record());

        assert_eq!(identity.id, IdentityId::from_i64(7));
        assert_eq!(identity.email, "a@x.com");
        assert!(identity.active);
    }
}
