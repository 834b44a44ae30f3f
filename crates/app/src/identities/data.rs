//! Identity Data

use std::fmt;

/// New Identity Data
#[derive(Clone, PartialEq, Eq)]
pub struct NewIdentity {
    /// Login email; must be unique.
    pub email: String,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Plaintext password, hashed before it reaches the store.
    pub password: String,

    /// Whether the identity may authenticate.
    pub active: bool,
}

impl fmt::Debug for NewIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewIdentity")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"**redacted**")
            .field("active", &self.active)
            .finish()
    }
}

/// Profile fields an administrator may overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUpdate {
    pub email: String,
    pub first_name: String,
    pub last_name: String,

    /// `false` revokes every token; `true` reactivates a deactivated identity.
    pub active: bool,
}
