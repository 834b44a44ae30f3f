//! Identity response models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use turnstile_app::identities::records::Identity;

/// Identity as returned to clients. Never carries password material.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct IdentityResponse {
    /// Identity id
    pub id: i64,

    /// Login email
    pub email: String,

    pub first_name: String,

    pub last_name: String,

    /// Whether the identity may authenticate
    pub active: bool,

    /// The date and time the identity was created
    pub created_at: String,

    /// The date and time the identity was last updated
    pub updated_at: String,
}

impl From<Identity> for IdentityResponse {
    fn from(identity: Identity) -> Self {
        IdentityResponse {
            id: identity.id.into_i64(),
            email: identity.email,
            first_name: identity.first_name,
            last_name: identity.last_name,
            active: identity.active,
            created_at: identity.created_at.to_string(),
            updated_at: identity.updated_at.to_string(),
        }
    }
}
