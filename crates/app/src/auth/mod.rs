//! Credential lifecycle: password hashing, bearer tokens, login and revocation.

mod errors;
mod hasher;
mod memory;
pub mod models;
mod repository;
mod service;
mod settings;
mod store;
pub mod token;

pub use errors::*;
pub use hasher::*;
pub use memory::MemoryCredentialStore;
pub use repository::PgCredentialStore;
pub use service::*;
pub use settings::*;
pub(crate) use store::bounded;
pub use store::{CredentialStore, MockCredentialStore, StoreError};
pub use token::{
    BEARER_SCHEME, LookupHash, PlaintextToken, TOKEN_BYTES, TOKEN_LENGTH, TokenError,
    generate_token, is_well_formed, parse_bearer,
};
