//! Identities

pub(crate) mod deactivate;
pub(crate) mod delete;
mod errors;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod me;
mod models;
pub(crate) mod update;

pub(crate) use models::IdentityResponse;
