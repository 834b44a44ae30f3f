//! Credential lifecycle core: identities, password hashing, bearer tokens and their stores.

pub mod auth;
pub mod context;
pub mod database;
pub mod identities;
pub mod ids;

#[cfg(test)]
mod test;
