//! Sessions: login, logout and token validation.

pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod validate;
