//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use turnstile_app::identities::records::Identity;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the identity resolved by the auth middleware.
    fn insert_identity(&mut self, identity: Identity);

    /// The authenticated identity, or 401 when the route skipped the auth middleware.
    fn identity_or_401(&self) -> Result<&Identity, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_identity(&mut self, identity: Identity) {
        self.inject(identity);
    }

    fn identity_or_401(&self) -> Result<&Identity, StatusError> {
        self.obtain::<Identity>()
            .map_err(|_missing| StatusError::unauthorized())
    }
}
