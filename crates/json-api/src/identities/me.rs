//! Current Identity Handler

use salvo::prelude::*;

use crate::{extensions::*, identities::IdentityResponse};

/// Current Identity Handler
///
/// Returns the identity the bearer token resolved to.
#[endpoint(
    tags("identities"),
    summary = "Current Identity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Authenticated identity"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<IdentityResponse>, StatusError> {
    let identity = depot.identity_or_401()?;

    Ok(Json(IdentityResponse::from(identity.clone())))
}
