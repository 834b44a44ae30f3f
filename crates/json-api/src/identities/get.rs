//! Get Identity Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use turnstile_app::identities::records::IdentityId;

use crate::{
    extensions::*,
    identities::{IdentityResponse, errors::into_status_error},
    state::State,
};

/// Get Identity Handler
#[endpoint(
    tags("identities"),
    summary = "Get Identity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Identity"),
        (status_code = StatusCode::NOT_FOUND, description = "Identity not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<IdentityResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let identity = state
        .app
        .identities
        .get_identity(IdentityId::from_i64(id.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(identity.into()))
}
