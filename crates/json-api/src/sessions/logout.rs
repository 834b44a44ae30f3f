//! Logout Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::into_status_error,
    extensions::*,
    observability::{AuthOutcome, observe_auth},
    state::State,
};

/// Logout Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct LogoutRequest {
    pub token: String,
}

impl std::fmt::Debug for LogoutRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LogoutRequest { token: **redacted** }")
    }
}

/// Logout Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LogoutResponse {
    pub status: String,
}

/// Logout Handler
///
/// Revokes the token. Unknown tokens succeed too.
#[endpoint(
    tags("sessions"),
    summary = "Logout",
    responses(
        (status_code = StatusCode::OK, description = "Token revoked"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Store unavailable"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LogoutRequest>,
    depot: &mut Depot,
) -> Result<Json<LogoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .auth
        .logout(&json.into_inner().token)
        .await
        .map_err(|error| into_status_error("logout", error))?;

    observe_auth("logout", AuthOutcome::Success);

    Ok(Json(LogoutResponse {
        status: "logged out".to_string(),
    }))
}
