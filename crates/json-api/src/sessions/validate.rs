//! Validate Token Handler

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

/// Validate Token Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidateTokenRequest {
    pub token: String,
}

impl std::fmt::Debug for ValidateTokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ValidateTokenRequest { token: **redacted** }")
    }
}

/// Validate Token Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidateTokenResponse {
    /// Whether the token currently authenticates
    pub valid: bool,
}

/// Validate Token Handler
#[endpoint(
    tags("sessions"),
    summary = "Validate Token",
    responses(
        (status_code = StatusCode::OK, description = "Validity of the token"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Store unavailable"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidateTokenRequest>,
    depot: &mut Depot,
) -> Result<Json<ValidateTokenResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let valid = state
        .app
        .auth
        .validate_token(&json.into_inner().token)
        .await
        .map_err(|error| into_status_error("validate", error))?;

    observe_auth(
        "validate",
        if valid {
            AuthOutcome::Success
        } else {
            AuthOutcome::Unknown
        },
    );

    Ok(Json(ValidateTokenResponse { valid }))
}
