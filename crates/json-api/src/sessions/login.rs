//! Login Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use turnstile_app::auth::models::Session;

use crate::{
    auth::into_status_error,
    extensions::*,
    identities::IdentityResponse,
    observability::{AuthOutcome, observe_auth},
    state::State,
};

/// Login Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Login Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginResponse {
    /// Bearer token; shown once
    pub token: String,

    /// When the token stops authenticating
    pub expires_at: String,

    /// The authenticated identity
    pub identity: IdentityResponse,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        LoginResponse {
            token: session.token.token.expose().to_owned(),
            expires_at: session.token.expires_at.to_string(),
            identity: session.identity.into(),
        }
    }
}

/// Login Handler
///
/// Exchanges an email and password for a bearer token. Any earlier token of the
/// identity stops working.
#[endpoint(
    tags("sessions"),
    summary = "Login",
    responses(
        (status_code = StatusCode::OK, description = "Logged in"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid credentials"),
        (status_code = StatusCode::FORBIDDEN, description = "Account is inactive"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Store unavailable"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<LoginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let session = state
        .app
        .auth
        .login(&request.email, &request.password)
        .await
        .map_err(|error| into_status_error("login", error))?;

    observe_auth("login", AuthOutcome::Success);

    Ok(Json(session.into()))
}
