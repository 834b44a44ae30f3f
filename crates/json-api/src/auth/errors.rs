//! Credential error mapping.

use salvo::http::StatusError;
use tracing::error;
use turnstile_app::auth::AuthServiceError;

use crate::observability::{AuthOutcome, observe_auth};

/// Brief shared by every token rejection so probing cannot tell them apart.
pub(crate) const TOKEN_REJECTED: &str = "invalid or expired token";

/// Record the outcome of `operation` and map its failure to an HTTP error.
pub(crate) fn into_status_error(operation: &'static str, error: AuthServiceError) -> StatusError {
    observe_auth(operation, AuthOutcome::from(&error));

    match error {
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("invalid credentials")
        }
        AuthServiceError::AccountInactive => StatusError::forbidden().brief("account is inactive"),
        AuthServiceError::MalformedCredential
        | AuthServiceError::UnknownToken
        | AuthServiceError::ExpiredToken => StatusError::unauthorized().brief(TOKEN_REJECTED),
        AuthServiceError::Store(source) => {
            error!(operation, "credential store unavailable: {source}");

            StatusError::service_unavailable().brief("service temporarily unavailable")
        }
        AuthServiceError::Hasher(source) => {
            error!(operation, "password hasher failed: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::TokenGeneration(source) => {
            error!(operation, "token generation failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
