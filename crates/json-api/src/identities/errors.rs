//! Identity Errors

use salvo::http::StatusError;
use tracing::error;
use turnstile_app::identities::IdentitiesServiceError;

pub(crate) fn into_status_error(error: IdentitiesServiceError) -> StatusError {
    match error {
        IdentitiesServiceError::NotFound => StatusError::not_found().brief("identity not found"),
        IdentitiesServiceError::AlreadyExists => {
            StatusError::conflict().brief("email is already in use")
        }
        IdentitiesServiceError::InvalidData(reason) => StatusError::bad_request().brief(reason),
        IdentitiesServiceError::Hasher(source) => {
            error!("password hashing failed: {source}");

            StatusError::internal_server_error()
        }
        IdentitiesServiceError::Store(source) => {
            error!("identity store call failed: {source}");

            StatusError::service_unavailable()
        }
    }
}

/// The caller may not deactivate or delete the identity it authenticated as.
pub(crate) fn refuse_self(actor_id: i64, target_id: i64) -> Result<(), StatusError> {
    if actor_id == target_id {
        return Err(StatusError::conflict().brief("cannot modify the authenticated identity"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use salvo::http::StatusCode;
    use turnstile_app::auth::StoreError;

    use super::*;

    #[test]
    fn maps_service_errors_to_statuses() {
        let cases = [
            (IdentitiesServiceError::NotFound, StatusCode::NOT_FOUND),
            (IdentitiesServiceError::AlreadyExists, StatusCode::CONFLICT),
            (
                IdentitiesServiceError::InvalidData("email is required"),
                StatusCode::BAD_REQUEST,
            ),
            (
                IdentitiesServiceError::Store(StoreError::Timeout(Duration::from_secs(3))),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(into_status_error(error).code, expected);
        }
    }

    #[test]
    fn self_modification_is_refused() {
        assert!(refuse_self(4, 4).is_err());
        assert!(refuse_self(4, 5).is_ok());
    }
}
