//! Deactivate Identity Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use turnstile_app::identities::records::IdentityId;

use crate::{
    auth::into_status_error,
    extensions::*,
    identities::errors::refuse_self,
    observability::{AuthOutcome, observe_auth},
    state::State,
};

/// Deactivation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeactivatedResponse {
    /// Deactivated identity id
    pub id: i64,

    /// Always `false` after deactivation
    pub active: bool,
}

/// Deactivate Identity Handler
///
/// Clears the active flag and revokes every token the identity holds. There are no roles:
/// any authenticated identity may deactivate any other, but never itself.
#[endpoint(
    tags("identities"),
    summary = "Deactivate Identity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Identity deactivated"),
        (status_code = StatusCode::NOT_FOUND, description = "Identity not found"),
        (status_code = StatusCode::CONFLICT, description = "Target is the caller"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Store unavailable"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<DeactivatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;
    let id = id.into_inner();

    refuse_self(actor.id.into_i64(), id)?;

    let existed = state
        .app
        .auth
        .deactivate_and_revoke(IdentityId::from_i64(id))
        .await
        .map_err(|error| into_status_error("deactivate", error))?;

    if !existed {
        return Err(StatusError::not_found().brief("identity not found"));
    }

    observe_auth("deactivate", AuthOutcome::Success);

    info!(actor_id = %actor.id, identity_id = id, "identity deactivated");

    Ok(Json(DeactivatedResponse { id, active: false }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;
    use turnstile_app::auth::MockAuthService;

    use crate::test_helpers::authenticated_service;

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        authenticated_service(
            auth,
            Router::with_path("admin/users/{id}/deactivate").post(handler),
        )
    }

    #[tokio::test]
    async fn deactivates_the_identity() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_deactivate_and_revoke()
            .once()
            .withf(|id| *id == IdentityId::from_i64(7))
            .return_once(|_| Ok(true));

        let mut res = TestClient::post("http://example.com/admin/users/7/deactivate")
            .send(&make_service(auth))
            .await;

        let body: DeactivatedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.id, 7);
        assert!(!body.active);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_identity_returns_404() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_deactivate_and_revoke()
            .once()
            .return_once(|_| Ok(false));

        let res = TestClient::post("http://example.com/admin/users/404/deactivate")
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn deactivating_yourself_is_refused() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_deactivate_and_revoke().never();

        // The test identity is 1.
        let res = TestClient::post("http://example.com/admin/users/1/deactivate")
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn non_numeric_id_is_rejected() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_deactivate_and_revoke().never();

        let res = TestClient::post("http://example.com/admin/users/abc/deactivate")
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
