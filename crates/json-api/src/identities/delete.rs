//! Delete Identity Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use turnstile_app::identities::records::IdentityId;

use crate::{
    extensions::*,
    identities::errors::{into_status_error, refuse_self},
    state::State,
};

/// Delete Identity Handler
///
/// Removes the identity and its tokens. The caller cannot delete itself.
#[endpoint(
    tags("identities"),
    summary = "Delete Identity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Identity deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Identity not found"),
        (status_code = StatusCode::CONFLICT, description = "Target is the caller"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;
    let id = id.into_inner();

    refuse_self(actor.id.into_i64(), id)?;

    state
        .app
        .identities
        .delete_identity(IdentityId::from_i64(id))
        .await
        .map_err(into_status_error)?;

    info!(actor_id = %actor.id, identity_id = id, "identity deleted");

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;
    use turnstile_app::{
        auth::MockAuthService,
        identities::{IdentitiesServiceError, MockIdentitiesService},
    };

    use crate::test_helpers::admin_service;

    use super::*;

    fn make_service(identities: MockIdentitiesService) -> Service {
        admin_service(
            MockAuthService::new(),
            identities,
            Router::with_path("admin/users/{id}").delete(handler),
        )
    }

    #[tokio::test]
    async fn deletes_the_identity() -> TestResult {
        let mut identities = MockIdentitiesService::new();

        identities
            .expect_delete_identity()
            .once()
            .withf(|id| *id == IdentityId::from_i64(8))
            .return_once(|_| Ok(()));

        let res = TestClient::delete("http://example.com/admin/users/8")
            .send(&make_service(identities))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn deleting_yourself_is_refused() -> TestResult {
        let mut identities = MockIdentitiesService::new();

        identities.expect_delete_identity().never();

        let res = TestClient::delete("http://example.com/admin/users/1")
            .send(&make_service(identities))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_identity_returns_404() -> TestResult {
        let mut identities = MockIdentitiesService::new();

        identities
            .expect_delete_identity()
            .once()
            .return_once(|_| Err(IdentitiesServiceError::NotFound));

        let res = TestClient::delete("http://example.com/admin/users/404")
            .send(&make_service(identities))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
