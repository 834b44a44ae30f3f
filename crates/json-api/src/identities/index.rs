//! List Identities Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    identities::{IdentityResponse, errors::into_status_error},
    state::State,
};

/// List Identities Handler
///
/// All identities ordered by last name.
#[endpoint(
    tags("identities"),
    summary = "List Identities",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Identities"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Store unavailable"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<IdentityResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let identities = state
        .app
        .identities
        .list_identities()
        .await
        .map_err(into_status_error)?;

    Ok(Json(
        identities
            .into_iter()
            .map(IdentityResponse::from)
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;
    use turnstile_app::{auth::MockAuthService, identities::MockIdentitiesService};

    use crate::test_helpers::{admin_service, make_identity};

    use super::*;

    #[tokio::test]
    async fn lists_identities_in_service_order() -> TestResult {
        let mut identities = MockIdentitiesService::new();

        identities
            .expect_list_identities()
            .once()
            .return_once(|| Ok(vec![make_identity(2, "b@x.com"), make_identity(1, "a@x.com")]));

        let service = admin_service(
            MockAuthService::new(),
            identities,
            Router::with_path("admin/users").get(handler),
        );

        let mut res = TestClient::get("http://example.com/admin/users")
            .send(&service)
            .await;

        let body: Vec<IdentityResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body.iter().map(|identity| identity.id).collect::<Vec<_>>(),
            [2, 1]
        );

        Ok(())
    }
}
