//! Update Identity Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use turnstile_app::identities::{data::IdentityUpdate, records::IdentityId};

use crate::{
    extensions::*,
    identities::{
        IdentityResponse,
        errors::{into_status_error, refuse_self},
    },
    state::State,
};

/// Update Identity Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateIdentityRequest {
    pub email: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    /// `false` revokes every token of the identity; `true` lets it log in again
    pub active: bool,
}

impl From<UpdateIdentityRequest> for IdentityUpdate {
    fn from(request: UpdateIdentityRequest) -> Self {
        IdentityUpdate {
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            active: request.active,
        }
    }
}

/// Update Identity Handler
///
/// Overwrites email, names and the active flag. This is how a deactivated identity is
/// reactivated. The caller may edit its own profile but cannot clear its own active flag.
#[endpoint(
    tags("identities"),
    summary = "Update Identity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Identity updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid identity payload"),
        (status_code = StatusCode::NOT_FOUND, description = "Identity not found"),
        (status_code = StatusCode::CONFLICT, description = "Email taken or self-deactivation"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
    ),
)]
#[tracing::instrument(
    name = "identities.update",
    skip(id, json, depot),
    fields(identity_id = tracing::field::Empty, active = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    json: JsonBody<UpdateIdentityRequest>,
    depot: &mut Depot,
) -> Result<Json<IdentityResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;
    let id = id.into_inner();
    let request = json.into_inner();

    if !request.active {
        refuse_self(actor.id.into_i64(), id)?;
    }

    let span = tracing::Span::current();

    span.record("identity_id", id);
    span.record("active", request.active);

    let identity = state
        .app
        .identities
        .update_identity(IdentityId::from_i64(id), request.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(identity.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;
    use turnstile_app::{
        auth::MockAuthService,
        identities::{IdentitiesServiceError, MockIdentitiesService},
    };

    use crate::test_helpers::{admin_service, make_identity};

    use super::*;

    fn make_service(identities: MockIdentitiesService) -> Service {
        admin_service(
            MockAuthService::new(),
            identities,
            Router::with_path("admin/users/{id}").put(handler),
        )
    }

    #[tokio::test]
    async fn reactivates_the_identity() -> TestResult {
        let mut identities = MockIdentitiesService::new();

        identities
            .expect_update_identity()
            .once()
            .withf(|id, update| {
                *id == IdentityId::from_i64(7) && update.active && update.email == "g@x.com"
            })
            .return_once(|_, _| Ok(make_identity(7, "g@x.com")));

        let mut res = TestClient::put("http://example.com/admin/users/7")
            .json(&json!({
                "email": "g@x.com",
                "first_name": "Grace",
                "last_name": "Hopper",
                "active": true,
            }))
            .send(&make_service(identities))
            .await;

        let body: IdentityResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.id, 7);
        assert!(body.active);

        Ok(())
    }

    #[tokio::test]
    async fn taken_email_returns_409() -> TestResult {
        let mut identities = MockIdentitiesService::new();

        identities
            .expect_update_identity()
            .once()
            .return_once(|_, _| Err(IdentitiesServiceError::AlreadyExists));

        let res = TestClient::put("http://example.com/admin/users/7")
            .json(&json!({ "email": "taken@x.com", "active": true }))
            .send(&make_service(identities))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn clearing_your_own_active_flag_is_refused() -> TestResult {
        let mut identities = MockIdentitiesService::new();

        identities.expect_update_identity().never();

        let res = TestClient::put("http://example.com/admin/users/1")
            .json(&json!({ "email": "a@x.com", "active": false }))
            .send(&make_service(identities))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn editing_your_own_profile_is_allowed() -> TestResult {
        let mut identities = MockIdentitiesService::new();

        identities
            .expect_update_identity()
            .once()
            .withf(|id, update| *id == IdentityId::from_i64(1) && update.last_name == "Byron")
            .return_once(|_, _| Ok(make_identity(1, "a@x.com")));

        let res = TestClient::put("http://example.com/admin/users/1")
            .json(&json!({ "email": "a@x.com", "last_name": "Byron", "active": true }))
            .send(&make_service(identities))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn missing_active_flag_is_rejected() -> TestResult {
        let mut identities = MockIdentitiesService::new();

        identities.expect_update_identity().never();

        let res = TestClient::put("http://example.com/admin/users/7")
            .json(&json!({ "email": "g@x.com" }))
            .send(&make_service(identities))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
