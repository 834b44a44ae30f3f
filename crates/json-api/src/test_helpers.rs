//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use turnstile_app::{
    auth::MockAuthService,
    context::AppContext,
    identities::{
        MockIdentitiesService,
        records::{Identity, IdentityId},
    },
};

use crate::{extensions::*, state::State};

/// A header value with the shape of a real bearer credential.
pub(crate) const TEST_BEARER: &str = "Bearer ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub(crate) fn make_identity(id: i64, email: &str) -> Identity {
    Identity {
        id: IdentityId::from_i64(id),
        email: email.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        active: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// Mark the request as authenticated as identity 1 without consulting the auth service.
#[salvo::handler]
pub(crate) async fn inject_identity(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(make_identity(1, "a@x.com"));
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn state_with(auth: MockAuthService, identities: MockIdentitiesService) -> Arc<State> {
    State::from_app_context(AppContext {
        auth: Arc::new(auth),
        identities: Arc::new(identities),
    })
}

/// State whose identities service fails the test on any call.
pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state_with(auth, MockIdentitiesService::new())
}

/// Service for a public route.
pub(crate) fn public_service(auth: MockAuthService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_auth(auth)))
            .push(route),
    )
}

/// Service for a route behind authentication, already authenticated as identity 1.
pub(crate) fn authenticated_service(auth: MockAuthService, route: Router) -> Service {
    admin_service(auth, MockIdentitiesService::new(), route)
}

/// Authenticated service whose handlers reach the identities service.
pub(crate) fn admin_service(
    auth: MockAuthService,
    identities: MockIdentitiesService,
    route: Router,
) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(auth, identities)))
            .hoop(inject_identity)
            .push(route),
    )
}
