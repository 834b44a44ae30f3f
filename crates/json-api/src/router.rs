//! App Router

use salvo::Router;

use crate::{auth, healthcheck, identities, observability, sessions};

/// Public session routes plus the identity routes behind bearer authentication.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(Router::with_path("validate-token").post(sessions::validate::handler))
        .push(
            Router::with_path("users")
                .push(Router::with_path("login").post(sessions::login::handler))
                .push(Router::with_path("logout").post(sessions::logout::handler)),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(Router::with_path("users/me").get(identities::me::handler))
                .push(
                    Router::with_path("admin/users")
                        .get(identities::index::handler)
                        .push(
                            Router::with_path("{id}")
                                .get(identities::get::handler)
                                .put(identities::update::handler)
                                .delete(identities::delete::handler)
                                .push(
                                    Router::with_path("deactivate")
                                        .post(identities::deactivate::handler),
                                ),
                        ),
                ),
        )
}
