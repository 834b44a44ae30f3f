//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::debug;

use crate::{
    auth::{TOKEN_REJECTED, into_status_error},
    extensions::*,
    observability::{AuthOutcome, observe_auth},
    state::State,
};

/// Resolve the `Authorization` header to an active identity and store it in the depot.
///
/// Header parsing belongs to the credential core; this only insists the header is present
/// and readable.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(authorization) = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
    else {
        debug!("request without a readable authorization header");
        observe_auth("authenticate", AuthOutcome::Malformed);

        res.render(StatusError::unauthorized().brief(TOKEN_REJECTED));
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    match state.app.auth.authenticate(&authorization).await {
        Ok(identity) => {
            observe_auth("authenticate", AuthOutcome::Success);
            depot.insert_identity(identity);
        }
        Err(error) => {
            res.render(into_status_error("authenticate", error));
            ctrl.skip_rest();

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}
