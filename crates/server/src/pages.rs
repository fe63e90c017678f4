// Redirect-only page routes
// Decision: Pages never render content; every outcome is a 307 redirect or a 404
// Decision: Destinations come from sourcecoop_core::navigation

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;
use sourcecoop_core::{navigation, Destination};

use crate::api::{ApiError, ApiPath, ApiState};
use crate::auth::MaybeSession;

/// Create page routes. These are mounted outside the API prefix.
pub fn routes(state: ApiState) -> Router {
    Router::new()
        .route("/settings", get(settings))
        .route("/email-verified", get(email_verified))
        .route("/edit/account/:account_id", get(edit_account))
        .route("/edit/product/:account_id/:product_id", get(edit_product))
        .with_state(state)
}

async fn settings(State(state): State<ApiState>, session: MaybeSession) -> Response {
    respond(&state, navigation::settings(session.as_ref()))
}

async fn email_verified(State(state): State<ApiState>, session: MaybeSession) -> Response {
    let destination =
        navigation::email_verified(session.as_ref(), &state.auth.config.provider_frontend_url);
    respond(&state, destination)
}

async fn edit_account(
    State(state): State<ApiState>,
    session: MaybeSession,
    WithRejection(Path(account_id), _): ApiPath<String>,
) -> Result<Response, ApiError> {
    let account = state.store.get_account(&account_id).await?;
    Ok(respond(
        &state,
        navigation::edit_account(session.as_ref(), account.as_ref()),
    ))
}

async fn edit_product(
    State(state): State<ApiState>,
    session: MaybeSession,
    WithRejection(Path((account_id, product_id)), _): ApiPath<(String, String)>,
) -> Result<Response, ApiError> {
    let product = state.store.get_product(&account_id, &product_id).await?;
    Ok(respond(
        &state,
        navigation::edit_product(session.as_ref(), product.as_ref()),
    ))
}

fn respond(state: &ApiState, destination: Destination) -> Response {
    tracing::debug!(destination = ?destination, "Resolved page destination");
    match destination {
        Destination::Login => Redirect::temporary(&state.auth.config.login_path).into_response(),
        Destination::Redirect(url) => Redirect::temporary(&url).into_response(),
        Destination::NotFound => ApiError::not_found("Not found").into_response(),
    }
}
