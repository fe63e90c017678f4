// Session introspection routes
//
// whoami answers with the resolved session or 401. check-session is the older
// endpoint the web client polls; it keeps its own response shapes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sourcecoop_core::UserSession;
use utoipa::ToSchema;

use super::common::ErrorResponse;
use crate::auth::{AuthState, CurrentSession, MaybeSession};

/// Create session routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .route("/v1/whoami", get(whoami))
        .route("/accounts/check-session", get(check_session))
        .with_state(state)
}

/// Body of a successful check-session call
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckSessionResponse {
    pub success: bool,
    pub session: UserSession,
}

/// Body of a failed check-session call
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckSessionError {
    #[schema(example = "No session found")]
    pub error: String,
}

/// GET /v1/whoami - Current session
///
/// The account is null for identities that have not completed onboarding.
#[utoipa::path(
    get,
    path = "/v1/whoami",
    responses(
        (status = 200, description = "Current session", body = UserSession),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Identity provider failure", body = ErrorResponse),
    ),
    tag = "authentication"
)]
pub async fn whoami(CurrentSession(session): CurrentSession) -> Json<UserSession> {
    Json(session)
}

/// GET /accounts/check-session - Session check used by the web client
#[utoipa::path(
    get,
    path = "/accounts/check-session",
    responses(
        (status = 200, description = "Session present", body = CheckSessionResponse),
        (status = 401, description = "No session", body = CheckSessionError),
    ),
    tag = "authentication"
)]
pub async fn check_session(MaybeSession(session): MaybeSession) -> Response {
    match session {
        Some(session) => Json(CheckSessionResponse {
            success: true,
            session,
        })
        .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(CheckSessionError {
                error: "No session found".to_string(),
            }),
        )
            .into_response(),
    }
}
