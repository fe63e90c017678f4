// Account, membership and API key read routes
// Decision: Denied actions answer 401 without a session and 403 with one
// Decision: Profiles the caller may not read answer 404, same as missing accounts
// Decision: Listings return only the entries the caller may get individually
// Decision: Memberships the caller may not get answer 404, same as missing ones

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use sourcecoop_core::ids::{is_reserved_id, is_valid_id, MIN_ID_LEN};
use sourcecoop_core::{
    is_authorized, Account, AccountFlag, Action, ApiKey, Membership, UserSession,
};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::ErrorResponse;
use super::{ApiError, ApiJson, ApiPath, ApiState};
use crate::auth::{CurrentSession, MaybeSession};

/// Create account routes
pub fn routes(state: ApiState) -> Router {
    Router::new()
        .route("/v1/accounts/:account_id", get(get_account))
        .route("/v1/accounts/:account_id/flags", get(get_account_flags))
        .route("/v1/accounts/:account_id/members", get(list_members))
        .route("/v1/accounts/:account_id/api-keys", get(list_api_keys))
        .route("/v1/api-keys/:access_key_id", get(get_api_key))
        .route("/v1/memberships/:membership_id", get(get_membership))
        .route("/accounts/check-id", put(check_id))
        .with_state(state)
}

/// Request to check whether an account id can be claimed
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CheckIdRequest {
    #[schema(example = "radiant-earth")]
    pub id: Option<String>,
}

/// Availability of an account id
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckIdResponse {
    pub available: bool,
}

/// GET /v1/accounts/{account_id} - Get an account profile
#[utoipa::path(
    get,
    path = "/v1/accounts/{account_id}",
    params(("account_id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account", body = Account),
        (status = 404, description = "Account not found", body = ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn get_account(
    State(state): State<ApiState>,
    session: MaybeSession,
    WithRejection(Path(account_id), _): ApiPath<String>,
) -> Result<Json<Account>, ApiError> {
    let account = find_account(&state, &account_id).await?;
    if !is_authorized(session.as_ref(), &account, Action::GetAccountProfile) {
        return Err(account_not_found(&account_id));
    }
    Ok(Json(account))
}

/// GET /v1/accounts/{account_id}/flags - Get account flags
#[utoipa::path(
    get,
    path = "/v1/accounts/{account_id}/flags",
    params(("account_id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account flags", body = Vec<AccountFlag>),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Not allowed to read flags", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn get_account_flags(
    State(state): State<ApiState>,
    CurrentSession(session): CurrentSession,
    WithRejection(Path(account_id), _): ApiPath<String>,
) -> Result<Json<Vec<AccountFlag>>, ApiError> {
    let account = find_account(&state, &account_id).await?;
    if !is_authorized(Some(&session), &account, Action::GetAccountFlags) {
        return Err(ApiError::Forbidden);
    }
    Ok(Json(account.flags))
}

/// GET /v1/accounts/{account_id}/members - Memberships granted on an account
#[utoipa::path(
    get,
    path = "/v1/accounts/{account_id}/members",
    params(("account_id" = String, Path, description = "Organization account id")),
    responses(
        (status = 200, description = "Memberships", body = Vec<Membership>),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Not allowed to list memberships", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn list_members(
    State(state): State<ApiState>,
    session: MaybeSession,
    WithRejection(Path(account_id), _): ApiPath<String>,
) -> Result<Json<Vec<Membership>>, ApiError> {
    let account = find_account(&state, &account_id).await?;
    if !is_authorized(session.as_ref(), &account, Action::ListAccountMemberships) {
        return Err(denied(session.as_ref()));
    }

    let memberships = state
        .store
        .list_organization_memberships(&account_id)
        .await?
        .into_iter()
        .filter(|m| is_authorized(session.as_ref(), m, Action::GetMembership))
        .collect();
    Ok(Json(memberships))
}

/// GET /v1/accounts/{account_id}/api-keys - API keys acting as an account
///
/// Secrets are never included.
#[utoipa::path(
    get,
    path = "/v1/accounts/{account_id}/api-keys",
    params(("account_id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "API keys", body = Vec<ApiKey>),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Not allowed to list API keys", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn list_api_keys(
    State(state): State<ApiState>,
    CurrentSession(session): CurrentSession,
    WithRejection(Path(account_id), _): ApiPath<String>,
) -> Result<Json<Vec<ApiKey>>, ApiError> {
    let account = find_account(&state, &account_id).await?;
    if !is_authorized(Some(&session), &account, Action::ListAccountApiKeys) {
        return Err(ApiError::Forbidden);
    }

    let keys = state
        .store
        .list_api_keys(&account_id)
        .await?
        .into_iter()
        .filter(|k| is_authorized(Some(&session), k, Action::GetApiKey))
        .collect();
    Ok(Json(keys))
}

/// GET /v1/api-keys/{access_key_id} - Get an API key
#[utoipa::path(
    get,
    path = "/v1/api-keys/{access_key_id}",
    params(("access_key_id" = String, Path, description = "Access key id")),
    responses(
        (status = 200, description = "API key", body = ApiKey),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Not allowed to get the key", body = ErrorResponse),
        (status = 404, description = "API key not found", body = ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn get_api_key(
    State(state): State<ApiState>,
    CurrentSession(session): CurrentSession,
    WithRejection(Path(access_key_id), _): ApiPath<String>,
) -> Result<Json<ApiKey>, ApiError> {
    let key = state
        .store
        .get_api_key(&access_key_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("API key {} not found", access_key_id)))?;

    if !is_authorized(Some(&session), &key, Action::GetApiKey) {
        return Err(ApiError::Forbidden);
    }
    Ok(Json(key))
}

/// GET /v1/memberships/{membership_id} - Get a membership
#[utoipa::path(
    get,
    path = "/v1/memberships/{membership_id}",
    params(("membership_id" = Uuid, Path, description = "Membership id")),
    responses(
        (status = 200, description = "Membership", body = Membership),
        (status = 400, description = "Malformed membership id", body = ErrorResponse),
        (status = 404, description = "Membership not found", body = ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn get_membership(
    State(state): State<ApiState>,
    session: MaybeSession,
    WithRejection(Path(membership_id), _): ApiPath<Uuid>,
) -> Result<Json<Membership>, ApiError> {
    let not_found = || ApiError::not_found(format!("Membership {} not found", membership_id));
    let membership = state
        .store
        .get_membership(membership_id)
        .await?
        .ok_or_else(not_found)?;

    if !is_authorized(session.as_ref(), &membership, Action::GetMembership) {
        return Err(not_found());
    }
    Ok(Json(membership))
}

/// PUT /accounts/check-id - Check whether an account id is available
#[utoipa::path(
    put,
    path = "/accounts/check-id",
    request_body = CheckIdRequest,
    responses(
        (status = 200, description = "Availability", body = CheckIdResponse),
        (status = 400, description = "Missing, reserved or malformed id", body = ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn check_id(
    State(state): State<ApiState>,
    WithRejection(Json(request), _): ApiJson<CheckIdRequest>,
) -> Result<Json<CheckIdResponse>, ApiError> {
    let id = request
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Account id is required".to_string()))?;

    if id.len() < MIN_ID_LEN {
        return Err(ApiError::BadRequest(format!(
            "Account id must be at least {} characters",
            MIN_ID_LEN
        )));
    }
    if is_reserved_id(id) {
        return Err(ApiError::BadRequest(
            "This account id is reserved and cannot be used".to_string(),
        ));
    }
    if !is_valid_id(id) {
        return Err(ApiError::BadRequest("Invalid account id format".to_string()));
    }

    let available = state.store.get_account(id).await?.is_none();
    tracing::debug!(account_id = %id, available, "Checked account id");
    Ok(Json(CheckIdResponse { available }))
}

async fn find_account(state: &ApiState, account_id: &str) -> Result<Account, ApiError> {
    state
        .store
        .get_account(account_id)
        .await?
        .ok_or_else(|| account_not_found(account_id))
}

fn account_not_found(account_id: &str) -> ApiError {
    ApiError::not_found(format!("Account {} not found", account_id))
}

fn denied(session: Option<&UserSession>) -> ApiError {
    match session {
        Some(_) => ApiError::Forbidden,
        None => ApiError::Unauthenticated,
    }
}
