// Product (repository) read routes
// Decision: Listing filters by repository:list per product; hidden products never count
// Decision: Products the caller may not get answer 404, same as missing ones
// Decision: Cursor is "<account_id>/<product_id>" of the last item on the previous page
// Decision: Product API keys and members need a session: 401 without, 403 when denied

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use sourcecoop_core::{is_authorized, Action, ApiKey, Membership, Product};
use utoipa::{IntoParams, ToSchema};

use super::common::ErrorResponse;
use super::{ApiError, ApiPath, ApiQuery, ApiState};
use crate::auth::{CurrentSession, MaybeSession};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Create product routes
pub fn routes(state: ApiState) -> Router {
    Router::new()
        .route("/repositories/featured", get(list_featured))
        .route("/v1/products", get(list_products))
        .route("/v1/products/:account_id", get(list_account_products))
        .route("/v1/products/:account_id/:product_id", get(get_product))
        .route(
            "/v1/products/:account_id/:product_id/permissions",
            get(get_permissions),
        )
        .route(
            "/v1/products/:account_id/:product_id/api-keys",
            get(list_product_api_keys),
        )
        .route(
            "/v1/products/:account_id/:product_id/members",
            get(list_product_members),
        )
        .with_state(state)
}

/// Query parameters for product listings
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// Case-insensitive match on title, description and ids
    pub search: Option<String>,
    /// Comma-separated tags; a product matches when it has any of them
    pub tags: Option<String>,
    /// Cursor returned by the previous page
    pub next: Option<String>,
    /// Page size (default 10, max 100)
    pub limit: Option<usize>,
}

/// One page of products
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductList {
    pub products: Vec<Product>,
    /// Matching products across all pages
    pub count: usize,
    /// Cursor for the next page, absent on the last page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Access the caller has to a product's data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DataPermission {
    Read,
    Write,
}

/// GET /repositories/featured - Featured products visible to the caller
#[utoipa::path(
    get,
    path = "/repositories/featured",
    responses(
        (status = 200, description = "Featured products", body = Vec<Product>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn list_featured(
    State(state): State<ApiState>,
    session: MaybeSession,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.store.list_featured_products().await?;
    let visible = products
        .into_iter()
        .filter(|p| p.is_featured())
        .filter(|p| is_authorized(session.as_ref(), p, Action::ListRepository))
        .collect();
    Ok(Json(visible))
}

/// GET /v1/products - Search products visible to the caller
#[utoipa::path(
    get,
    path = "/v1/products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Page of products", body = ProductList),
        (status = 400, description = "Invalid cursor or query", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<ApiState>,
    session: MaybeSession,
    WithRejection(Query(query), _): ApiQuery<ListProductsQuery>,
) -> Result<Json<ProductList>, ApiError> {
    let products = state.store.list_products().await?;
    let visible = filter_products(products, &session, &query);
    Ok(Json(paginate(visible, &query)?))
}

/// GET /v1/products/{account_id} - Products of one account visible to the caller
#[utoipa::path(
    get,
    path = "/v1/products/{account_id}",
    params(
        ("account_id" = String, Path, description = "Owning account"),
        ListProductsQuery,
    ),
    responses(
        (status = 200, description = "Page of products", body = ProductList),
        (status = 400, description = "Invalid cursor or query", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn list_account_products(
    State(state): State<ApiState>,
    session: MaybeSession,
    WithRejection(Path(account_id), _): ApiPath<String>,
    WithRejection(Query(query), _): ApiQuery<ListProductsQuery>,
) -> Result<Json<ProductList>, ApiError> {
    if state.store.get_account(&account_id).await?.is_none() {
        return Err(ApiError::not_found(format!(
            "Account {} not found",
            account_id
        )));
    }

    let products = state.store.list_account_products(&account_id).await?;
    let visible = filter_products(products, &session, &query);
    Ok(Json(paginate(visible, &query)?))
}

/// GET /v1/products/{account_id}/{product_id} - Get a product
#[utoipa::path(
    get,
    path = "/v1/products/{account_id}/{product_id}",
    params(
        ("account_id" = String, Path, description = "Owning account"),
        ("product_id" = String, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<ApiState>,
    session: MaybeSession,
    WithRejection(Path((account_id, product_id)), _): ApiPath<(String, String)>,
) -> Result<Json<Product>, ApiError> {
    let product = find_product(&state, &account_id, &product_id).await?;
    if !is_authorized(session.as_ref(), &product, Action::GetRepository) {
        return Err(product_not_found(&account_id, &product_id));
    }
    Ok(Json(product))
}

/// GET /v1/products/{account_id}/{product_id}/permissions - Caller's data permissions
#[utoipa::path(
    get,
    path = "/v1/products/{account_id}/{product_id}/permissions",
    params(
        ("account_id" = String, Path, description = "Owning account"),
        ("product_id" = String, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "Granted permissions", body = Vec<DataPermission>),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn get_permissions(
    State(state): State<ApiState>,
    session: MaybeSession,
    WithRejection(Path((account_id, product_id)), _): ApiPath<(String, String)>,
) -> Result<Json<Vec<DataPermission>>, ApiError> {
    let product = find_product(&state, &account_id, &product_id).await?;

    let mut permissions = Vec::new();
    if is_authorized(session.as_ref(), &product, Action::WriteRepositoryData) {
        permissions.push(DataPermission::Write);
    }
    if is_authorized(session.as_ref(), &product, Action::ReadRepositoryData) {
        permissions.push(DataPermission::Read);
    }

    tracing::debug!(
        account_id = %account_id,
        product_id = %product_id,
        has_session = session.0.is_some(),
        permissions = ?permissions,
        "Computed product permissions"
    );
    Ok(Json(permissions))
}

/// GET /v1/products/{account_id}/{product_id}/api-keys - API keys scoped to a product
#[utoipa::path(
    get,
    path = "/v1/products/{account_id}/{product_id}/api-keys",
    params(
        ("account_id" = String, Path, description = "Owning account"),
        ("product_id" = String, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "API keys the caller may see", body = Vec<ApiKey>),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Listing denied", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn list_product_api_keys(
    State(state): State<ApiState>,
    CurrentSession(session): CurrentSession,
    WithRejection(Path((account_id, product_id)), _): ApiPath<(String, String)>,
) -> Result<Json<Vec<ApiKey>>, ApiError> {
    let product = find_product(&state, &account_id, &product_id).await?;
    if !is_authorized(Some(&session), &product, Action::ListRepositoryApiKeys) {
        return Err(ApiError::Forbidden);
    }

    let keys = state
        .store
        .list_product_api_keys(&account_id, &product_id)
        .await?;
    let visible: Vec<ApiKey> = keys
        .into_iter()
        .filter(|k| is_authorized(Some(&session), k, Action::GetApiKey))
        .collect();
    tracing::debug!(
        account_id = %account_id,
        product_id = %product_id,
        count = visible.len(),
        "Listed product API keys"
    );
    Ok(Json(visible))
}

/// GET /v1/products/{account_id}/{product_id}/members - Memberships scoped to a product
#[utoipa::path(
    get,
    path = "/v1/products/{account_id}/{product_id}/members",
    params(
        ("account_id" = String, Path, description = "Owning account"),
        ("product_id" = String, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "Memberships the caller may see", body = Vec<Membership>),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Listing denied", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn list_product_members(
    State(state): State<ApiState>,
    CurrentSession(session): CurrentSession,
    WithRejection(Path((account_id, product_id)), _): ApiPath<(String, String)>,
) -> Result<Json<Vec<Membership>>, ApiError> {
    let product = find_product(&state, &account_id, &product_id).await?;
    if !is_authorized(Some(&session), &product, Action::ListRepositoryMemberships) {
        return Err(ApiError::Forbidden);
    }

    let memberships = state
        .store
        .list_product_memberships(&account_id, &product_id)
        .await?;
    Ok(Json(
        memberships
            .into_iter()
            .filter(|m| is_authorized(Some(&session), m, Action::GetMembership))
            .collect(),
    ))
}

async fn find_product(
    state: &ApiState,
    account_id: &str,
    product_id: &str,
) -> Result<Product, ApiError> {
    state
        .store
        .get_product(account_id, product_id)
        .await?
        .ok_or_else(|| product_not_found(account_id, product_id))
}

fn product_not_found(account_id: &str, product_id: &str) -> ApiError {
    ApiError::not_found(format!("Product {}/{} not found", account_id, product_id))
}

fn product_key(product: &Product) -> String {
    format!("{}/{}", product.account_id, product.product_id)
}

fn filter_products(
    products: Vec<Product>,
    session: &MaybeSession,
    query: &ListProductsQuery,
) -> Vec<Product> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let tags: Vec<String> = query
        .tags
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    products
        .into_iter()
        .filter(|p| is_authorized(session.as_ref(), p, Action::ListRepository))
        .filter(|p| search.map_or(true, |q| p.matches_search(q)))
        .filter(|p| tags.is_empty() || p.has_any_tag(&tags))
        .collect()
}

fn paginate(products: Vec<Product>, query: &ListProductsQuery) -> Result<ProductList, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let count = products.len();

    let start = match query.next.as_deref().filter(|c| !c.is_empty()) {
        None => 0,
        Some(cursor) => products
            .iter()
            .position(|p| product_key(p) == cursor)
            .map(|i| i + 1)
            .ok_or_else(|| ApiError::BadRequest("Invalid pagination cursor".to_string()))?,
    };

    let page: Vec<Product> = products.into_iter().skip(start).take(limit).collect();
    let next = if start + page.len() < count {
        page.last().map(product_key)
    } else {
        None
    };

    Ok(ProductList {
        products: page,
        count,
        next,
    })
}
