// HTTP API routes
//
// Each submodule owns one resource family and exposes `routes(state)`.
// Handlers resolve the session through the extractors in `crate::auth`.

pub mod accounts;
pub mod common;
pub mod error;
pub mod products;
pub mod whoami;

use axum::extract::{FromRef, Json, Path, Query};
use axum_extra::extract::WithRejection;
use sourcecoop_core::ResourceStore;
use std::sync::Arc;

use crate::auth::AuthState;

// Re-export common types
pub use common::ErrorResponse;
pub use error::ApiError;

/// Query string extractor whose rejection is an [`ApiError`]
pub type ApiQuery<T> = WithRejection<Query<T>, ApiError>;

/// Path extractor whose rejection is an [`ApiError`]
pub type ApiPath<T> = WithRejection<Path<T>, ApiError>;

/// JSON body extractor whose rejection is an [`ApiError`]
pub type ApiJson<T> = WithRejection<Json<T>, ApiError>;

/// State for routes that read records
#[derive(Clone, FromRef)]
pub struct ApiState {
    pub auth: AuthState,
    pub store: Arc<dyn ResourceStore>,
}

impl ApiState {
    pub fn new(auth: AuthState, store: Arc<dyn ResourceStore>) -> Self {
        Self { auth, store }
    }
}
