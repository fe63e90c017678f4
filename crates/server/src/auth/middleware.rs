// Session extractors
// Decision: Handlers pick the extractor matching their needs; the session is resolved
//           at most once per request
// Decision: Provider and store failures reject with a 500, never with a 401

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use sourcecoop_core::UserSession;
use std::sync::Arc;

use super::config::AuthConfig;
use super::resolver::SessionResolver;
use crate::api::ApiError;

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub resolver: Arc<SessionResolver>,
}

impl AuthState {
    pub fn new(config: AuthConfig, resolver: SessionResolver) -> Self {
        Self {
            config,
            resolver: Arc::new(resolver),
        }
    }
}

/// Session if there is one. Never rejects for a missing session.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<UserSession>);

impl MaybeSession {
    pub fn as_ref(&self) -> Option<&UserSession> {
        self.0.as_ref()
    }
}

/// Required session. Rejects with 401 when there is none.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub UserSession);

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<MaybeSession>() {
            return Ok(cached.clone());
        }

        let auth_state = AuthState::from_ref(state);
        let session = auth_state.resolver.resolve(&parts.headers).await?;

        let resolved = MaybeSession(session);
        parts.extensions.insert(resolved.clone());
        Ok(resolved)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeSession(session) = MaybeSession::from_request_parts(parts, state).await?;
        session.map(CurrentSession).ok_or(ApiError::Unauthenticated)
    }
}
