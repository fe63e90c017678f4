// Session resolution
// Decision: API key in the Authorization header is tried first, then the provider cookie
// Decision: Sessions are built per request and never cached
// Decision: Disabled or organization accounts never attach to a session

use axum::http::{header, HeaderMap};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use sourcecoop_core::api_key::is_valid_access_key_id;
use sourcecoop_core::{
    is_authorized, Account, Action, AuthError, IdentityGateway, IdentitySession, Membership,
    ResourceStore, UserSession,
};
use std::sync::Arc;

use super::config::{AuthConfig, ProviderFailurePolicy};

/// Resolves the caller behind a request
pub struct SessionResolver {
    gateway: Arc<dyn IdentityGateway>,
    store: Arc<dyn ResourceStore>,
    failure_policy: ProviderFailurePolicy,
}

impl SessionResolver {
    pub fn new(
        gateway: Arc<dyn IdentityGateway>,
        store: Arc<dyn ResourceStore>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            gateway,
            store,
            failure_policy: config.failure_policy,
        }
    }

    /// Resolve the session for the given request headers.
    ///
    /// `Ok(None)` means there is no session. Errors are reserved for provider
    /// and store failures.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Option<UserSession>, AuthError> {
        if let Some((access_key_id, secret)) = api_key_credentials(headers) {
            if let Some(session) = self.resolve_api_key(access_key_id, secret).await? {
                return Ok(Some(session));
            }
        }

        match self.resolve_cookie(headers).await {
            Err(e)
                if e.is_provider_error()
                    && self.failure_policy == ProviderFailurePolicy::Anonymous =>
            {
                tracing::warn!(
                    error = %e,
                    "Identity provider unavailable, continuing without session"
                );
                Ok(None)
            }
            result => result,
        }
    }

    async fn resolve_api_key(
        &self,
        access_key_id: &str,
        secret: &str,
    ) -> Result<Option<UserSession>, AuthError> {
        let Some(key) = self.store.get_api_key(access_key_id).await? else {
            tracing::debug!(access_key_id, "Unknown API key");
            return Ok(None);
        };
        if !key.accepts(secret, Utc::now()) {
            tracing::debug!(access_key_id, "API key rejected");
            return Ok(None);
        }

        let Some(account) = self.store.get_account(&key.account_id).await? else {
            return Ok(None);
        };
        if account.disabled || !account.is_individual() {
            tracing::debug!(account_id = %account.account_id, "API key account cannot act");
            return Ok(None);
        }

        let memberships = self.visible_memberships(&account).await?;
        tracing::debug!(account_id = %account.account_id, "Resolved API key session");
        Ok(Some(UserSession::for_account(None, account, memberships)))
    }

    async fn resolve_cookie(&self, headers: &HeaderMap) -> Result<Option<UserSession>, AuthError> {
        // No cookies at all: nothing for the provider to look at
        if CookieJar::from_headers(headers).iter().next().is_none() {
            return Ok(None);
        }
        let Some(cookie) = forwarded_cookie(headers) else {
            return Ok(None);
        };

        let Some(identity) = self.gateway.whoami(&cookie).await? else {
            return Ok(None);
        };
        if !identity.is_usable(Utc::now()) {
            tracing::debug!(
                identity_id = %identity.subject(),
                "Provider session inactive or expired"
            );
            return Ok(None);
        }

        let identity_id = identity.subject().to_string();
        let account = match self.linked_account(&identity).await? {
            Some(account) if !account.disabled && account.is_individual() => account,
            _ => {
                return Ok(Some(
                    UserSession::for_identity(identity_id).with_identity(identity),
                ))
            }
        };

        let memberships = self.visible_memberships(&account).await?;
        Ok(Some(
            UserSession::for_account(Some(identity_id), account, memberships)
                .with_identity(identity),
        ))
    }

    /// Account linked to a provider identity: by identity id, falling back to
    /// the account id recorded on the identity for accounts with no link yet.
    async fn linked_account(
        &self,
        identity: &IdentitySession,
    ) -> Result<Option<Account>, AuthError> {
        if let Some(account) = self.store.get_account_by_identity(identity.subject()).await? {
            return Ok(Some(account));
        }
        let Some(account_id) = identity.linked_account_id() else {
            return Ok(None);
        };
        Ok(self
            .store
            .get_account(account_id)
            .await?
            .filter(|account| account.identity_id.is_none()))
    }

    async fn visible_memberships(&self, account: &Account) -> Result<Vec<Membership>, AuthError> {
        let viewer = UserSession::for_account(None, account.clone(), Vec::new());
        let memberships = self.store.list_memberships(&account.account_id).await?;
        Ok(memberships
            .into_iter()
            .filter(|m| is_authorized(Some(&viewer), m, Action::GetMembership))
            .collect())
    }
}

/// Every Cookie header line joined into one value, as the provider expects.
///
/// HTTP/2 clients may split cookies across several header lines.
fn forwarded_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies: Vec<&str> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect();
    if cookies.is_empty() {
        return None;
    }
    Some(cookies.join("; "))
}

/// `Authorization: <access_key_id> <secret_access_key>`
fn api_key_credentials(headers: &HeaderMap) -> Option<(&str, &str)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (access_key_id, secret) = value.trim().split_once(' ')?;
    let secret = secret.trim();
    if secret.is_empty() || !is_valid_access_key_id(access_key_id) {
        return None;
    }
    Some((access_key_id, secret))
}
