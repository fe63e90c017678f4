// Core traits for pluggable backends
//
// These traits keep the session boundary independent of where identities and
// records come from:
// - An HTTP identity provider in production, stubs in tests
// - An in-memory store for dev mode and tests, a database elsewhere

use async_trait::async_trait;
use uuid::Uuid;

use crate::account::Account;
use crate::api_key::ApiKey;
use crate::error::Result;
use crate::membership::Membership;
use crate::product::Product;
use crate::session::IdentitySession;

// ============================================================================
// IdentityGateway - Exchanges request credentials for a provider session
// ============================================================================

/// Client for the external identity provider.
///
/// Implementations must:
/// - Return `Ok(None)` when the provider says there is no session
/// - Return `Err(AuthError::ProviderUnavailable)` on transport failures,
///   timeouts and unexpected responses
/// - Never retry and never cache
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Look up the session behind the inbound `Cookie` header value.
    async fn whoami(&self, cookie: &str) -> Result<Option<IdentitySession>>;
}

// ============================================================================
// ResourceStore - Read-only access to accounts, products, memberships, keys
// ============================================================================

/// Read-only record lookups used while resolving sessions and serving routes.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Get an account by id
    async fn get_account(&self, account_id: &str) -> Result<Option<Account>>;

    /// Get the account linked to a provider identity
    async fn get_account_by_identity(&self, identity_id: &str) -> Result<Option<Account>>;

    /// List every product, newest first
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// List the products owned by an account, newest first
    async fn list_account_products(&self, account_id: &str) -> Result<Vec<Product>> {
        let products = self.list_products().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.account_id == account_id)
            .collect())
    }

    /// List featured products, newest first
    async fn list_featured_products(&self) -> Result<Vec<Product>> {
        let products = self.list_products().await?;
        Ok(products.into_iter().filter(Product::is_featured).collect())
    }

    /// Get a product by owner and id
    async fn get_product(&self, account_id: &str, product_id: &str) -> Result<Option<Product>>;

    /// List the memberships held by an account, in any state
    async fn list_memberships(&self, account_id: &str) -> Result<Vec<Membership>>;

    /// List the memberships granted on an organization, in any state
    async fn list_organization_memberships(&self, account_id: &str) -> Result<Vec<Membership>>;

    /// List the memberships scoped to one product of an organization
    async fn list_product_memberships(
        &self,
        account_id: &str,
        product_id: &str,
    ) -> Result<Vec<Membership>> {
        let memberships = self.list_organization_memberships(account_id).await?;
        Ok(memberships
            .into_iter()
            .filter(|m| m.repository_id.as_deref() == Some(product_id))
            .collect())
    }

    /// Get a membership by id
    async fn get_membership(&self, membership_id: Uuid) -> Result<Option<Membership>>;

    /// Get an API key by access key id
    async fn get_api_key(&self, access_key_id: &str) -> Result<Option<ApiKey>>;

    /// List the API keys acting as an account
    async fn list_api_keys(&self, account_id: &str) -> Result<Vec<ApiKey>>;

    /// List the API keys scoped to one product
    async fn list_product_api_keys(
        &self,
        account_id: &str,
        product_id: &str,
    ) -> Result<Vec<ApiKey>> {
        let keys = self.list_api_keys(account_id).await?;
        Ok(keys
            .into_iter()
            .filter(|k| k.repository_id.as_deref() == Some(product_id))
            .collect())
    }
}
