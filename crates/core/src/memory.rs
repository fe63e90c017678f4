// In-memory resource store for dev mode and tests
// Decision: Use parking_lot for thread-safe access
// Decision: Seed fixtures are YAML (JSON is accepted, it is valid YAML)
//
// All data is loaded at startup and lost on restart. Lookups clone records out
// of the lock so no guard is held across an await point.

use anyhow::Context;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

use crate::account::Account;
use crate::api_key::ApiKey;
use crate::error::Result;
use crate::ids::is_valid_id;
use crate::membership::Membership;
use crate::product::Product;
use crate::traits::ResourceStore;

/// Fixture file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub memberships: Vec<Membership>,
    #[serde(default)]
    pub api_keys: Vec<ApiKey>,
}

impl SeedData {
    /// Parse fixtures from YAML or JSON text.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("Failed to parse seed data")
    }

    /// Load fixtures from a file.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        Self::parse(&text)
    }
}

/// In-memory store
#[derive(Default)]
pub struct InMemoryStore {
    accounts: RwLock<HashMap<String, Account>>,
    products: RwLock<HashMap<(String, String), Product>>,
    memberships: RwLock<HashMap<Uuid, Membership>>,
    api_keys: RwLock<HashMap<String, ApiKey>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from fixtures.
    pub fn from_seed(seed: SeedData) -> Self {
        let store = Self::new();
        for account in seed.accounts {
            store.insert_account(account);
        }
        for product in seed.products {
            store.insert_product(product);
        }
        for membership in seed.memberships {
            store.insert_membership(membership);
        }
        for key in seed.api_keys {
            store.insert_api_key(key);
        }
        tracing::info!(
            accounts = store.accounts.read().len(),
            products = store.products.read().len(),
            memberships = store.memberships.read().len(),
            api_keys = store.api_keys.read().len(),
            "Loaded seed data"
        );
        store
    }

    pub fn insert_account(&self, account: Account) {
        if !is_valid_id(&account.account_id) {
            tracing::warn!(account_id = %account.account_id, "Seeded account has a malformed id");
        }
        self.accounts
            .write()
            .insert(account.account_id.clone(), account);
    }

    pub fn insert_product(&self, product: Product) {
        if !is_valid_id(&product.product_id) {
            tracing::warn!(
                account_id = %product.account_id,
                product_id = %product.product_id,
                "Seeded product has a malformed id"
            );
        }
        self.products.write().insert(
            (product.account_id.clone(), product.product_id.clone()),
            product,
        );
    }

    pub fn insert_membership(&self, membership: Membership) {
        self.memberships
            .write()
            .insert(membership.membership_id, membership);
    }

    pub fn insert_api_key(&self, key: ApiKey) {
        self.api_keys
            .write()
            .insert(key.access_key_id.clone(), key);
    }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    async fn get_account(&self, account_id: &str) -> Result<Option<Account>> {
        Ok(self.accounts.read().get(account_id).cloned())
    }

    async fn get_account_by_identity(&self, identity_id: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .values()
            .find(|a| a.identity_id.as_deref() == Some(identity_id))
            .cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self.products.read().values().cloned().collect();
        // Newest first, ties broken by id for a stable order
        products.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.account_id.cmp(&b.account_id))
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        Ok(products)
    }

    async fn get_product(&self, account_id: &str, product_id: &str) -> Result<Option<Product>> {
        Ok(self
            .products
            .read()
            .get(&(account_id.to_string(), product_id.to_string()))
            .cloned())
    }

    async fn list_memberships(&self, account_id: &str) -> Result<Vec<Membership>> {
        let mut memberships: Vec<Membership> = self
            .memberships
            .read()
            .values()
            .filter(|m| m.account_id == account_id)
            .cloned()
            .collect();
        memberships.sort_by_key(|m| m.membership_id);
        Ok(memberships)
    }

    async fn list_organization_memberships(&self, account_id: &str) -> Result<Vec<Membership>> {
        let mut memberships: Vec<Membership> = self
            .memberships
            .read()
            .values()
            .filter(|m| m.membership_account_id == account_id)
            .cloned()
            .collect();
        memberships.sort_by_key(|m| m.membership_id);
        Ok(memberships)
    }

    async fn get_membership(&self, membership_id: Uuid) -> Result<Option<Membership>> {
        Ok(self.memberships.read().get(&membership_id).cloned())
    }

    async fn get_api_key(&self, access_key_id: &str) -> Result<Option<ApiKey>> {
        Ok(self.api_keys.read().get(access_key_id).cloned())
    }

    async fn list_api_keys(&self, account_id: &str) -> Result<Vec<ApiKey>> {
        let mut keys: Vec<ApiKey> = self
            .api_keys
            .read()
            .values()
            .filter(|k| k.account_id == account_id)
            .cloned()
            .collect();
        keys.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(keys)
    }
}
