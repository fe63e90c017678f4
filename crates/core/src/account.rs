// Account domain types
//
// An account is either an individual (linked to an identity at the provider)
// or an organization (owned through memberships).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Kind of account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// A person, linked to exactly one identity.
    Individual,
    /// A group of members. Never linked to an identity directly.
    Organization,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Individual => write!(f, "individual"),
            AccountType::Organization => write!(f, "organization"),
        }
    }
}

/// Feature flags granted to an account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum AccountFlag {
    /// Platform administrator.
    Admin,
    /// May create products.
    CreateRepositories,
    /// May create organizations.
    CreateOrganizations,
}

/// Public profile metadata shown on the account page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AccountProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// ORCID identifier (individuals).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    /// ROR identifier (organizations).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ror_id: Option<String>,
}

/// A user or organization record owned by the application's data store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Account {
    /// URL-safe account identifier.
    pub account_id: String,
    /// Individual or organization.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Display name.
    pub name: String,
    /// Identity provider subject; only set for individual accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    /// Disabled accounts are hidden and cannot act.
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub flags: Vec<AccountFlag>,
    #[serde(default)]
    pub metadata_public: AccountProfile,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build an individual account linked to `identity_id`.
    pub fn individual(account_id: impl Into<String>, identity_id: impl Into<String>) -> Self {
        let account_id = account_id.into();
        let now = Utc::now();
        Self {
            name: account_id.clone(),
            account_id,
            account_type: AccountType::Individual,
            identity_id: Some(identity_id.into()),
            disabled: false,
            flags: Vec::new(),
            metadata_public: AccountProfile::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build an organization account.
    pub fn organization(account_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            account_id: account_id.into(),
            account_type: AccountType::Organization,
            name: name.into(),
            identity_id: None,
            disabled: false,
            flags: Vec::new(),
            metadata_public: AccountProfile::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_flags(mut self, flags: impl IntoIterator<Item = AccountFlag>) -> Self {
        self.flags = flags.into_iter().collect();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn is_individual(&self) -> bool {
        self.account_type == AccountType::Individual
    }

    pub fn is_organization(&self) -> bool {
        self.account_type == AccountType::Organization
    }

    pub fn has_flag(&self, flag: AccountFlag) -> bool {
        self.flags.contains(&flag)
    }
}
