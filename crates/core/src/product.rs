// Product (repository) domain types
//
// A product is a published dataset owned by an account. Visibility controls
// who can discover it; data mode controls who can read its objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Discoverability of a product.
/// - `public`: listed in search and on the account page
/// - `unlisted`: reachable by link only
/// - `restricted`: members only
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ProductVisibility {
    #[default]
    Public,
    Unlisted,
    Restricted,
}

/// Who may read a product's data objects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    /// Anyone can read.
    #[default]
    Open,
    /// Readable by subscribers (members).
    Subscription,
    /// Readable by members only.
    Private,
}

/// Value of `featured` for products shown on the landing page.
pub const FEATURED: u8 = 1;

/// A repository/product record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Product {
    /// Owning account.
    pub account_id: String,
    /// Identifier, unique within the owning account.
    #[serde(alias = "repository_id")]
    pub product_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub visibility: ProductVisibility,
    #[serde(default)]
    pub data_mode: DataMode,
    /// 1 when featured, 0 otherwise.
    #[serde(default)]
    pub featured: u8,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(account_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        let product_id = product_id.into();
        let now = Utc::now();
        Self {
            account_id: account_id.into(),
            title: product_id.clone(),
            product_id,
            description: String::new(),
            tags: Vec::new(),
            visibility: ProductVisibility::Public,
            data_mode: DataMode::Open,
            featured: 0,
            disabled: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_visibility(mut self, visibility: ProductVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_data_mode(mut self, data_mode: DataMode) -> Self {
        self.data_mode = data_mode;
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured = FEATURED;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn is_featured(&self) -> bool {
        self.featured == FEATURED
    }

    /// Case-insensitive match against title, description and both ids.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [
            &self.title,
            &self.description,
            &self.account_id,
            &self.product_id,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }

    /// True when any of `tags` (already lowercased) is on the product.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter()
            .any(|tag| self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
    }
}
