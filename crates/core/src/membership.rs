// Membership domain types
//
// A membership links a member account to an organization, optionally scoped
// to a single product of that organization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum MembershipRole {
    Owners,
    Maintainers,
    ReadData,
    WriteData,
}

impl MembershipRole {
    /// Roles that manage the organization or product.
    pub const MANAGERS: &'static [MembershipRole] =
        &[MembershipRole::Owners, MembershipRole::Maintainers];

    /// Roles that may write data.
    pub const WRITERS: &'static [MembershipRole] = &[
        MembershipRole::Owners,
        MembershipRole::Maintainers,
        MembershipRole::WriteData,
    ];

    /// Every role.
    pub const ALL: &'static [MembershipRole] = &[
        MembershipRole::Owners,
        MembershipRole::Maintainers,
        MembershipRole::WriteData,
        MembershipRole::ReadData,
    ];
}

/// Lifecycle state of a membership.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum MembershipState {
    Invited,
    Member,
    Revoked,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Membership {
    pub membership_id: Uuid,
    /// The member.
    pub account_id: String,
    /// The organization the member belongs to.
    pub membership_account_id: String,
    /// Set when the membership is scoped to one product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_id: Option<String>,
    pub role: MembershipRole,
    pub state: MembershipState,
    #[serde(default = "Utc::now")]
    pub state_changed: DateTime<Utc>,
}

impl Membership {
    /// Build an active organization-wide membership.
    pub fn new(
        account_id: impl Into<String>,
        membership_account_id: impl Into<String>,
        role: MembershipRole,
    ) -> Self {
        Self {
            membership_id: Uuid::now_v7(),
            account_id: account_id.into(),
            membership_account_id: membership_account_id.into(),
            repository_id: None,
            role,
            state: MembershipState::Member,
            state_changed: Utc::now(),
        }
    }

    /// Scope the membership to a single product.
    pub fn for_product(mut self, product_id: impl Into<String>) -> Self {
        self.repository_id = Some(product_id.into());
        self
    }

    pub fn with_state(mut self, state: MembershipState) -> Self {
        self.state = state;
        self
    }

    pub fn is_active(&self) -> bool {
        self.state == MembershipState::Member
    }

    /// Whether this active membership grants one of `roles` on the
    /// organization `account_id`, or on its product `product_id` when given.
    /// Organization-wide memberships cover every product.
    pub fn grants(
        &self,
        roles: &[MembershipRole],
        account_id: &str,
        product_id: Option<&str>,
    ) -> bool {
        if !self.is_active() || self.membership_account_id != account_id {
            return false;
        }
        if !roles.contains(&self.role) {
            return false;
        }
        match self.repository_id.as_deref() {
            None => true,
            Some(scoped) => product_id == Some(scoped),
        }
    }
}
