// Authorization actions
//
// Closed set of operations checked by `authz::is_authorized`. Wire names match
// the ones the web app and CLI already log and send.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum Action {
    // Products
    #[serde(rename = "repository:create")]
    CreateRepository,
    #[serde(rename = "repository:put")]
    PutRepository,
    #[serde(rename = "repository:disable")]
    DisableRepository,
    #[serde(rename = "repository:list")]
    ListRepository,
    #[serde(rename = "repository:get")]
    GetRepository,
    #[serde(rename = "repository:listAPIKeys")]
    ListRepositoryApiKeys,
    #[serde(rename = "repository:listMemberships")]
    ListRepositoryMemberships,
    #[serde(rename = "repository:data:read")]
    ReadRepositoryData,
    #[serde(rename = "repository:data:write")]
    WriteRepositoryData,

    // Accounts
    #[serde(rename = "account:create")]
    CreateAccount,
    #[serde(rename = "account:disable")]
    DisableAccount,
    #[serde(rename = "account:get")]
    GetAccount,
    #[serde(rename = "account:list")]
    ListAccount,
    #[serde(rename = "account:listAPIKeys")]
    ListAccountApiKeys,
    #[serde(rename = "account:listMemberships")]
    ListAccountMemberships,
    #[serde(rename = "account:flags:get")]
    GetAccountFlags,
    #[serde(rename = "account:flags:put")]
    PutAccountFlags,
    #[serde(rename = "account:profile:get")]
    GetAccountProfile,
    #[serde(rename = "account:profile:put")]
    PutAccountProfile,

    // API keys
    #[serde(rename = "api_key:get")]
    GetApiKey,
    #[serde(rename = "api_key:create")]
    CreateApiKey,
    #[serde(rename = "api_key:revoke")]
    RevokeApiKey,

    // Memberships
    #[serde(rename = "membership:get")]
    GetMembership,
    #[serde(rename = "membership:accept")]
    AcceptMembership,
    #[serde(rename = "membership:reject")]
    RejectMembership,
    #[serde(rename = "membership:revoke")]
    RevokeMembership,
    #[serde(rename = "membership:invite")]
    InviteMembership,
    #[serde(rename = "membership:role:update")]
    UpdateMembershipRole,
}

impl Action {
    /// Every action that applies to a product.
    pub const PRODUCT: &'static [Action] = &[
        Action::CreateRepository,
        Action::PutRepository,
        Action::DisableRepository,
        Action::ListRepository,
        Action::GetRepository,
        Action::ListRepositoryApiKeys,
        Action::ListRepositoryMemberships,
        Action::ReadRepositoryData,
        Action::WriteRepositoryData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateRepository => "repository:create",
            Action::PutRepository => "repository:put",
            Action::DisableRepository => "repository:disable",
            Action::ListRepository => "repository:list",
            Action::GetRepository => "repository:get",
            Action::ListRepositoryApiKeys => "repository:listAPIKeys",
            Action::ListRepositoryMemberships => "repository:listMemberships",
            Action::ReadRepositoryData => "repository:data:read",
            Action::WriteRepositoryData => "repository:data:write",
            Action::CreateAccount => "account:create",
            Action::DisableAccount => "account:disable",
            Action::GetAccount => "account:get",
            Action::ListAccount => "account:list",
            Action::ListAccountApiKeys => "account:listAPIKeys",
            Action::ListAccountMemberships => "account:listMemberships",
            Action::GetAccountFlags => "account:flags:get",
            Action::PutAccountFlags => "account:flags:put",
            Action::GetAccountProfile => "account:profile:get",
            Action::PutAccountProfile => "account:profile:put",
            Action::GetApiKey => "api_key:get",
            Action::CreateApiKey => "api_key:create",
            Action::RevokeApiKey => "api_key:revoke",
            Action::GetMembership => "membership:get",
            Action::AcceptMembership => "membership:accept",
            Action::RejectMembership => "membership:reject",
            Action::RevokeMembership => "membership:revoke",
            Action::InviteMembership => "membership:invite",
            Action::UpdateMembershipRole => "membership:role:update",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
