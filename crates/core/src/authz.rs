// Authorization predicate
// Decision: Deny by default; every (resource, action) pair not matched below is refused
// Decision: Owning account of a product is granted every product action
// Decision: A missing session is a valid input, never a panic; only public actions pass

use crate::account::{Account, AccountFlag, AccountType};
use crate::action::Action;
use crate::api_key::ApiKey;
use crate::membership::{Membership, MembershipRole, MembershipState};
use crate::product::{DataMode, Product, ProductVisibility};
use crate::session::UserSession;

/// Anything an action can be checked against.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Account(&'a Account),
    Product(&'a Product),
    ApiKey(&'a ApiKey),
    Membership(&'a Membership),
}

impl<'a> From<&'a Account> for Resource<'a> {
    fn from(account: &'a Account) -> Self {
        Resource::Account(account)
    }
}

impl<'a> From<&'a Product> for Resource<'a> {
    fn from(product: &'a Product) -> Self {
        Resource::Product(product)
    }
}

impl<'a> From<&'a ApiKey> for Resource<'a> {
    fn from(key: &'a ApiKey) -> Self {
        Resource::ApiKey(key)
    }
}

impl<'a> From<&'a Membership> for Resource<'a> {
    fn from(membership: &'a Membership) -> Self {
        Resource::Membership(membership)
    }
}

/// Decide whether `session` may perform `action` on `resource`.
///
/// Pure apart from a debug log line. Returns `false` for any resource/action
/// pair that does not belong together (e.g. `ReadRepositoryData` on an account).
pub fn is_authorized<'a>(
    session: Option<&UserSession>,
    resource: impl Into<Resource<'a>>,
    action: Action,
) -> bool {
    let authorized = decide(session, resource.into(), action);

    tracing::debug!(
        principal = session.map_or("ANONYMOUS", UserSession::subject),
        action = %action,
        authorized,
        "Checked authorization"
    );

    authorized
}

/// Whether the session's account carries the admin flag.
pub fn is_admin(session: Option<&UserSession>) -> bool {
    session.is_some_and(UserSession::is_admin)
}

fn decide(session: Option<&UserSession>, resource: Resource<'_>, action: Action) -> bool {
    // Disabled accounts can do nothing, not even public reads
    if account_of(session).is_some_and(|a| a.disabled) {
        return false;
    }

    match resource {
        Resource::Product(product) => product_action(session, product, action),
        Resource::Account(account) => account_action(session, account, action),
        Resource::ApiKey(key) => api_key_action(session, key, action),
        Resource::Membership(membership) => membership_action(session, membership, action),
    }
}

fn product_action(session: Option<&UserSession>, product: &Product, action: Action) -> bool {
    if !Action::PRODUCT.contains(&action) {
        return false;
    }

    if owns(session, &product.account_id) {
        return true;
    }

    let admin = is_admin(session);
    let has_account = account_of(session).is_some();
    let account_id = product.account_id.as_str();
    let product_id = Some(product.product_id.as_str());

    match action {
        Action::ListRepository => {
            admin
                || (!product.disabled
                    && (product.visibility == ProductVisibility::Public
                        || (has_account
                            && has_role(session, MembershipRole::ALL, account_id, product_id))))
        }
        Action::GetRepository | Action::ReadRepositoryData => {
            admin
                || (!product.disabled
                    && (product.data_mode == DataMode::Open
                        || has_role(session, MembershipRole::ALL, account_id, product_id)))
        }
        Action::WriteRepositoryData => {
            !product.disabled
                && has_account
                && (admin || has_role(session, MembershipRole::WRITERS, account_id, product_id))
        }
        Action::PutRepository | Action::DisableRepository => {
            has_account
                && (admin
                    || (!product.disabled
                        && has_role(session, MembershipRole::MANAGERS, account_id, product_id)))
        }
        Action::CreateRepository => {
            has_account
                && (admin
                    || (has_flag(session, AccountFlag::CreateRepositories)
                        && has_role(session, MembershipRole::MANAGERS, account_id, product_id)))
        }
        Action::ListRepositoryApiKeys | Action::ListRepositoryMemberships => {
            has_account
                && (admin || has_role(session, MembershipRole::MANAGERS, account_id, product_id))
        }
        _ => false,
    }
}

fn account_action(session: Option<&UserSession>, account: &Account, action: Action) -> bool {
    let admin = is_admin(session);
    let has_account = account_of(session).is_some();
    let account_id = account.account_id.as_str();
    let is_org = account.account_type == AccountType::Organization;

    match action {
        Action::CreateAccount => {
            if admin {
                return true;
            }
            match account.account_type {
                // Signed in, but not onboarded yet
                AccountType::Individual => {
                    session.is_some_and(|s| s.account.is_none() && s.identity_id.is_some())
                }
                AccountType::Organization => has_flag(session, AccountFlag::CreateOrganizations),
            }
        }
        Action::DisableAccount => {
            has_account
                && (admin
                    || (is_org && has_role(session, &[MembershipRole::Owners], account_id, None)))
        }
        Action::GetAccount | Action::ListAccount => {
            has_account
                && (admin
                    || (is_org && has_role(session, MembershipRole::MANAGERS, account_id, None))
                    || (!is_org && owns(session, account_id)))
        }
        Action::ListAccountApiKeys => {
            has_account && (admin || has_role(session, MembershipRole::MANAGERS, account_id, None))
        }
        Action::ListAccountMemberships => true,
        Action::GetAccountFlags => {
            has_account
                && (admin
                    || (!account.disabled
                        && (owns(session, account_id)
                            || (is_org
                                && has_role(session, MembershipRole::MANAGERS, account_id, None)))))
        }
        // Nobody but an admin changes flags, not even on their own account
        Action::PutAccountFlags => has_account && admin,
        Action::GetAccountProfile => admin || !account.disabled,
        Action::PutAccountProfile => {
            admin
                || (!account.disabled
                    && (owns(session, account_id)
                        || (is_org
                            && has_role(session, MembershipRole::MANAGERS, account_id, None))))
        }
        _ => false,
    }
}

fn api_key_action(session: Option<&UserSession>, key: &ApiKey, action: Action) -> bool {
    if account_of(session).is_none() {
        return false;
    }
    let admin = is_admin(session);
    let manages = || {
        has_role(
            session,
            MembershipRole::MANAGERS,
            &key.account_id,
            key.repository_id.as_deref(),
        )
    };

    match action {
        Action::GetApiKey | Action::RevokeApiKey => admin || (!key.disabled && manages()),
        Action::CreateApiKey => admin || manages(),
        _ => false,
    }
}

fn membership_action(
    session: Option<&UserSession>,
    membership: &Membership,
    action: Action,
) -> bool {
    let admin = is_admin(session);
    let own = owns(session, &membership.account_id);
    let manages = || {
        has_role(
            session,
            MembershipRole::MANAGERS,
            &membership.membership_account_id,
            membership.repository_id.as_deref(),
        )
    };

    match action {
        Action::GetMembership => {
            // Active memberships are public
            if membership.state == MembershipState::Member {
                return true;
            }
            account_of(session).is_some()
                && (admin || (membership.state != MembershipState::Revoked && (own || manages())))
        }
        Action::AcceptMembership | Action::RejectMembership => admin || own,
        Action::RevokeMembership => admin || own || manages(),
        Action::InviteMembership | Action::UpdateMembershipRole => admin || manages(),
        _ => false,
    }
}

fn account_of(session: Option<&UserSession>) -> Option<&Account> {
    session.and_then(|s| s.account.as_ref())
}

fn owns(session: Option<&UserSession>, account_id: &str) -> bool {
    account_of(session).is_some_and(|a| a.account_id == account_id)
}

fn has_flag(session: Option<&UserSession>, flag: AccountFlag) -> bool {
    account_of(session).is_some_and(|a| a.has_flag(flag))
}

/// Owner of `account_id`, or an active member holding one of `roles` there
/// (organization-wide, or on `product_id` when the membership is scoped).
fn has_role(
    session: Option<&UserSession>,
    roles: &[MembershipRole],
    account_id: &str,
    product_id: Option<&str>,
) -> bool {
    if owns(session, account_id) {
        return true;
    }
    let Some(session) = session else {
        return false;
    };
    if session.account.is_none() {
        return false;
    }
    session
        .memberships
        .iter()
        .any(|m| m.grants(roles, account_id, product_id))
}
