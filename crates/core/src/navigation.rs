// Redirect decisions for page routes
// Decision: Destinations are pure functions of (session, resources); the server
//           only maps them to HTTP responses, so repeated calls agree
// Decision: Login is symbolic; its path comes from configuration

use crate::account::Account;
use crate::action::Action;
use crate::authz::is_authorized;
use crate::product::Product;
use crate::session::UserSession;
use crate::urls;

/// Where a page route sends the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The configured login route.
    Login,
    /// A concrete path or absolute URL.
    Redirect(String),
    /// Render as not found; hidden resources look missing.
    NotFound,
}

impl Destination {
    fn to(path: String) -> Self {
        Destination::Redirect(path)
    }
}

/// `/settings`: login without a session, home without an account,
/// otherwise the account's profile editor.
pub fn settings(session: Option<&UserSession>) -> Destination {
    let Some(session) = session else {
        return Destination::Login;
    };
    match session.account_id() {
        Some(account_id) => Destination::to(urls::edit_account_profile_url(account_id)),
        None => Destination::to(urls::home_url()),
    }
}

/// Landing page after the provider's email verification flow.
///
/// Without a verified address the caller is sent back into the provider's
/// verification flow.
pub fn email_verified(session: Option<&UserSession>, provider_frontend_url: &str) -> Destination {
    let Some(session) = session else {
        return Destination::to(urls::home_url());
    };
    let Some(account_id) = session.account_id() else {
        return Destination::to(urls::onboarding_url());
    };

    let verified = session
        .identity
        .as_ref()
        .is_some_and(|identity| identity.has_verified_address());

    if verified {
        Destination::to(urls::account_url(account_id, Some("verified")))
    } else {
        Destination::to(urls::verify_email_url(provider_frontend_url))
    }
}

/// Account editor entry point. `account` is the looked-up target, if any.
pub fn edit_account(session: Option<&UserSession>, account: Option<&Account>) -> Destination {
    if session.and_then(UserSession::account_id).is_none() {
        return Destination::Login;
    }
    match account {
        Some(account) if is_authorized(session, account, Action::GetAccount) => {
            Destination::to(urls::edit_account_profile_url(&account.account_id))
        }
        _ => Destination::NotFound,
    }
}

/// Product editor entry point. `product` is the looked-up target, if any.
pub fn edit_product(session: Option<&UserSession>, product: Option<&Product>) -> Destination {
    if session.and_then(UserSession::account_id).is_none() {
        return Destination::Login;
    }
    match product {
        Some(product) if is_authorized(session, product, Action::PutRepository) => {
            Destination::to(urls::edit_product_details_url(
                &product.account_id,
                &product.product_id,
            ))
        }
        _ => Destination::NotFound,
    }
}
