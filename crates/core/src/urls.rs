// Application URL builders
//
// Only the paths the redirect routes need. Login and the provider's
// self-service URLs depend on configuration and are passed in.

pub fn home_url() -> String {
    "/".to_string()
}

pub fn onboarding_url() -> String {
    "/onboarding".to_string()
}

/// Account page, with an optional raw query string.
pub fn account_url(account_id: &str, params: Option<&str>) -> String {
    match params {
        Some(params) => format!("/{}?{}", account_id, params),
        None => format!("/{}", account_id),
    }
}

pub fn edit_account_url(account_id: &str) -> String {
    format!("/edit/account/{}", account_id)
}

pub fn edit_account_profile_url(account_id: &str) -> String {
    format!("{}/profile", edit_account_url(account_id))
}

pub fn edit_product_url(account_id: &str, product_id: &str) -> String {
    format!("/edit/product/{}/{}", account_id, product_id)
}

pub fn edit_product_details_url(account_id: &str, product_id: &str) -> String {
    format!("{}/details", edit_product_url(account_id, product_id))
}

/// Browser verification flow of the identity provider.
pub fn verify_email_url(provider_frontend_url: &str) -> String {
    format!(
        "{}/self-service/verification/browser",
        provider_frontend_url.trim_end_matches('/')
    )
}
