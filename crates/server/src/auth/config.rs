// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for auth behaviour, IDENTITY_PROVIDER_ prefix for the provider client
// Decision: Provider failures surface as errors unless explicitly downgraded to anonymous

use std::time::Duration;

const DEFAULT_PROVIDER_URL: &str = "http://localhost:4000";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOGIN_PATH: &str = "/auth/login";

/// What to do when the identity provider cannot answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderFailurePolicy {
    /// Fail the request with a 500
    #[default]
    Error,
    /// Treat the caller as anonymous and log a warning
    Anonymous,
}

impl ProviderFailurePolicy {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "anonymous" => ProviderFailurePolicy::Anonymous,
            _ => ProviderFailurePolicy::Error,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the identity provider's public API (whoami lives here)
    pub provider_url: String,
    /// Base URL of the provider's browser-facing self-service flows
    pub provider_frontend_url: String,
    /// Upper bound for one whoami call
    pub provider_timeout: Duration,
    /// Behaviour when the provider is unreachable
    pub failure_policy: ProviderFailurePolicy,
    /// Path the login redirect points to
    pub login_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            provider_frontend_url: DEFAULT_PROVIDER_URL.to_string(),
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            failure_policy: ProviderFailurePolicy::Error,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let provider_url = var("IDENTITY_PROVIDER_URL")
            .or_else(|| var("ORY_SDK_URL"))
            .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let provider_frontend_url = var("IDENTITY_PROVIDER_FRONTEND_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| provider_url.clone());

        let provider_timeout = var("IDENTITY_PROVIDER_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS));

        let failure_policy = var("AUTH_PROVIDER_FAILURE_POLICY")
            .map(|s| ProviderFailurePolicy::from_str(&s))
            .unwrap_or_default();

        let login_path = var("AUTH_LOGIN_PATH").unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string());

        Self {
            provider_url,
            provider_frontend_url,
            provider_timeout,
            failure_policy,
            login_path,
        }
    }
}
