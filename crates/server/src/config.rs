// Server configuration loaded from environment variables.

use axum::http::HeaderValue;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_API_PREFIX: &str = "/api";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,
    /// Prefix for JSON API routes; empty mounts them at the root
    pub api_prefix: String,
    /// Origins allowed by CORS; empty means same-origin only
    pub cors_origins: Vec<HeaderValue>,
    /// YAML or JSON file with accounts, products, memberships and keys
    pub seed_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            cors_origins: Vec::new(),
            seed_file: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let bind_addr = lookup("BIND_ADDR")
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.bind_addr);

        // API_PREFIX="" is honoured and mounts the API at the root
        let api_prefix = lookup("API_PREFIX")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_prefix);

        // Example: CORS_ALLOWED_ORIGINS="https://source.coop,https://staging.source.coop"
        let cors_origins = lookup("CORS_ALLOWED_ORIGINS")
            .filter(|s| !s.is_empty())
            .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
            .unwrap_or_default();

        let seed_file = lookup("SEED_FILE")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            bind_addr,
            api_prefix,
            cors_origins,
            seed_file,
        }
    }
}
