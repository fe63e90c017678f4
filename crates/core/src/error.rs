// Error types for session resolution and resource lookup

use thiserror::Error;

/// Result type alias for session boundary operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors raised while resolving a caller or the resources they touch
#[derive(Debug, Error)]
pub enum AuthError {
    /// No usable session where one is required
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Session present, but the action is not allowed
    #[error("Forbidden")]
    Forbidden,

    /// Resource does not exist (or must look like it does not)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Identity provider unreachable or answered with something unexpected
    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Resource store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid configuration or seed data
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Create a not found error
    pub fn not_found(what: impl Into<String>) -> Self {
        AuthError::NotFound(what.into())
    }

    /// Create a provider unavailable error
    pub fn provider(msg: impl Into<String>) -> Self {
        AuthError::ProviderUnavailable(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        AuthError::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AuthError::Configuration(msg.into())
    }

    /// Whether the error is caused by the identity provider
    pub fn is_provider_error(&self) -> bool {
        matches!(self, AuthError::ProviderUnavailable(_))
    }
}
