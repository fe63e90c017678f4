// API key domain type and credential generation
// Decision: Keys are presented as "<access_key_id> <secret_access_key>" in the Authorization header
// Decision: Secrets are never serialized back to clients

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Prefix of every access key id.
pub const ACCESS_KEY_ID_PREFIX: &str = "SC";

const ACCESS_KEY_ID_SUFFIX_LEN: usize = 22;
const ACCESS_KEY_ID_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a secret access key.
pub const SECRET_ACCESS_KEY_LEN: usize = 64;
const SECRET_ACCESS_KEY_CHARS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ApiKey {
    pub access_key_id: String,
    /// Only ever read from the store.
    #[serde(default, skip_serializing)]
    pub secret_access_key: String,
    /// Account the key acts as.
    pub account_id: String,
    /// Set when the key is scoped to one product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
    pub expires: DateTime<Utc>,
}

impl ApiKey {
    /// Create a fresh key for `account_id` with generated credentials.
    pub fn generate(
        account_id: impl Into<String>,
        name: impl Into<String>,
        expires: DateTime<Utc>,
    ) -> Self {
        Self {
            access_key_id: generate_access_key_id(),
            secret_access_key: generate_secret_access_key(),
            account_id: account_id.into(),
            repository_id: None,
            name: name.into(),
            disabled: false,
            expires,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }

    /// Usable for authentication at `now` with `secret`.
    pub fn accepts(&self, secret: &str, now: DateTime<Utc>) -> bool {
        !self.disabled && !self.is_expired(now) && constant_time_eq(&self.secret_access_key, secret)
    }
}

/// Generate an access key id: "SC" followed by 22 uppercase alphanumerics.
pub fn generate_access_key_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ACCESS_KEY_ID_SUFFIX_LEN)
        .map(|_| ACCESS_KEY_ID_CHARS[rng.gen_range(0..ACCESS_KEY_ID_CHARS.len())] as char)
        .collect();
    format!("{}{}", ACCESS_KEY_ID_PREFIX, suffix)
}

/// Generate a 64 character alphanumeric secret.
pub fn generate_secret_access_key() -> String {
    let mut rng = rand::thread_rng();
    (0..SECRET_ACCESS_KEY_LEN)
        .map(|_| SECRET_ACCESS_KEY_CHARS[rng.gen_range(0..SECRET_ACCESS_KEY_CHARS.len())] as char)
        .collect()
}

/// Check the shape of an access key id before hitting the store.
pub fn is_valid_access_key_id(key: &str) -> bool {
    key.len() == ACCESS_KEY_ID_PREFIX.len() + ACCESS_KEY_ID_SUFFIX_LEN
        && key.starts_with(ACCESS_KEY_ID_PREFIX)
        && key.bytes().all(|b| ACCESS_KEY_ID_CHARS.contains(&b))
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
