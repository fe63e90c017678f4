// Account and product identifier rules
//
// Identifiers appear in URLs and storage paths, so they are restricted to
// lowercase alphanumerics separated by single hyphens.

use regex::Regex;
use std::sync::LazyLock;

pub const MIN_ID_LEN: usize = 3;
pub const MAX_ID_LEN: usize = 40;

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("Invalid id pattern"));

/// Account ids that collide with site routes or staff roles.
pub const RESERVED_IDS: &[&str] = &[
    "admin", "moderator", "root", "superuser", "system", "api", "auth", "login", "logout",
    "register", "settings", "profile", "account", "help", "support", "about", "terms",
    "privacy", "security", "contact", "feedback", "status",
];

/// Whether `id` is reserved, ignoring case.
pub fn is_reserved_id(id: &str) -> bool {
    let lowered = id.to_lowercase();
    RESERVED_IDS.contains(&lowered.as_str())
}

/// Whether `id` is a well-formed account or product identifier.
pub fn is_valid_id(id: &str) -> bool {
    (MIN_ID_LEN..=MAX_ID_LEN).contains(&id.len()) && ID_PATTERN.is_match(id)
}
