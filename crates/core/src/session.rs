// Session domain types
//
// Two layers:
// - IdentitySession: what the identity provider returns for a cookie
// - UserSession: the application's view of the caller (identity + linked account
//   + active memberships), materialised per request and never cached

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{Account, AccountFlag};
use crate::membership::Membership;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Public metadata the application stores on a provider identity.
///
/// Other keys the provider returns (such as a legacy `is_admin`) are ignored;
/// admin rights come only from the account's `admin` flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityMetadata {
    /// Account linked to this identity, once onboarding is complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

/// An email address the provider tracks verification for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifiableAddress {
    pub value: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
}

/// Identity as described by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    /// Provider subject identifier.
    pub id: String,
    /// Provider-managed traits (email, name, ...). Opaque here.
    #[serde(default)]
    pub traits: serde_json::Value,
    #[serde(default)]
    pub metadata_public: Option<IdentityMetadata>,
    #[serde(default)]
    pub verifiable_addresses: Vec<VerifiableAddress>,
}

/// Session object issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentitySession {
    pub id: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub authenticated_at: Option<DateTime<Utc>>,
    pub identity: Identity,
}

fn default_active() -> bool {
    true
}

impl IdentitySession {
    /// Provider subject of this session.
    pub fn subject(&self) -> &str {
        &self.identity.id
    }

    /// Account id recorded on the identity's public metadata, if any.
    pub fn linked_account_id(&self) -> Option<&str> {
        self.identity
            .metadata_public
            .as_ref()
            .and_then(|m| m.account_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Inactive or expired sessions are treated as absent.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at.map_or(true, |expires| expires > now)
    }

    pub fn has_verified_address(&self) -> bool {
        self.identity.verifiable_addresses.iter().any(|a| a.verified)
    }
}

/// Response body of the provider's whoami call.
///
/// Older provider deployments return the session object directly; current
/// ones wrap it in `{"session": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WhoamiResponse {
    Wrapped { session: IdentitySession },
    Bare(IdentitySession),
}

/// Parse a whoami response body in either shape.
pub fn parse_whoami(body: &[u8]) -> Result<IdentitySession, serde_json::Error> {
    let response: WhoamiResponse = serde_json::from_slice(body)?;
    Ok(match response {
        WhoamiResponse::Wrapped { session } => session,
        WhoamiResponse::Bare(session) => session,
    })
}

/// The caller as seen by the application.
///
/// A session always has a subject: the provider identity for cookie sessions,
/// the key's account for API-key sessions. `account` is `None` until the
/// identity has completed onboarding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub memberships: Vec<Membership>,
    /// Provider session backing a cookie session.
    #[serde(skip)]
    pub identity: Option<IdentitySession>,
}

impl UserSession {
    /// Session for an identity that has no linked account yet.
    pub fn for_identity(identity_id: impl Into<String>) -> Self {
        Self {
            identity_id: Some(identity_id.into()),
            account: None,
            memberships: Vec::new(),
            identity: None,
        }
    }

    /// Session for an identity linked to `account`.
    pub fn for_account(
        identity_id: Option<String>,
        account: Account,
        memberships: Vec<Membership>,
    ) -> Self {
        Self {
            identity_id,
            account: Some(account),
            memberships,
            identity: None,
        }
    }

    pub fn with_identity(mut self, identity: IdentitySession) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Identifier used in logs: the account id if linked, otherwise the identity.
    pub fn subject(&self) -> &str {
        self.account
            .as_ref()
            .map(|a| a.account_id.as_str())
            .or(self.identity_id.as_deref())
            .unwrap_or_default()
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account.as_ref().map(|a| a.account_id.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.account
            .as_ref()
            .is_some_and(|a| a.has_flag(AccountFlag::Admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = r#"{
        "id": "sess-1",
        "active": true,
        "expires_at": "2999-01-01T00:00:00Z",
        "identity": {
            "id": "ident-1",
            "traits": {"email": "alice@example.com"},
            "metadata_public": {"account_id": "alice"},
            "verifiable_addresses": [{"value": "alice@example.com", "verified": true}]
        }
    }"#;

    #[test]
    fn test_parse_bare_session() {
        let session = parse_whoami(BARE.as_bytes()).unwrap();
        assert_eq!(session.subject(), "ident-1");
        assert_eq!(session.linked_account_id(), Some("alice"));
        assert!(session.has_verified_address());
        assert!(session.is_usable(Utc::now()));
    }

    #[test]
    fn test_parse_wrapped_session() {
        let wrapped = format!(r#"{{"session": {}}}"#, BARE);
        let session = parse_whoami(wrapped.as_bytes()).unwrap();
        assert_eq!(session.id, "sess-1");
        assert_eq!(session.linked_account_id(), Some("alice"));
    }

    #[test]
    fn test_parse_minimal_session() {
        let session = parse_whoami(br#"{"id": "s", "identity": {"id": "i"}}"#).unwrap();
        assert!(session.active);
        assert_eq!(session.linked_account_id(), None);
        assert!(!session.has_verified_address());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_whoami(br#"{"error": "nope"}"#).is_err());
        assert!(parse_whoami(b"not json").is_err());
    }

    #[test]
    fn test_empty_account_id_metadata_is_ignored() {
        let session = parse_whoami(
            br#"{"id": "s", "identity": {"id": "i", "metadata_public": {"account_id": ""}}}"#,
        )
        .unwrap();
        assert_eq!(session.linked_account_id(), None);
    }

    #[test]
    fn test_provider_admin_metadata_grants_nothing() {
        let session = parse_whoami(
            br#"{"id": "s", "identity": {"id": "i",
                "metadata_public": {"account_id": "alice", "is_admin": true}}}"#,
        )
        .unwrap();
        assert_eq!(session.linked_account_id(), Some("alice"));

        let user = UserSession::for_identity("i").with_identity(session);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_expired_or_inactive_session_is_unusable() {
        let mut session = parse_whoami(BARE.as_bytes()).unwrap();
        session.expires_at = Some(Utc::now() - chrono::Duration::minutes(1));
        assert!(!session.is_usable(Utc::now()));

        session.expires_at = None;
        session.active = false;
        assert!(!session.is_usable(Utc::now()));
    }

    #[test]
    fn test_user_session_serializes_null_account() {
        let session = UserSession::for_identity("ident-1");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["identity_id"], "ident-1");
        assert!(json["account"].is_null());
        assert_eq!(json["memberships"], serde_json::json!([]));
    }

    #[test]
    fn test_subject_prefers_account() {
        let session = UserSession::for_account(
            Some("ident-1".to_string()),
            Account::individual("alice", "ident-1"),
            vec![],
        );
        assert_eq!(session.subject(), "alice");
        assert_eq!(UserSession::for_identity("ident-2").subject(), "ident-2");
    }
}
