// HTTP client for an Ory-compatible identity provider
// Decision: One GET /sessions/whoami per resolution, forwarding the inbound Cookie header
// Decision: 401/403 mean "no session"; anything else unexpected is a provider failure

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header, StatusCode};
use sourcecoop_core::session::parse_whoami;
use sourcecoop_core::{AuthError, IdentityGateway, IdentitySession};

use super::config::AuthConfig;

/// Whoami client backed by reqwest
#[derive(Clone)]
pub struct OryGateway {
    client: reqwest::Client,
    whoami_url: String,
}

impl OryGateway {
    pub fn new(config: &AuthConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()
            .context("Failed to build identity provider client")?;

        Ok(Self {
            client,
            whoami_url: format!("{}/sessions/whoami", config.provider_url),
        })
    }
}

#[async_trait]
impl IdentityGateway for OryGateway {
    async fn whoami(&self, cookie: &str) -> sourcecoop_core::Result<Option<IdentitySession>> {
        let response = self
            .client
            .get(&self.whoami_url)
            .header(header::COOKIE, cookie)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AuthError::provider(format!("whoami request failed: {}", e)))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::debug!(status = %status, "Identity provider reported no session");
                return Ok(None);
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(AuthError::provider(format!(
                    "whoami returned [{}] {}",
                    status, body
                )));
            }
            _ => {}
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::provider(format!("whoami body unreadable: {}", e)))?;

        let session = parse_whoami(&body)
            .map_err(|e| AuthError::provider(format!("whoami response malformed: {}", e)))?;

        Ok(Some(session))
    }
}
