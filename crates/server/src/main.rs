// Source Cooperative session service
// Decision: Records come from an in-memory store seeded from SEED_FILE; empty when unset

use anyhow::{Context, Result};
use sourcecoop_core::telemetry::{init_telemetry, TelemetryConfig};
use sourcecoop_core::{InMemoryStore, ResourceStore, SeedData};
use sourcecoop_server::api::ApiState;
use sourcecoop_server::auth::{AuthConfig, AuthState, OryGateway, SessionResolver};
use sourcecoop_server::build_app;
use sourcecoop_server::config::ServerConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Local .env is optional
    let _ = dotenvy::dotenv();

    // Configure via environment variables:
    // - OTEL_SERVICE_NAME: Service name (default: "sourcecoop")
    // - OTEL_EXPORTER_OTLP_ENDPOINT: OTLP endpoint (e.g., "http://localhost:4317")
    // - RUST_LOG: Log filter (default: "info,tower_http=info")
    let telemetry_config =
        TelemetryConfig::from_env().with_service_version(env!("CARGO_PKG_VERSION"));

    // Keep the guard alive for the lifetime of the application
    let _telemetry_guard = init_telemetry(telemetry_config);

    tracing::info!("sourcecoop-server starting...");

    let server_config = ServerConfig::from_env();
    let auth_config = AuthConfig::from_env();
    tracing::info!(
        provider_url = %auth_config.provider_url,
        failure_policy = ?auth_config.failure_policy,
        timeout_secs = auth_config.provider_timeout.as_secs(),
        "Authentication configured"
    );

    let store: Arc<dyn ResourceStore> = match &server_config.seed_file {
        Some(path) => {
            let seed = SeedData::from_path(path)
                .with_context(|| format!("Failed to load seed file {}", path.display()))?;
            Arc::new(InMemoryStore::from_seed(seed))
        }
        None => {
            tracing::warn!("SEED_FILE not set, starting with an empty store");
            Arc::new(InMemoryStore::new())
        }
    };

    let gateway = OryGateway::new(&auth_config)?;
    let resolver = SessionResolver::new(Arc::new(gateway), store.clone(), &auth_config);
    let auth_state = AuthState::new(auth_config, resolver);
    let state = ApiState::new(auth_state, store);

    if !server_config.api_prefix.is_empty() {
        tracing::info!(prefix = %server_config.api_prefix, "API prefix configured");
    }
    if server_config.cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?server_config.cors_origins, "CORS origins configured");
    }

    let app = build_app(state, &server_config);

    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", server_config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
