// End-to-end route tests against a mocked identity provider.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sourcecoop_core::{
    Account, AccountFlag, ApiKey, DataMode, InMemoryStore, Membership, MembershipRole,
    MembershipState, Product, ProductVisibility, ResourceStore,
};
use sourcecoop_server::api::ApiState;
use sourcecoop_server::auth::{
    AuthConfig, AuthState, OryGateway, ProviderFailurePolicy, SessionResolver,
};
use sourcecoop_server::build_app;
use sourcecoop_server::config::ServerConfig;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALICE: &str = "ory_session_x=alice";
const BOB: &str = "ory_session_x=bob";
const NEWCOMER: &str = "ory_session_x=newcomer";
const ACCT_1: &str = "ory_session_x=acct1";

fn whoami_body(identity_id: &str, verified: bool) -> Value {
    json!({
        "session": {
            "id": format!("sess-{}", identity_id),
            "active": true,
            "identity": {
                "id": identity_id,
                "verifiable_addresses": [{"value": "user@example.com", "verified": verified}]
            }
        }
    })
}

async fn mock_provider() -> MockServer {
    let server = MockServer::start().await;
    for (cookie, identity, verified) in [
        (ALICE, "ident-alice", true),
        (BOB, "ident-bob", false),
        (NEWCOMER, "ident-newcomer", true),
        (ACCT_1, "ident-acct-1", true),
    ] {
        Mock::given(method("GET"))
            .and(path("/sessions/whoami"))
            .and(header_eq("cookie", cookie))
            .respond_with(ResponseTemplate::new(200).set_body_json(whoami_body(identity, verified)))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/sessions/whoami"))
        .respond_with(ResponseTemplate::new(401))
        .with_priority(10)
        .mount(&server)
        .await;
    server
}

async fn failing_provider() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions/whoami"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is on fire"))
        .mount(&server)
        .await;
    server
}

fn seed_store(api_key: &ApiKey) -> Arc<InMemoryStore> {
    let store = InMemoryStore::new();
    store.insert_account(
        Account::individual("alice", "ident-alice").with_flags([AccountFlag::CreateRepositories]),
    );
    store.insert_account(Account::individual("bob", "ident-bob"));
    store.insert_account(Account::individual("acct_1", "ident-acct-1"));
    store.insert_account(Account::organization("radiant", "Radiant Earth"));

    store.insert_product(Product::new("alice", "landcover").featured());
    store.insert_product(
        Product::new("alice", "drafts")
            .featured()
            .with_visibility(ProductVisibility::Unlisted),
    );
    store.insert_product(Product::new("alice", "archive").featured().disabled());
    store.insert_product(Product::new("alice", "plain"));
    store.insert_product(
        Product::new("radiant", "private-data")
            .with_visibility(ProductVisibility::Restricted)
            .with_data_mode(DataMode::Private),
    );

    store.insert_membership(Membership::new("bob", "radiant", MembershipRole::ReadData));
    store.insert_api_key(api_key.clone());
    Arc::new(store)
}

/// App plus the store behind it, for tests that add records of their own
async fn app_and_store(
    server: &MockServer,
    policy: ProviderFailurePolicy,
) -> (Router, ApiKey, Arc<InMemoryStore>) {
    let api_key = ApiKey::generate("alice", "ci", Utc::now() + Duration::days(30));
    let seeded = seed_store(&api_key);
    let store: Arc<dyn ResourceStore> = seeded.clone();

    let auth_config = AuthConfig {
        provider_url: server.uri(),
        provider_frontend_url: "https://auth.source.coop".to_string(),
        provider_timeout: std::time::Duration::from_secs(2),
        failure_policy: policy,
        ..Default::default()
    };
    let gateway = OryGateway::new(&auth_config).unwrap();
    let resolver = SessionResolver::new(Arc::new(gateway), store.clone(), &auth_config);
    let state = ApiState::new(AuthState::new(auth_config, resolver), store);

    (build_app(state, &ServerConfig::default()), api_key, seeded)
}

async fn app_with(server: &MockServer, policy: ProviderFailurePolicy) -> (Router, ApiKey) {
    let (app, api_key, _) = app_and_store(server, policy).await;
    (app, api_key)
}

async fn app(server: &MockServer) -> Router {
    app_with(server, ProviderFailurePolicy::Error).await.0
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_whoami_without_session() {
    let server = mock_provider().await;
    let response = app(&server).await.oneshot(get("/api/whoami", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({"code": 401, "message": "No Session Found"})
    );
}

#[tokio::test]
async fn test_whoami_unknown_cookie() {
    let server = mock_provider().await;
    let response = app(&server)
        .await
        .oneshot(get("/api/v1/whoami", Some("ory_session_x=stale")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_whoami_with_session() {
    let server = mock_provider().await;
    let response = app(&server)
        .await
        .oneshot(get("/api/whoami", Some(ALICE)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["identity_id"], "ident-alice");
    assert_eq!(body["account"]["account_id"], "alice");
}

#[tokio::test]
async fn test_whoami_with_split_cookie_headers() {
    let server = mock_provider().await;
    Mock::given(method("GET"))
        .and(path("/sessions/whoami"))
        .and(header_eq("cookie", "theme=dark; ory_session_x=alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(whoami_body("ident-alice", true)))
        .mount(&server)
        .await;

    let request = Request::builder()
        .uri("/api/whoami")
        .header(header::COOKIE, "theme=dark")
        .header(header::COOKIE, ALICE)
        .body(Body::empty())
        .unwrap();
    let response = app(&server).await.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["account"]["account_id"], "alice");
}

#[tokio::test]
async fn test_whoami_without_account() {
    let server = mock_provider().await;
    let response = app(&server)
        .await
        .oneshot(get("/api/whoami", Some(NEWCOMER)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["identity_id"], "ident-newcomer");
    assert!(body["account"].is_null());
}

#[tokio::test]
async fn test_whoami_with_api_key() {
    let server = mock_provider().await;
    let (app, key) = app_with(&server, ProviderFailurePolicy::Error).await;
    let request = Request::builder()
        .uri("/api/whoami")
        .header(
            header::AUTHORIZATION,
            format!("{} {}", key.access_key_id, key.secret_access_key),
        )
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["account"]["account_id"], "alice");
}

#[tokio::test]
async fn test_check_session_bodies() {
    let server = mock_provider().await;
    let app = app(&server).await;

    let response = app
        .clone()
        .oneshot(get("/api/accounts/check-session", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await, json!({"error": "No session found"}));

    let response = app
        .oneshot(get("/api/accounts/check-session", Some(ALICE)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["session"]["account"]["account_id"], "alice");
}

#[tokio::test]
async fn test_provider_failure_is_generic_500() {
    let server = failing_provider().await;
    let response = app(&server)
        .await
        .oneshot(get("/api/whoami", Some(ALICE)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body, json!({"code": 500, "message": "Internal server error"}));
    assert!(!body.to_string().contains("fire"));
}

#[tokio::test]
async fn test_provider_failure_anonymous_policy() {
    let server = failing_provider().await;
    let (app, _) = app_with(&server, ProviderFailurePolicy::Anonymous).await;

    let response = app
        .clone()
        .oneshot(get("/api/whoami", Some(ALICE)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get("/api/repositories/featured", Some(ALICE)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_featured_filters_for_anonymous() {
    let server = mock_provider().await;
    let response = app(&server)
        .await
        .oneshot(get("/api/repositories/featured", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["product_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["landcover"]);
}

#[tokio::test]
async fn test_featured_includes_owner_products() {
    let server = mock_provider().await;
    let response = app(&server)
        .await
        .oneshot(get("/api/repositories/featured", Some(ALICE)))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_product_listing_and_lookup() {
    let server = mock_provider().await;
    let app = app(&server).await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/products?limit=1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["products"].as_array().unwrap().len(), 1);
    assert!(body["next"].is_string());

    let response = app
        .clone()
        .oneshot(get("/api/v1/products/nobody", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Restricted products are indistinguishable from missing ones
    let response = app
        .clone()
        .oneshot(get("/api/v1/products/radiant/private-data", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get("/api/v1/products/radiant/private-data", Some(BOB)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_query_is_json_error() {
    let server = mock_provider().await;
    let app = app(&server).await;

    for uri in ["/api/v1/products?limit=abc", "/api/v1/products/alice?limit=-1"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = json_body(response).await;
        assert_eq!(body["code"], 400);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_product_permissions() {
    let server = mock_provider().await;
    let app = app(&server).await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/products/alice/landcover/permissions", None))
        .await
        .unwrap();
    assert_eq!(json_body(response).await, json!(["read"]));

    let response = app
        .clone()
        .oneshot(get("/api/v1/products/alice/landcover/permissions", Some(ALICE)))
        .await
        .unwrap();
    assert_eq!(json_body(response).await, json!(["write", "read"]));

    let response = app
        .clone()
        .oneshot(get("/api/v1/products/radiant/private-data/permissions", None))
        .await
        .unwrap();
    assert_eq!(json_body(response).await, json!([]));

    let response = app
        .oneshot(get("/api/v1/products/alice/missing/permissions", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_account_flags() {
    let server = mock_provider().await;
    let app = app(&server).await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/accounts/alice/flags", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get("/api/v1/accounts/alice/flags", Some(BOB)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["code"], 403);

    let response = app
        .clone()
        .oneshot(get("/api/v1/accounts/alice/flags", Some(ALICE)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!(["create_repositories"]));

    let response = app
        .oneshot(get("/api/v1/accounts/nobody/flags", Some(ALICE)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_account_profile_and_members() {
    let server = mock_provider().await;
    let app = app(&server).await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/accounts/radiant", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["name"], "Radiant Earth");

    let response = app
        .oneshot(get("/api/v1/accounts/radiant/members", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["account_id"], "bob");
}

#[tokio::test]
async fn test_api_keys_hide_secrets() {
    let server = mock_provider().await;
    let (app, key) = app_with(&server, ProviderFailurePolicy::Error).await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/accounts/alice/api-keys", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get("/api/v1/accounts/alice/api-keys", Some(ALICE)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body[0]["access_key_id"], key.access_key_id.as_str());
    assert!(body[0].get("secret_access_key").is_none());

    let uri = format!("/api/v1/api-keys/{}", key.access_key_id);
    let response = app.clone().oneshot(get(&uri, Some(BOB))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.oneshot(get(&uri, Some(ALICE))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_product_api_keys() {
    let server = mock_provider().await;
    let (app, org_key, store) = app_and_store(&server, ProviderFailurePolicy::Error).await;
    let mut scoped = ApiKey::generate("alice", "landcover-ci", Utc::now() + Duration::days(30));
    scoped.repository_id = Some("landcover".to_string());
    store.insert_api_key(scoped.clone());

    let uri = "/api/v1/products/alice/landcover/api-keys";
    let response = app.clone().oneshot(get(uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(get(uri, Some(BOB))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get("/api/v1/products/alice/missing/api-keys", Some(ALICE)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get(uri, Some(ALICE))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let keys = body.as_array().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0]["access_key_id"], scoped.access_key_id.as_str());
    assert_ne!(keys[0]["access_key_id"], org_key.access_key_id.as_str());
    assert!(keys[0].get("secret_access_key").is_none());
}

#[tokio::test]
async fn test_product_members() {
    let server = mock_provider().await;
    let (app, _, store) = app_and_store(&server, ProviderFailurePolicy::Error).await;
    store.insert_membership(Membership::new("alice", "radiant", MembershipRole::Maintainers));
    store.insert_membership(
        Membership::new("acct_1", "radiant", MembershipRole::ReadData).for_product("private-data"),
    );

    let uri = "/api/v1/products/radiant/private-data/members";
    let response = app.clone().oneshot(get(uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Read access is not enough to list members
    let response = app.clone().oneshot(get(uri, Some(BOB))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["code"], 403);

    let response = app
        .clone()
        .oneshot(get("/api/v1/products/radiant/gone/members", Some(ALICE)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get(uri, Some(ALICE))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["account_id"], "acct_1");
    assert_eq!(body[0]["repository_id"], "private-data");
}

#[tokio::test]
async fn test_get_membership() {
    let server = mock_provider().await;
    let (app, _, store) = app_and_store(&server, ProviderFailurePolicy::Error).await;
    let active = Membership::new("acct_1", "radiant", MembershipRole::Maintainers);
    let invited = Membership::new("alice", "radiant", MembershipRole::ReadData)
        .with_state(MembershipState::Invited);
    store.insert_membership(active.clone());
    store.insert_membership(invited.clone());

    // Active memberships are public
    let uri = format!("/api/v1/memberships/{}", active.membership_id);
    let response = app.clone().oneshot(get(&uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["account_id"], "acct_1");

    // Pending invitations are only visible to the invitee and managers
    let uri = format!("/api/v1/memberships/{}", invited.membership_id);
    let response = app.clone().oneshot(get(&uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.clone().oneshot(get(&uri, Some(BOB))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.clone().oneshot(get(&uri, Some(ALICE))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let missing = format!("/api/v1/memberships/{}", uuid::Uuid::now_v7());
    let response = app.clone().oneshot(get(&missing, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get("/api/v1/memberships/not-a-uuid", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], 400);
}

#[tokio::test]
async fn test_check_id_malformed_body() {
    let server = mock_provider().await;
    let request = Request::builder()
        .method("PUT")
        .uri("/api/accounts/check-id")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"id\": "))
        .unwrap();

    let response = app(&server).await.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], 400);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_check_id() {
    let server = mock_provider().await;
    let app = app(&server).await;

    let check = |id: Value| {
        Request::builder()
            .method("PUT")
            .uri("/api/accounts/check-id")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "id": id }).to_string()))
            .unwrap()
    };

    let response = app.clone().oneshot(check(json!("new-org"))).await.unwrap();
    assert_eq!(json_body(response).await, json!({"available": true}));

    let response = app.clone().oneshot(check(json!("alice"))).await.unwrap();
    assert_eq!(json_body(response).await, json!({"available": false}));

    for bad in [json!("admin"), json!("ab"), json!("Bad_Id"), Value::Null] {
        let response = app.clone().oneshot(check(bad.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", bad);
    }
}

#[tokio::test]
async fn test_settings_redirects() {
    let server = mock_provider().await;
    let app = app(&server).await;

    let response = app.clone().oneshot(get("/settings", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/auth/login");

    let response = app
        .clone()
        .oneshot(get("/settings", Some(NEWCOMER)))
        .await
        .unwrap();
    assert_eq!(location(&response), "/");

    // Same session twice, same destination
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get("/settings", Some(ACCT_1)))
            .await
            .unwrap();
        assert_eq!(location(&response), "/edit/account/acct_1/profile");
    }
}

#[tokio::test]
async fn test_email_verified_redirects() {
    let server = mock_provider().await;
    let app = app(&server).await;

    let response = app
        .clone()
        .oneshot(get("/email-verified", None))
        .await
        .unwrap();
    assert_eq!(location(&response), "/");

    let response = app
        .clone()
        .oneshot(get("/email-verified", Some(NEWCOMER)))
        .await
        .unwrap();
    assert_eq!(location(&response), "/onboarding");

    let response = app
        .clone()
        .oneshot(get("/email-verified", Some(ALICE)))
        .await
        .unwrap();
    assert_eq!(location(&response), "/alice?verified");

    let response = app
        .oneshot(get("/email-verified", Some(BOB)))
        .await
        .unwrap();
    assert!(location(&response).starts_with("https://auth.source.coop/"));
}

#[tokio::test]
async fn test_edit_redirects() {
    let server = mock_provider().await;
    let app = app(&server).await;

    let response = app
        .clone()
        .oneshot(get("/edit/account/alice", None))
        .await
        .unwrap();
    assert_eq!(location(&response), "/auth/login");

    let response = app
        .clone()
        .oneshot(get("/edit/account/alice", Some(ALICE)))
        .await
        .unwrap();
    assert_eq!(location(&response), "/edit/account/alice/profile");

    let response = app
        .clone()
        .oneshot(get("/edit/account/alice", Some(BOB)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get("/edit/product/alice/landcover", Some(ALICE)))
        .await
        .unwrap();
    assert_eq!(location(&response), "/edit/product/alice/landcover/details");

    let response = app
        .oneshot(get("/edit/product/alice/landcover", Some(BOB)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_and_health() {
    let server = mock_provider().await;
    let app = app(&server).await;

    let response = app.clone().oneshot(get("/api/openapi", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json_body(response).await["paths"]["/v1/whoami"].is_object());

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(json_body(response).await["status"], "ok");
}
