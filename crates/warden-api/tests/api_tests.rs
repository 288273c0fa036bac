//! End-to-end tests over the in-memory adapter: the full router, guard
//! middleware included, driven with `oneshot`.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use warden_api::{build_router, AppState};
use warden_core::authorization::{Action, Subject};
use warden_core::domain::{Permission, Role, TenantId, User};
use warden_core::repositories::InMemoryStore;
use warden_core::tenancy::HookRegistry;
use warden_core::{DataSession, Repositories};
use warden_security::JwtService;
use warden_shared::config::TenancySettings;

const SECRET: &str = "integration-secret";
const PASSWORD: &str = "correct horse battery";

struct TestApp {
    router: Router,
    store: Arc<InMemoryStore>,
    jwt: JwtService,
    member_role: Role,
}

struct Account {
    token: String,
    user_id: Uuid,
    tenant_id: TenantId,
}

impl TestApp {
    async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert_role(Role::new(
                "tenant-admin",
                vec![
                    Permission::new("manage-organizations", Action::Manage, Subject::Organization),
                    Permission::new("read-any-users", Action::ReadAny, Subject::User),
                    Permission::new("read-own-tenant", Action::ReadOwn, Subject::Tenant),
                    Permission::new("read-any-roles", Action::ReadAny, Subject::Role),
                ],
            ))
            .await
            .unwrap();
        let member_role = store
            .insert_role(Role::new(
                "member",
                vec![
                    Permission::new("read-own-user", Action::ReadOwn, Subject::User),
                    Permission::new("read-any-organizations", Action::ReadAny, Subject::Organization),
                ],
            ))
            .await
            .unwrap();

        let tenancy = TenancySettings {
            root_domain: "example.com".to_string(),
            default_role: "tenant-admin".to_string(),
        };
        let state = AppState::new(
            Repositories::in_memory(store.clone()),
            JwtService::new(SECRET, 900, 3600),
            tenancy,
        );

        Self {
            router: build_router(state),
            store,
            jwt: JwtService::new(SECRET, 900, 3600),
            member_role,
        }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Registers a tenant with its first (admin) user.
    async fn register(&self, username: &str, tenant: &str) -> Account {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": PASSWORD,
                    "tenant": tenant,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let data = &body["data"];
        Account {
            token: data["access_token"].as_str().unwrap().to_string(),
            user_id: data["user"]["id"].as_str().unwrap().parse().unwrap(),
            tenant_id: TenantId::from_uuid(data["tenant"]["id"].as_str().unwrap().parse().unwrap()),
        }
    }

    /// Adds a user with the `member` role to an existing tenant.
    async fn member_of(&self, tenant_id: TenantId, username: &str) -> Account {
        let session = DataSession::open(
            Repositories::in_memory(self.store.clone()),
            Arc::new(HookRegistry::standard("example.com")),
        );
        let user = User::new(
            username.to_string(),
            format!("{}@example.com", username),
            "unused".to_string(),
            self.member_role.id,
            tenant_id,
        )
        .unwrap();
        let user = session.insert_user(user).await.unwrap();
        Account {
            token: self.jwt.generate_access_token(&user.id).unwrap(),
            user_id: user.id,
            tenant_id,
        }
    }

    async fn create_org(&self, account: &Account, name: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/organizations",
                Some(&account.token),
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["data"].clone()
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_register_normalizes_domain() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": PASSWORD,
                "tenant": "acme",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["tenant"]["domain"], "acme.example.com");
    assert_eq!(body["data"]["tenant"]["label"], "acme");
    assert_eq!(body["data"]["user"]["tenant_id"], body["data"]["tenant"]["id"]);
    assert!(body["data"]["user"].get("password_hash").is_none());
    assert_eq!(app.store.tenant_count().await, 1);
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_bad_labels() {
    let app = TestApp::new().await;
    app.register("alice", "acme").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "bob",
                "email": "bob@example.com",
                "password": PASSWORD,
                "tenant": "acme",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "DUPLICATE");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "carol",
                "email": "carol@example.com",
                "password": PASSWORD,
                "tenant": "-bad-",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.tenant_count().await, 1);
}

#[tokio::test]
async fn test_login_and_refresh() {
    let app = TestApp::new().await;
    app.register("alice", "acme").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "login": "alice", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let refresh_token = body["data"]["refresh_token"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "login": "alice", "password": "wrong password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["data"]["access_token"].as_str().unwrap();

    let (status, _) = app.send(Method::GET, "/api/v1/users/me", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);

    // a refresh token is not a bearer credential
    let (status, _) = app
        .send(Method::GET, "/api/v1/users/me", Some(&refresh_token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_scoped_routes_require_credentials() {
    let app = TestApp::new().await;
    for uri in ["/api/v1/users/me", "/api/v1/organizations", "/api/v1/tenant"] {
        let (status, body) = app.send(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["error"]["code"], "UNAUTHENTICATED");

        let (status, _) = app.send(Method::GET, uri, Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[tokio::test]
async fn test_skip_tenant_route_requires_credentials_but_not_filter() {
    let app = TestApp::new().await;
    let admin = app.register("alice", "acme").await;

    let (status, _) = app.send(Method::GET, "/api/v1/roles", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.send(Method::GET, "/api/v1/roles", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["member", "tenant-admin"]);

    // members lack read-any Role
    let member = app.member_of(admin.tenant_id, "bob").await;
    let (status, _) = app.send(Method::GET, "/api/v1/roles", Some(&member.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_context_tenant_matches_principal() {
    let app = TestApp::new().await;
    let admin = app.register("alice", "acme").await;

    let (status, body) = app.send(Method::GET, "/api/v1/tenant", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], admin.tenant_id.to_string());
    assert_eq!(body["data"]["domain"], "acme.example.com");

    let (_, me) = app.send(Method::GET, "/api/v1/users/me", Some(&admin.token), None).await;
    assert_eq!(me["data"]["tenant_id"], admin.tenant_id.to_string());
    assert_eq!(me["data"]["id"], admin.user_id.to_string());
}

#[tokio::test]
async fn test_created_organization_gets_requester_tenant() {
    let app = TestApp::new().await;
    let a = app.register("alice", "acme").await;
    let b = app.register("bob", "globex").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/organizations",
            Some(&a.token),
            Some(json!({ "name": "Research", "tenant_id": b.tenant_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["tenant_id"], a.tenant_id.to_string());

    let (_, listed) = app.send(Method::GET, "/api/v1/organizations", Some(&b.token), None).await;
    assert!(listed["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cross_tenant_access_is_absence() {
    let app = TestApp::new().await;
    let a = app.register("alice", "acme").await;
    let b = app.register("bob", "globex").await;

    let own = app.create_org(&a, "Alpha").await;
    let foreign = app.create_org(&b, "Beta").await;
    let foreign_uri = format!("/api/v1/organizations/{}", foreign["id"].as_str().unwrap());

    let (status, body) = app.send(Method::GET, &foreign_uri, Some(&a.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = app
        .send(Method::PATCH, &foreign_uri, Some(&a.token), Some(json!({ "name": "Taken" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::DELETE, &foreign_uri, Some(&a.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // same outcome as an id that never existed
    let missing = format!("/api/v1/organizations/{}", Uuid::new_v4());
    let (status, _) = app.send(Method::GET, &missing, Some(&a.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = app.send(Method::GET, "/api/v1/organizations", Some(&a.token), None).await;
    let listed = listed["data"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], own["id"]);

    let (status, body) = app.send(Method::GET, &foreign_uri, Some(&b.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Beta");

    // users follow the same rule
    let (status, _) = app
        .send(Method::GET, &format!("/api/v1/users/{}", b.user_id), Some(&a.token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_organization_lifecycle_within_tenant() {
    let app = TestApp::new().await;
    let a = app.register("alice", "acme").await;
    let org = app.create_org(&a, "Alpha").await;
    let uri = format!("/api/v1/organizations/{}", org["id"].as_str().unwrap());

    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&a.token), Some(json!({ "description": "Core team" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "Core team");
    assert_eq!(body["data"]["tenant_id"], a.tenant_id.to_string());

    let (status, _) = app.send(Method::DELETE, &uri, Some(&a.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send(Method::GET, &uri, Some(&a.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_read_own_user_only() {
    let app = TestApp::new().await;
    let admin = app.register("alice", "acme").await;
    let member = app.member_of(admin.tenant_id, "bob").await;

    let (status, body) = app
        .send(Method::GET, &format!("/api/v1/users/{}", member.user_id), Some(&member.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "bob");

    let (status, body) = app
        .send(Method::GET, &format!("/api/v1/users/{}", admin.user_id), Some(&member.token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, _) = app.send(Method::GET, "/api/v1/users", Some(&member.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // read-any reaches every user of the own tenant
    let (status, body) = app.send(Method::GET, "/api/v1/users", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_member_cannot_write_organizations() {
    let app = TestApp::new().await;
    let admin = app.register("alice", "acme").await;
    let member = app.member_of(admin.tenant_id, "bob").await;
    let org = app.create_org(&admin, "Alpha").await;

    let (status, _) = app
        .send(Method::POST, "/api/v1/organizations", Some(&member.token), Some(json!({ "name": "Nope" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/api/v1/organizations/{}", org["id"].as_str().unwrap());
    let (status, _) = app.send(Method::DELETE, &uri, Some(&member.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(Method::GET, &uri, Some(&member.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.organization_count().await, 1);
}

#[tokio::test]
async fn test_token_of_removed_tenant_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.register("alice", "acme").await;

    let session = DataSession::open(
        Repositories::in_memory(app.store.clone()),
        Arc::new(HookRegistry::standard("example.com")),
    );
    assert!(session.delete_tenant(&admin.tenant_id).await.unwrap());

    let (status, _) = app.send(Method::GET, "/api/v1/users/me", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_concurrent_requests_keep_their_tenant() {
    let app = Arc::new(TestApp::new().await);
    let a = app.register("alice", "acme").await;
    let b = app.register("bob", "globex").await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let app = app.clone();
        let (token, tenant_id) = if i % 2 == 0 {
            (a.token.clone(), a.tenant_id)
        } else {
            (b.token.clone(), b.tenant_id)
        };
        handles.push(tokio::spawn(async move {
            let (status, body) = app
                .send(
                    Method::POST,
                    "/api/v1/organizations",
                    Some(&token),
                    Some(json!({ "name": format!("org-{}", i) })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["data"]["tenant_id"], tenant_id.to_string());
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let (_, listed) = app.send(Method::GET, "/api/v1/organizations", Some(&a.token), None).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 10);
}
