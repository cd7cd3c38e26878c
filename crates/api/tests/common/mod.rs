#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get as get_route};
use axum::{Json, Router};
use flowgate_core::workflow::{HttpMethod, Platform, TemplateName, ValidatedWorkflow};
use flowgate_db::models::workflow::{CreateWorkflow, Workflow};
use flowgate_db::repositories::WorkflowRepo;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use flowgate_api::auth::jwt::{Claims, JwtConfig};
use flowgate_api::config::{EngineConfig, ServerConfig};
use flowgate_api::router::build_app_router;
use flowgate_api::state::AppState;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and a short engine timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 60,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
        engine: EngineConfig {
            execution_timeout_secs: 5,
        },
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        http: reqwest::Client::new(),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

fn sign(did: &str, exp_offset_secs: i64, secret: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        did: did.to_string(),
        username: Some(format!("user-{did}")),
        exp: now + exp_offset_secs,
        iat: Some(now),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("encoding should succeed")
}

/// A valid token for `did`, expiring in ten minutes.
pub fn token(did: &str) -> String {
    sign(did, 600, TEST_SECRET)
}

/// A correctly signed token that expired five minutes ago.
pub fn expired_token(did: &str) -> String {
    sign(did, -300, TEST_SECRET)
}

/// A correctly signed token that expired a few seconds ago.
pub fn just_expired_token(did: &str) -> String {
    sign(did, -5, TEST_SECRET)
}

/// A live token signed with the wrong secret.
pub fn foreign_token(did: &str) -> String {
    sign(did, 600, "some-other-secret")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Send one request through the app. `body` is serialized as JSON when given.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// Send a request with a raw body and an arbitrary `Authorization` value.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: &str,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_owned())).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert an error envelope and return its message.
pub async fn expect_error(response: Response, status: StatusCode) -> String {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    json["error"].as_str().unwrap().to_string()
}

/// Assert a success envelope and return its `data`.
pub async fn expect_data(response: Response) -> Value {
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    json["data"].clone()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn add_member(pool: &PgPool, user_did: &str, project_id: &str, role: &str) {
    sqlx::query("INSERT INTO user_projects (user_did, project_id, role) VALUES ($1, $2, $3)")
        .bind(user_did)
        .bind(project_id)
        .bind(role)
        .execute(pool)
        .await
        .expect("membership insert should succeed");
}

/// A create-request body for the HTTP API.
pub fn create_body(project_id: &str, name: &str) -> Value {
    json!({
        "workflow_name": name,
        "description": "Summarize a document",
        "source": "n8n",
        "template_name": "workflow",
        "http_method": "POST",
        "base_url": "https://n8n.example.test/webhook/summarize",
        "bearer_token": "n8n-secret",
        "external_workflow_id": "ext-summarize",
        "parameters": { "lang": "en" },
        "headers": { "X-Team": "docs" },
        "project_id": project_id
    })
}

/// Insert a workflow directly through the repository.
pub async fn seed_workflow(
    pool: &PgPool,
    project_id: &str,
    creator: &str,
    source: Platform,
    base_url: &str,
) -> Workflow {
    let input = CreateWorkflow {
        fields: ValidatedWorkflow {
            workflow_name: format!("{source} workflow"),
            description: "seeded".to_string(),
            source,
            template_name: TemplateName::Workflow,
            http_method: HttpMethod::Post,
            base_url: base_url.to_string(),
            bearer_token: "stored-token".to_string(),
            external_workflow_id: "wf-1".to_string(),
            parameters: json!({ "a": 1 }),
            headers: json!({}),
            project_id: project_id.to_string(),
        },
        creator_did: creator.to_string(),
    };
    WorkflowRepo::create(pool, &input)
        .await
        .expect("workflow seed should succeed")
}

// ---------------------------------------------------------------------------
// Stand-in third-party platform
// ---------------------------------------------------------------------------

/// Echoes what it received: method, selected headers and the JSON body.
async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(json!({
        "method": method.as_str(),
        "authorization": header("authorization"),
        "content_type": header("content-type"),
        "x_custom": header("x-custom"),
        "body": serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null),
    }))
}

async fn text() -> &'static str {
    "plain text reply"
}

async fn fail() -> Response {
    (StatusCode::BAD_GATEWAY, Json(json!({ "error": "upstream down" }))).into_response()
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(10)).await;
    "too late"
}

/// Start the stand-in platform on an ephemeral port and return its address.
pub async fn spawn_upstream() -> SocketAddr {
    let router = Router::new()
        .route("/echo", any(echo))
        .route("/text", get_route(text).post(text))
        .route("/fail", any(fail))
        .route("/slow", any(slow));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
