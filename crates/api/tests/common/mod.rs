#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use hrdocs_api::auth::jwt::{generate_access_token, JwtConfig};
use hrdocs_api::auth::password::hash_password;
use hrdocs_api::config::ServerConfig;
use hrdocs_api::routes;
use hrdocs_api::state::AppState;
use hrdocs_core::salary::DEFAULT_SALARY_STRUCTURE;
use hrdocs_db::models::hr_admin::{CreateHrAdmin, HrAdmin};
use hrdocs_db::repositories::HrAdminRepo;
use hrdocs_events::{EmailError, Notifier, OutboundEmail};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults. No attachments are
/// mandatory so JSON-only section saves succeed.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        draft_id_salt: "test-salt".to_string(),
        field_encryption_key: "test-field-encryption-key".to_string(),
        salary_structure: DEFAULT_SALARY_STRUCTURE.to_string(),
        mandatory_attachments: String::new(),
        company_name: "Acme Corp".to_string(),
        company_address: "1 Test Road, Bengaluru".to_string(),
    }
}

/// Notifier that keeps every e-mail in memory.
#[derive(Clone, Default)]
pub struct Outbox(Arc<Mutex<Vec<OutboundEmail>>>);

impl Outbox {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.0.lock().unwrap().clone()
    }

    /// Wait for the background dispatch task to deliver `count` e-mails.
    pub async fn wait_for(&self, count: usize) -> Vec<OutboundEmail> {
        for _ in 0..100 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {count} e-mail(s), got {}", self.sent().len());
    }
}

#[async_trait]
impl Notifier for Outbox {
    async fn send(&self, email: OutboundEmail) -> Result<(), EmailError> {
        self.0.lock().unwrap().push(email);
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "test"
    }
}

/// Build the full application router with all middleware layers.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), Outbox::default())
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig, outbox: Outbox) -> Router {
    let max_upload_bytes = config.max_upload_bytes;
    let state = AppState::new(pool, config, Arc::new(outbox)).expect("valid test state");

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert an admin directly and return it with a valid bearer token.
pub async fn seed_admin(pool: &PgPool, email: &str, role: &str) -> (HrAdmin, String) {
    let admin = HrAdminRepo::create(
        pool,
        &CreateHrAdmin {
            first_name: "Test".to_string(),
            last_name: "Admin".to_string(),
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role: role.to_string(),
        },
    )
    .await
    .expect("admin creation should succeed");
    let token = generate_access_token(admin.id, &admin.role, &test_config().jwt)
        .expect("token generation should succeed");
    (admin, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

/// One file part of a multipart request.
pub struct FilePart<'a> {
    pub slot: &'a str,
    pub file_name: &'a str,
    pub mime_type: &'a str,
    pub content: &'a [u8],
}

const BOUNDARY: &str = "hrdocs-test-boundary";

/// POST a `multipart/form-data` body with a `data` JSON part and files.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    data: serde_json::Value,
    files: &[FilePart<'_>],
    token: &str,
) -> Response<Body> {
    let mut body: Vec<u8> = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"data\"\r\n\
             Content-Type: application/json\r\n\r\n{data}\r\n"
        )
        .as_bytes(),
    );
    for file in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: {}\r\n\r\n",
                file.slot, file.file_name, file.mime_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("response body should be JSON")
}
