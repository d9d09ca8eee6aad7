//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::{connect_info::MockConnectInfo, ConnectInfo},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use murmur_server::{
    config::ServerConfig,
    create_router,
    services::{CsrfService, SessionId},
    state::{AppState, RateLimits},
};
use murmur_storage::Database;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Address every request comes from unless a test says otherwise
pub const DEFAULT_CLIENT: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 40000);

/// Create a test database with migrations applied
///
/// Backed by a file in a temp dir: every pooled connection must see the same
/// database, which rules out `:memory:`.
pub async fn create_test_database() -> anyhow::Result<(Arc<Database>, TempDir)> {
    let dir = TempDir::new()?;
    let url = format!("sqlite://{}", dir.path().join("test.db").display());

    let pool = murmur_storage::create_pool(&url).await?;
    murmur_storage::run_migrations(&pool).await?;

    Ok((Arc::new(Database::new(pool)), dir))
}

pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.security.secret_key = Some(TEST_SECRET.to_string());
    config.server.static_dir = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static"));
    config
}

/// A router wired exactly like the real server, over a throwaway database
pub struct TestApp {
    pub router: Router,
    pub db: Arc<Database>,
    pub csrf: Arc<CsrfService>,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: ServerConfig) -> Self {
        let (db, dir) = create_test_database().await.unwrap();

        let secret = config.resolve_secret_key().unwrap();
        let csrf = Arc::new(CsrfService::new(
            &secret,
            config.security.csrf_token_ttl_secs,
        ));
        let limits = RateLimits::from_settings(&config.rate_limit);

        let app_state = AppState::new(
            Arc::clone(&db),
            Arc::clone(&csrf),
            limits,
            config.uploads.max_content_length,
        );
        let router = create_router(app_state, &config).layer(MockConnectInfo(DEFAULT_CLIENT));

        Self {
            router,
            db,
            csrf,
            _dir: dir,
        }
    }

    /// A fresh session and a token bound to it
    pub fn session(&self) -> Session {
        let id = SessionId::generate();
        let token = self.csrf.issue_token(&id).unwrap();
        Session { id, token }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        }
    }

    /// POST /api/comments as a urlencoded form with the token in a header
    pub async fn submit(&self, session: &Session, text: &str) -> TestResponse {
        self.send(submit_request(session, text)).await
    }

    /// POST /api/comments/:id/like with the token in a header
    pub async fn like(&self, session: &Session, id: impl std::fmt::Display) -> TestResponse {
        self.send(like_request(session, id)).await
    }
}

pub struct Session {
    pub id: SessionId,
    pub token: String,
}

impl Session {
    pub fn cookie(&self) -> String {
        format!("murmur_session={}", self.id)
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("response is not JSON ({}): {}", e, self.body))
    }
}

pub fn form_body(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}

pub fn submit_request(session: &Session, text: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/comments")
        .header(header::COOKIE, session.cookie())
        .header("X-CSRFToken", &session.token)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form_body(&[("text", text)])))
        .unwrap()
}

pub fn like_request(session: &Session, id: impl std::fmt::Display) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/comments/{}/like", id))
        .header(header::COOKIE, session.cookie())
        .header("X-CSRFToken", &session.token)
        .body(Body::empty())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Make a request appear to come from another client address
pub fn from_client(mut request: Request<Body>, ip: [u8; 4]) -> Request<Body> {
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((ip, 40000))));
    request
}
