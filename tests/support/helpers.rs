// tests/support/helpers.rs
use super::memory::MemoryStore;
use super::mocks::{PlainPasswordHasher, RecordingMediaFiles, StaticTokenManager, TestClock};
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use serde_json::Value;
use starlite_blog::application::services::{ApplicationDependencies, ApplicationServices};
use starlite_blog::domain::slug::SlugRegistry;
use starlite_blog::infrastructure::util::DefaultSlugGenerator;
use starlite_blog::presentation::http::{routes::build_router, state::HttpState};
use std::sync::Arc;
use tower::util::ServiceExt as _;

/// Services wired to one shared in-memory store.
pub struct TestApp {
    pub store: MemoryStore,
    pub clock: Arc<TestClock>,
    pub files: Arc<RecordingMediaFiles>,
    pub services: Arc<ApplicationServices>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        Self::with_slug_registry(store.clone(), Arc::new(store))
    }

    /// Swaps the slug availability check while keeping the store's own
    /// unique-slug enforcement on writes.
    pub fn with_slug_registry(store: MemoryStore, slug_registry: Arc<dyn SlugRegistry>) -> Self {
        let clock = Arc::new(TestClock::default());
        let files = Arc::new(RecordingMediaFiles::default());
        let services = Arc::new(ApplicationServices::new(ApplicationDependencies {
            users: Arc::new(store.clone()),
            post_writes: Arc::new(store.clone()),
            post_reads: Arc::new(store.clone()),
            post_links: Arc::new(store.clone()),
            categories: Arc::new(store.clone()),
            tags: Arc::new(store.clone()),
            slug_registry,
            newsletter: Arc::new(store.clone()),
            analytics: Arc::new(store.clone()),
            media: Arc::new(store.clone()),
            media_files: files.clone(),
            password_hasher: Arc::new(PlainPasswordHasher),
            token_manager: Arc::new(StaticTokenManager),
            clock: clock.clone(),
            slugger: Arc::new(DefaultSlugGenerator),
        }));

        Self {
            store,
            clock,
            files,
            services,
        }
    }

    pub fn router(&self) -> axum::Router {
        let state = HttpState::new(Arc::clone(&self.services));
        build_router(state, &["http://localhost:3000".to_string()])
    }
}

pub fn make_test_router() -> axum::Router {
    TestApp::new().router()
}

pub async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn json_body(resp: Response) -> Value {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Asserts the `{ error, message }` error envelope.
pub async fn assert_error_response(resp: Response, expected_status: StatusCode, expected_error: &str) {
    assert_eq!(resp.status(), expected_status);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(
        content_type.starts_with("application/json"),
        "unexpected content-type: {content_type}"
    );
    let json = json_body(resp).await;
    assert_eq!(json["error"].as_str(), Some(expected_error));
    assert!(
        json["message"].as_str().is_some_and(|m| !m.is_empty()),
        "expected a non-empty message"
    );
}
