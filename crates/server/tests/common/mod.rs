//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock search and LLM backends injected, so every endpoint can be
//! exercised without network access.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use recruiter_core::{
    testing::{MockLlmClient, MockPeopleSearcher},
    Config, LlmClient, LlmConfig, PeopleSearcher, TodoClient,
};
use recruiter_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use recruiter_core::testing::fixtures;

/// Nothing listens here; demo calls fail with a transport error.
pub const UNREACHABLE_TODO_API: &str = "http://127.0.0.1:9";

/// Test fixture driving the router in-process.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_filter_builder() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/tools/filter_builder", json!({
///         "filter_type": "skills",
///         "skills": ["Rust"]
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock searcher - configure pages and failures
    pub searcher: Arc<MockPeopleSearcher>,
    /// Mock LLM - script model turns
    pub llm: Arc<MockLlmClient>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Inject the mock searcher
    pub with_searcher: bool,
    /// Inject the mock LLM
    pub with_llm: bool,
    /// Base URL of the demo Todo API
    pub todo_base_url: String,
    /// Application config (budget, llm limits)
    pub config: Config,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            with_searcher: true,
            with_llm: true,
            todo_base_url: UNREACHABLE_TODO_API.to_string(),
            config: Config {
                llm: Some(LlmConfig::default()),
                ..Default::default()
            },
        }
    }
}

impl TestConfig {
    /// No search API key and no LLM configured.
    pub fn without_backends() -> Self {
        Self {
            with_searcher: false,
            with_llm: false,
            ..Default::default()
        }
    }

    pub fn with_todo_api(base_url: impl Into<String>) -> Self {
        Self {
            todo_base_url: base_url.into(),
            ..Default::default()
        }
    }
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let searcher = Arc::new(MockPeopleSearcher::new());
        let llm = Arc::new(MockLlmClient::new());

        let todo = TodoClient::new(test_config.todo_base_url, Duration::from_secs(2))
            .expect("Failed to create Todo client");

        let state = Arc::new(AppState::new(
            test_config.config,
            test_config
                .with_searcher
                .then(|| Arc::clone(&searcher) as Arc<dyn PeopleSearcher>),
            test_config
                .with_llm
                .then(|| Arc::clone(&llm) as Arc<dyn LlmClient>),
            todo,
        ));

        Self {
            router: create_router(state),
            searcher,
            llm,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// GET returning the raw body text (for non-JSON endpoints).
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
