//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock collaborators injected, so checks can be exercised over HTTP
//! without routing, LLM, or messaging services.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use delaywatch_core::{
    load_config_from_str,
    testing::{MockDurationEstimator, MockEmailTransport, MockLlmClient, MockSmsTransport},
    BoundedExecutor, DelayNotifier,
};
use delaywatch_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
#[allow(unused_imports)]
pub use delaywatch_core::testing::fixtures;

const TEST_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8080

[routes]
api_key = "test-maps-key"

[executor]
step_timeout_secs = 5

[llm]
provider = "open_ai"
api_key = "sk-test-secret"

[sms]
account_sid = "AC-test"
auth_token = "test-auth-token"
"#;

/// Test fixture with a router wired to mock collaborators.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock estimator - configure the estimated duration or failures
    pub estimator: Arc<MockDurationEstimator>,
    /// Mock LLM - configure generated text or failures
    pub llm: Arc<MockLlmClient>,
    /// Mock email transport - inspect sent emails
    pub email: Arc<MockEmailTransport>,
    /// Mock SMS transport - inspect sent messages
    pub sms: Arc<MockSmsTransport>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture whose estimator answers `estimated_seconds`.
    pub fn new(estimated_seconds: i64) -> Self {
        let config = load_config_from_str(TEST_CONFIG).expect("Invalid test config");

        let estimator = Arc::new(MockDurationEstimator::with_duration(estimated_seconds));
        let llm = Arc::new(MockLlmClient::with_response("Your delivery is running late."));
        let email = Arc::new(MockEmailTransport::new());
        let sms = Arc::new(MockSmsTransport::new());

        let notifier = DelayNotifier::new(
            config.notifier.clone(),
            BoundedExecutor::new(config.executor.clone()),
            estimator.clone(),
        )
        .with_llm_client(llm.clone())
        .with_email_transport(email.clone())
        .with_sms_transport(sms.clone());

        let state = Arc::new(AppState::new(config, Arc::new(notifier)));
        let router = create_router(state);

        Self {
            router,
            estimator,
            llm,
            email,
            sms,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.post_raw(path, &serde_json::to_string(&body).unwrap())
            .await
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

    /// Send a request and return the status with the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
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
