//! Mock LLM client for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::textgen::{CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage};

/// Mock implementation of the LlmClient trait.
///
/// Echoes a fixed response (or a per-prompt handler's output) and records
/// every prompt it receives.
///
/// # Example
///
/// ```rust,ignore
/// let llm = MockLlmClient::with_response("Your order is late, sorry!");
/// llm.set_next_error(LlmError::Timeout(Duration::from_secs(30))).await;
/// ```
pub struct MockLlmClient {
    response: Arc<RwLock<String>>,
    prompts: Arc<RwLock<Vec<CompletionRequest>>>,
    queued_errors: Arc<RwLock<VecDeque<LlmError>>>,
    fail_always: Arc<RwLock<bool>>,
    handler: Arc<RwLock<Option<PromptHandler>>>,
}

/// Produces a response text from the prompt.
type PromptHandler = Box<dyn Fn(&str) -> String + Send + Sync>;

impl std::fmt::Debug for MockLlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLlmClient")
            .field("response", &self.response)
            .field("prompts", &"<prompts>")
            .field("handler", &"<handler>")
            .finish()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::with_response("Generated notification")
    }

    pub fn with_response(text: impl Into<String>) -> Self {
        Self {
            response: Arc::new(RwLock::new(text.into())),
            prompts: Arc::new(RwLock::new(Vec::new())),
            queued_errors: Arc::new(RwLock::new(VecDeque::new())),
            fail_always: Arc::new(RwLock::new(false)),
            handler: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a mock whose every completion fails.
    pub fn failing() -> Self {
        Self {
            fail_always: Arc::new(RwLock::new(true)),
            ..Self::new()
        }
    }

    pub async fn set_response(&self, text: impl Into<String>) {
        *self.response.write().await = text.into();
    }

    /// Build responses from the prompt instead of the fixed text.
    pub async fn set_handler<F>(&self, handler: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        *self.handler.write().await = Some(Box::new(handler));
    }

    /// Queue an error for the next completion.
    pub async fn set_next_error(&self, error: LlmError) {
        self.queued_errors.write().await.push_back(error);
    }

    /// Make every completion fail with an API error.
    pub async fn set_fail_always(&self, fail: bool) {
        *self.fail_always.write().await = fail;
    }

    pub async fn recorded_prompts(&self) -> Vec<String> {
        self.prompts
            .read()
            .await
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }

    pub async fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.prompts.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.prompts.read().await.len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.prompts.write().await.push(request.clone());

        if let Some(error) = self.queued_errors.write().await.pop_front() {
            return Err(error);
        }
        if *self.fail_always.read().await {
            return Err(LlmError::Api {
                status: 400,
                message: "mock failure".to_string(),
            });
        }

        let text = match self.handler.read().await.as_ref() {
            Some(handler) => handler(&request.prompt),
            None => self.response.read().await.clone(),
        };

        Ok(CompletionResponse {
            usage: LlmUsage {
                input_tokens: request.prompt.split_whitespace().count() as u32,
                output_tokens: text.split_whitespace().count() as u32,
            },
            text,
            model: self.model().to_string(),
        })
    }
}
