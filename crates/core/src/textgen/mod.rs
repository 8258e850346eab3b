//! Notification text generation.
//!
//! Text is produced by an LLM when one is configured, with deterministic
//! templates as the fallback:
//!
//! ```text
//! ┌──────────────┐   ok    ┌──────────────┐
//! │  LlmClient   │ ──────▶ │ message text │
//! └──────────────┘         └──────────────┘
//!        │ error                  ▲
//!        ▼                        │
//! ┌──────────────────┐            │
//! │ TemplateRenderer │ ───────────┘
//! └──────────────────┘
//! ```

mod config;
mod llm;
pub mod prompts;
mod templates;

pub use config::{LlmConfig, LlmProvider};
pub use llm::{
    create_llm_client, CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage,
    OllamaClient, OpenAiClient,
};
pub use templates::TemplateRenderer;
