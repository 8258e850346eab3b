//! LLM configuration types.

use serde::{Deserialize, Serialize};

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    /// OpenAI Responses API.
    OpenAi,
    /// Local Ollama instance.
    Ollama,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "open_ai",
            LlmProvider::Ollama => "ollama",
        }
    }

    pub(crate) fn default_api_base(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "https://api.openai.com",
            LlmProvider::Ollama => "http://localhost:11434",
        }
    }
}

/// LLM client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider.
    pub provider: LlmProvider,
    /// Model name/identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key (required for OpenAI).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom API base URL (for proxies or self-hosted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Maximum tokens for completions.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_max_tokens() -> u32 {
    512
}

impl LlmConfig {
    /// API base URL, falling back to the provider default.
    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_base())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("llm.model cannot be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("llm.timeout_secs must be greater than 0".to_string());
        }
        if self.max_tokens == 0 {
            return Err("llm.max_tokens must be greater than 0".to_string());
        }
        if self.provider == LlmProvider::OpenAi
            && self.api_key.as_deref().map_or(true, str::is_empty)
        {
            return Err("llm.api_key is required for the open_ai provider".to_string());
        }
        Ok(())
    }
}
