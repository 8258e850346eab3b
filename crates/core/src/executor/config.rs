//! Step executor configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout and retry policy applied to every external step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Upper bound for a single attempt of a step (seconds).
    #[serde(default = "default_step_timeout")]
    pub step_timeout_secs: u64,

    /// Attempts per step, including the first one.
    /// 1 disables retries.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (milliseconds), doubled on each further retry.
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

fn default_step_timeout() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    1
}

fn default_retry_backoff() -> u64 {
    500
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            step_timeout_secs: default_step_timeout(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

impl ExecutorConfig {
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }

    /// Backoff before retry number `retry` (1-based).
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 1u64 << retry.saturating_sub(1).min(16);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }
}
