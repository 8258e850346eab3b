//! Step execution substrate.
//!
//! Every external call made while checking an order runs as a named `Step`
//! through a `StepExecutor`. The executor owns timeout and retry policy; the
//! notifier itself never retries.
//!
//! - `DirectExecutor` awaits the step once, with no timeout.
//! - `BoundedExecutor` bounds each attempt with a timeout and retries
//!   transient failures with exponential backoff.

mod bounded;
mod config;

pub use bounded::BoundedExecutor;
pub use config::ExecutorConfig;

use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::estimator::EstimateError;
use crate::textgen::LlmError;
use crate::transport::TransportError;

/// External steps of a delay check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    EstimateDuration,
    GenerateSmsText,
    GenerateEmailText,
    SendSms,
    SendEmail,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::EstimateDuration => "estimate_duration",
            Step::GenerateSmsText => "generate_sms_text",
            Step::GenerateEmailText => "generate_email_text",
            Step::SendSms => "send_sms",
            Step::SendEmail => "send_email",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single step.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Estimate(#[from] EstimateError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Step '{step}' timed out after {after:?}")]
    Timeout { step: Step, after: Duration },
}

impl StepError {
    /// Whether the executor may run the step again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Estimate(e) => e.is_retryable(),
            Self::Llm(e) => e.is_retryable(),
            Self::Transport(e) => e.is_retryable(),
            Self::Timeout { .. } => true,
        }
    }
}

/// Runs steps with the substrate's timeout and retry policy.
///
/// `op` may be invoked more than once, so it must build a fresh future on
/// every call.
pub trait StepExecutor: Send + Sync + 'static {
    /// Executor name for logging.
    fn name(&self) -> &str;

    fn execute<T, F, Fut>(
        &self,
        step: Step,
        op: F,
    ) -> impl Future<Output = Result<T, StepError>> + Send
    where
        T: Send,
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, StepError>> + Send;
}

/// Executes each step exactly once, without a timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectExecutor;

impl StepExecutor for DirectExecutor {
    fn name(&self) -> &str {
        "direct"
    }

    async fn execute<T, F, Fut>(&self, step: Step, op: F) -> Result<T, StepError>
    where
        T: Send,
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, StepError>> + Send,
    {
        let start = Instant::now();
        let result = op().await;
        crate::metrics::record_step(step, start.elapsed(), &result);
        result
    }
}
