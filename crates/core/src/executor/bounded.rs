//! Executor with per-step timeout and bounded retries.

use std::future::Future;
use std::time::Instant;

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::metrics::{self, STEP_RETRIES};

use super::{ExecutorConfig, Step, StepError, StepExecutor};

/// Runs each attempt under a timeout and retries transient failures.
#[derive(Debug, Clone)]
pub struct BoundedExecutor {
    config: ExecutorConfig,
}

impl BoundedExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }
}

impl Default for BoundedExecutor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

impl StepExecutor for BoundedExecutor {
    fn name(&self) -> &str {
        "bounded"
    }

    async fn execute<T, F, Fut>(&self, step: Step, op: F) -> Result<T, StepError>
    where
        T: Send,
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, StepError>> + Send,
    {
        let step_timeout = self.config.step_timeout();
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let start = Instant::now();
            let result = match timeout(step_timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(StepError::Timeout {
                    step,
                    after: step_timeout,
                }),
            };
            metrics::record_step(step, start.elapsed(), &result);

            match result {
                Ok(value) => {
                    debug!(
                        step = %step,
                        attempt,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Step completed"
                    );
                    return Ok(value);
                }
                Err(e) if attempt < max_attempts && e.is_retryable() => {
                    let backoff = self.config.backoff_for(attempt);
                    warn!(
                        step = %step,
                        attempt,
                        max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        "Step failed, retrying: {}",
                        e
                    );
                    STEP_RETRIES.with_label_values(&[step.as_str()]).inc();
                    sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
