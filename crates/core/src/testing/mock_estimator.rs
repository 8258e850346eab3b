//! Mock duration estimator for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::estimator::{DurationEstimator, EstimateError};

/// A recorded estimate request for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEstimate {
    pub origin: String,
    pub destination: String,
}

/// Mock implementation of the DurationEstimator trait.
///
/// Returns a configurable duration, records every request, and can fail
/// once per queued error or on every call.
#[derive(Debug)]
pub struct MockDurationEstimator {
    duration_seconds: Arc<RwLock<i64>>,
    calls: Arc<RwLock<Vec<RecordedEstimate>>>,
    queued_errors: Arc<RwLock<VecDeque<EstimateError>>>,
    fail_always: Arc<RwLock<bool>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockDurationEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDurationEstimator {
    /// Create a mock that estimates 1000 seconds for every route.
    pub fn new() -> Self {
        Self::with_duration(1000)
    }

    /// Create a mock that estimates `seconds` for every route.
    pub fn with_duration(seconds: i64) -> Self {
        Self {
            duration_seconds: Arc::new(RwLock::new(seconds)),
            calls: Arc::new(RwLock::new(Vec::new())),
            queued_errors: Arc::new(RwLock::new(VecDeque::new())),
            fail_always: Arc::new(RwLock::new(false)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a mock whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail_always: Arc::new(RwLock::new(true)),
            ..Self::new()
        }
    }

    pub async fn set_duration(&self, seconds: i64) {
        *self.duration_seconds.write().await = seconds;
    }

    /// Queue an error for the next call. Queued errors are returned in order.
    pub async fn set_next_error(&self, error: EstimateError) {
        self.queued_errors.write().await.push_back(error);
    }

    /// Make every call fail with `DurationUnavailable`.
    pub async fn set_fail_always(&self, fail: bool) {
        *self.fail_always.write().await = fail;
    }

    /// Sleep this long before answering.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write().await = delay;
    }

    pub async fn recorded_calls(&self) -> Vec<RecordedEstimate> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl DurationEstimator for MockDurationEstimator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn estimate_duration(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<i64, EstimateError> {
        self.calls.write().await.push(RecordedEstimate {
            origin: origin.to_string(),
            destination: destination.to_string(),
        });

        if let Some(delay) = *self.delay.read().await {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.queued_errors.write().await.pop_front() {
            return Err(error);
        }
        if *self.fail_always.read().await {
            return Err(EstimateError::DurationUnavailable);
        }

        Ok(*self.duration_seconds.read().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_configured_duration() {
        let estimator = MockDurationEstimator::with_duration(1400);
        assert_eq!(estimator.estimate_duration("a", "b").await.unwrap(), 1400);

        let calls = estimator.recorded_calls().await;
        assert_eq!(
            calls,
            vec![RecordedEstimate {
                origin: "a".to_string(),
                destination: "b".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_queued_error_is_returned_once() {
        let estimator = MockDurationEstimator::new();
        estimator.set_next_error(EstimateError::Timeout).await;

        assert!(matches!(
            estimator.estimate_duration("a", "b").await,
            Err(EstimateError::Timeout)
        ));
        assert!(estimator.estimate_duration("a", "b").await.is_ok());
        assert_eq!(estimator.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_fail_always() {
        let estimator = MockDurationEstimator::new();
        estimator.set_fail_always(true).await;
        for _ in 0..2 {
            assert!(matches!(
                estimator.estimate_duration("a", "b").await,
                Err(EstimateError::DurationUnavailable)
            ));
        }
    }
}
