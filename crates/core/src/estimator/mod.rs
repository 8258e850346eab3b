//! Travel duration estimation.
//!
//! This module provides a `DurationEstimator` trait for asking a routing
//! backend how long a delivery route takes in current traffic.

mod google;

pub use google::GoogleRoutesClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while estimating a route duration.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("Routing request failed: {0}")]
    Http(String),

    #[error("Routing API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse routing response: {0}")]
    Parse(String),

    #[error("No response from computeRoutes")]
    NoRoutes,

    #[error("Could not estimate duration in traffic")]
    DurationUnavailable,

    #[error("Routing request timed out")]
    Timeout,
}

impl EstimateError {
    /// Whether a later attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Trait for route duration backends.
#[async_trait]
pub trait DurationEstimator: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Estimated travel duration in seconds from `origin` to `destination`.
    async fn estimate_duration(&self, origin: &str, destination: &str)
        -> Result<i64, EstimateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            EstimateError::NoRoutes.to_string(),
            "No response from computeRoutes"
        );
        assert_eq!(
            EstimateError::DurationUnavailable.to_string(),
            "Could not estimate duration in traffic"
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(EstimateError::Timeout.is_retryable());
        assert!(EstimateError::Http("reset".into()).is_retryable());
        assert!(EstimateError::Api {
            status: 503,
            message: "unavailable".into()
        }
        .is_retryable());
        assert!(!EstimateError::Api {
            status: 400,
            message: "bad address".into()
        }
        .is_retryable());
        assert!(!EstimateError::NoRoutes.is_retryable());
    }
}
