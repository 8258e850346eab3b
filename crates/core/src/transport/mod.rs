//! Notification transports.
//!
//! This module provides `EmailTransport` and `SmsTransport` traits for
//! delivering composed messages, with SendGrid and Twilio implementations.

mod sendgrid;
mod twilio;

pub use sendgrid::SendGridClient;
pub use twilio::TwilioClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{transport} request failed: {message}")]
    Http { transport: String, message: String },

    #[error("{transport} API error: {status} - {message}")]
    Api {
        transport: String,
        status: u16,
        message: String,
    },

    #[error("{transport} request timed out")]
    Timeout { transport: String },

    #[error("{0} transport not configured")]
    NotConfigured(String),
}

impl TransportError {
    pub(crate) fn http(transport: &str, message: impl Into<String>) -> Self {
        Self::Http {
            transport: transport.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn from_reqwest(transport: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout {
                transport: transport.to_string(),
            }
        } else {
            Self::http(transport, e.to_string())
        }
    }

    /// Whether a later attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { .. } | Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::NotConfigured(_) => false,
        }
    }
}

/// Trait for email delivery backends.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Send a plain-text email.
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError>;
}

/// Trait for SMS delivery backends.
#[async_trait]
pub trait SmsTransport: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Send a text message to `to`.
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), TransportError>;
}
