//! Mock notification transports for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::transport::{EmailTransport, SmsTransport, TransportError};

/// A recorded email for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// A recorded SMS for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub to: String,
    pub body: String,
}

/// Shared failure controls for both mock transports.
#[derive(Debug, Default)]
struct FailureControl {
    queued_errors: RwLock<VecDeque<TransportError>>,
    fail_always: RwLock<bool>,
    panic_on_send: RwLock<bool>,
}

impl FailureControl {
    async fn check(&self, transport: &str) -> Result<(), TransportError> {
        if *self.panic_on_send.read().await {
            panic!("mock {} transport panicked", transport);
        }
        if let Some(error) = self.queued_errors.write().await.pop_front() {
            return Err(error);
        }
        if *self.fail_always.read().await {
            return Err(TransportError::Api {
                transport: transport.to_string(),
                status: 400,
                message: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Mock implementation of the EmailTransport trait.
#[derive(Debug, Default)]
pub struct MockEmailTransport {
    sent: Arc<RwLock<Vec<SentEmail>>>,
    attempts: Arc<RwLock<usize>>,
    failures: Arc<FailureControl>,
}

impl MockEmailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an error for the next send.
    pub async fn set_next_error(&self, error: TransportError) {
        self.failures.queued_errors.write().await.push_back(error);
    }

    /// Make every send fail with an API error.
    pub async fn set_fail_always(&self, fail: bool) {
        *self.failures.fail_always.write().await = fail;
    }

    /// Panic inside `send_email`, for exercising task failure handling.
    pub async fn set_panic_on_send(&self, panic: bool) {
        *self.failures.panic_on_send.write().await = panic;
    }

    /// Successfully delivered emails.
    pub async fn sent_emails(&self) -> Vec<SentEmail> {
        self.sent.read().await.clone()
    }

    /// Send attempts, including failed ones.
    pub async fn attempt_count(&self) -> usize {
        *self.attempts.read().await
    }
}

#[async_trait]
impl EmailTransport for MockEmailTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError> {
        *self.attempts.write().await += 1;
        self.failures.check("email").await?;
        self.sent.write().await.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Mock implementation of the SmsTransport trait.
#[derive(Debug, Default)]
pub struct MockSmsTransport {
    sent: Arc<RwLock<Vec<SentSms>>>,
    attempts: Arc<RwLock<usize>>,
    failures: Arc<FailureControl>,
}

impl MockSmsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an error for the next send.
    pub async fn set_next_error(&self, error: TransportError) {
        self.failures.queued_errors.write().await.push_back(error);
    }

    /// Make every send fail with an API error.
    pub async fn set_fail_always(&self, fail: bool) {
        *self.failures.fail_always.write().await = fail;
    }

    /// Panic inside `send_sms`, for exercising task failure handling.
    pub async fn set_panic_on_send(&self, panic: bool) {
        *self.failures.panic_on_send.write().await = panic;
    }

    /// Successfully delivered messages.
    pub async fn sent_messages(&self) -> Vec<SentSms> {
        self.sent.read().await.clone()
    }

    /// Send attempts, including failed ones.
    pub async fn attempt_count(&self) -> usize {
        *self.attempts.read().await
    }
}

#[async_trait]
impl SmsTransport for MockSmsTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_sms(&self, to: &str, body: &str) -> Result<(), TransportError> {
        *self.attempts.write().await += 1;
        self.failures.check("sms").await?;
        self.sent.write().await.push(SentSms {
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
