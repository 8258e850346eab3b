//! SendGrid email transport.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::EmailConfig;

use super::{EmailTransport, TransportError};

const TRANSPORT: &str = "sendgrid";

/// Email transport backed by the SendGrid v3 mail API.
pub struct SendGridClient {
    client: Client,
    config: EmailConfig,
}

impl SendGridClient {
    pub fn new(config: EmailConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| TransportError::http(TRANSPORT, e.to_string()))?;

        Ok(Self { client, config })
    }

    fn build_message<'a>(&'a self, to: &'a str, subject: &'a str, body: &'a str) -> MailMessage<'a> {
        MailMessage {
            personalizations: vec![Personalization {
                to: vec![Address { email: to }],
            }],
            from: Address {
                email: &self.config.from_email,
            },
            subject,
            content: vec![Content {
                content_type: "text/plain",
                value: body,
            }],
            mail_settings: MailSettings {
                sandbox_mode: Toggle {
                    enable: self.config.sandbox_mode,
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct MailMessage<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
    mail_settings: MailSettings,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct MailSettings {
    sandbox_mode: Toggle,
}

#[derive(Debug, Serialize)]
struct Toggle {
    enable: bool,
}

#[derive(Debug, Deserialize)]
struct SendGridErrorResponse {
    #[serde(default)]
    errors: Vec<SendGridErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct SendGridErrorDetail {
    message: String,
}

#[async_trait]
impl EmailTransport for SendGridClient {
    fn name(&self) -> &str {
        TRANSPORT
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError> {
        let message = self.build_message(to, subject, body);
        debug!(to, subject, "Sending email via SendGrid");

        let response = self
            .client
            .post(format!(
                "{}/v3/mail/send",
                self.config.api_base.trim_end_matches('/')
            ))
            .bearer_auth(&self.config.api_key)
            .json(&message)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(TRANSPORT, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<SendGridErrorResponse>(&error_text)
                .ok()
                .filter(|e| !e.errors.is_empty())
                .map(|e| {
                    e.errors
                        .into_iter()
                        .map(|d| d.message)
                        .collect::<Vec<_>>()
                        .join("; ")
                })
                .unwrap_or(error_text);
            return Err(TransportError::Api {
                transport: TRANSPORT.to_string(),
                status,
                message,
            });
        }

        Ok(())
    }
}
