//! Twilio SMS transport.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::SmsConfig;

use super::{SmsTransport, TransportError};

const TRANSPORT: &str = "twilio";

/// SMS transport backed by the Twilio Messages API.
pub struct TwilioClient {
    client: Client,
    config: SmsConfig,
}

impl TwilioClient {
    pub fn new(config: SmsConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| TransportError::http(TRANSPORT, e.to_string()))?;

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            urlencoding::encode(&self.config.account_sid)
        )
    }
}

#[derive(Debug, Deserialize)]
struct TwilioErrorResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

#[async_trait]
impl SmsTransport for TwilioClient {
    fn name(&self) -> &str {
        TRANSPORT
    }

    async fn send_sms(&self, to: &str, body: &str) -> Result<(), TransportError> {
        let form = [
            ("To", to),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(TRANSPORT, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TwilioErrorResponse>(&error_text)
                .map(|e| e.message)
                .unwrap_or(error_text);
            return Err(TransportError::Api {
                transport: TRANSPORT.to_string(),
                status,
                message,
            });
        }

        if let Ok(message) = response.json::<TwilioMessage>().await {
            debug!(sid = %message.sid, "Twilio accepted message");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url() {
        let client = TwilioClient::new(SmsConfig {
            account_sid: "AC123".to_string(),
            auth_token: "token".to_string(),
            from_number: "+15005550006".to_string(),
            api_base: "https://api.twilio.com/".to_string(),
            timeout_secs: 10,
        })
        .unwrap();
        assert_eq!(
            client.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
        assert_eq!(client.name(), "twilio");
    }
}
