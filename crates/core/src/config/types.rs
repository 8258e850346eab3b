use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::executor::ExecutorConfig;
use crate::notifier::NotifierConfig;
use crate::textgen::LlmConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    pub routes: RoutesConfig,
    #[serde(default)]
    pub llm: Option<LlmConfig>,
    #[serde(default)]
    pub email: Option<EmailConfig>,
    #[serde(default)]
    pub sms: Option<SmsConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

fn default_timeout() -> u32 {
    30
}

/// Google Maps Routes configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutesConfig {
    /// Google Maps API key
    pub api_key: String,
    /// API base URL (default: "https://routes.googleapis.com")
    #[serde(default = "default_routes_api_base")]
    pub api_base: String,
    /// Travel mode passed to computeRoutes (default: "DRIVE")
    #[serde(default = "default_travel_mode")]
    pub travel_mode: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_routes_api_base() -> String {
    "https://routes.googleapis.com".to_string()
}

fn default_travel_mode() -> String {
    "DRIVE".to_string()
}

/// SendGrid email configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub api_key: String,
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Validate requests without delivering them
    #[serde(default)]
    pub sandbox_mode: bool,
    #[serde(default = "default_sendgrid_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_from_email() -> String {
    "noreply@yourdomain.com".to_string()
}

fn default_sendgrid_api_base() -> String {
    "https://api.sendgrid.com".to_string()
}

/// Twilio SMS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    #[serde(default = "default_from_number")]
    pub from_number: String,
    #[serde(default = "default_twilio_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_from_number() -> String {
    "+15005550006".to_string()
}

fn default_twilio_api_base() -> String {
    "https://api.twilio.com".to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub notifier: NotifierConfig,
    pub executor: ExecutorConfig,
    pub routes: SanitizedRoutesConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<SanitizedLlmConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<SanitizedEmailConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms: Option<SanitizedSmsConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedRoutesConfig {
    pub api_base: String,
    pub api_key_configured: bool,
    pub travel_mode: String,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLlmConfig {
    pub provider: String,
    pub model: String,
    pub api_base: String,
    pub api_key_configured: bool,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedEmailConfig {
    pub from_email: String,
    pub sandbox_mode: bool,
    pub api_key_configured: bool,
}

/// Sanitized Twilio config (auth token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSmsConfig {
    pub account_sid: String,
    pub from_number: String,
    pub auth_token_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            notifier: config.notifier.clone(),
            executor: config.executor.clone(),
            routes: SanitizedRoutesConfig {
                api_base: config.routes.api_base.clone(),
                api_key_configured: !config.routes.api_key.is_empty(),
                travel_mode: config.routes.travel_mode.clone(),
                timeout_secs: config.routes.timeout_secs,
            },
            llm: config.llm.as_ref().map(|l| SanitizedLlmConfig {
                provider: l.provider.as_str().to_string(),
                model: l.model.clone(),
                api_base: l.api_base().to_string(),
                api_key_configured: l.api_key.as_deref().is_some_and(|k| !k.is_empty()),
                max_tokens: l.max_tokens,
            }),
            email: config.email.as_ref().map(|e| SanitizedEmailConfig {
                from_email: e.from_email.clone(),
                sandbox_mode: e.sandbox_mode,
                api_key_configured: !e.api_key.is_empty(),
            }),
            sms: config.sms.as_ref().map(|s| SanitizedSmsConfig {
                account_sid: s.account_sid.clone(),
                from_number: s.from_number.clone(),
                auth_token_configured: !s.auth_token.is_empty(),
            }),
        }
    }
}
