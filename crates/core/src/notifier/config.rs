//! Notifier configuration.

use serde::{Deserialize, Serialize};

/// Settings that shape the text sent to customers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Company name used in emails and email prompts.
    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// Subject line of every notification email.
    #[serde(default = "default_email_subject")]
    pub email_subject: String,
}

fn default_company_name() -> String {
    "FastExpress".to_string()
}

fn default_email_subject() -> String {
    "Delivery Update".to_string()
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            email_subject: default_email_subject(),
        }
    }
}
