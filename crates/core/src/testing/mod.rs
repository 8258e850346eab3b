//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of every collaborator the
//! notifier talks to, so checks can be exercised end to end without real
//! routing, LLM, or messaging services.
//!
//! # Example
//!
//! ```rust,ignore
//! use delaywatch_core::testing::{fixtures, MockDurationEstimator, MockSmsTransport};
//!
//! let estimator = Arc::new(MockDurationEstimator::with_duration(1400));
//! let sms = Arc::new(MockSmsTransport::new());
//!
//! let notifier = DelayNotifier::new(NotifierConfig::default(), DirectExecutor, estimator)
//!     .with_sms_transport(sms.clone());
//! let outcome = notifier.check(&fixtures::late_order()).await;
//!
//! assert_eq!(sms.sent_messages().await.len(), 1);
//! ```

mod mock_estimator;
mod mock_llm;
mod mock_transport;

pub use mock_estimator::{MockDurationEstimator, RecordedEstimate};
pub use mock_llm::MockLlmClient;
pub use mock_transport::{MockEmailTransport, MockSmsTransport, SentEmail, SentSms};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::order::{CustomerInfo, NotificationSettings, OrderContext, RouteInfo};

    pub const ORIGIN: &str = "1 Main St, Springfield";
    pub const DESTINATION: &str = "456 Elm St, Shelbyville";
    pub const PHONE: &str = "+15551234567";
    pub const EMAIL: &str = "mike.cold@example.com";

    /// A customer with both a phone number and an email address.
    pub fn customer() -> CustomerInfo {
        CustomerInfo {
            id: "client01".to_string(),
            first_name: "Mike".to_string(),
            second_name: "Cold".to_string(),
            phone_number: Some(PHONE.to_string()),
            email: Some(EMAIL.to_string()),
        }
    }

    pub fn route() -> RouteInfo {
        RouteInfo {
            origin_address: ORIGIN.to_string(),
            destination_address: DESTINATION.to_string(),
        }
    }

    /// An order with both channels enabled.
    pub fn order(promised_seconds: i64, threshold_seconds: u64) -> OrderContext {
        OrderContext {
            order_id: "order-1".to_string(),
            route: route(),
            promised_duration_seconds: promised_seconds,
            notification_threshold_seconds: threshold_seconds,
            customer: customer(),
            notification_settings: NotificationSettings {
                sms_enabled: true,
                email_enabled: true,
            },
        }
    }

    /// Promised 1000s with a 300s threshold; late once the estimate passes 1300s.
    pub fn late_order() -> OrderContext {
        order(1000, 300)
    }

    /// Same as `order` but with explicit channel settings.
    pub fn order_with_channels(
        promised_seconds: i64,
        threshold_seconds: u64,
        sms_enabled: bool,
        email_enabled: bool,
    ) -> OrderContext {
        let mut order = order(promised_seconds, threshold_seconds);
        order.notification_settings = NotificationSettings {
            sms_enabled,
            email_enabled,
        };
        order
    }
}
