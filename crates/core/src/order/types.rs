//! Types describing a single order check.

use serde::{Deserialize, Serialize};

/// Route of an in-flight delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    /// Where the delivery starts (free-form address).
    pub origin_address: String,
    /// Where the delivery ends (free-form address).
    pub destination_address: String,
}

/// Customer contact information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Opaque customer identifier.
    #[serde(default)]
    pub id: String,
    pub first_name: String,
    pub second_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CustomerInfo {
    /// Full name as shown in emails.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.second_name)
    }

    /// Phone number, if present and non-empty.
    pub fn phone(&self) -> Option<&str> {
        self.phone_number.as_deref().filter(|p| !p.is_empty())
    }

    /// Email address, if present and non-empty.
    pub fn email_address(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

/// Channels the customer opted into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub sms_enabled: bool,
    #[serde(default)]
    pub email_enabled: bool,
}

/// Input of one delay check. Immutable for the duration of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderContext {
    pub order_id: String,
    pub route: RouteInfo,
    /// Duration the customer was promised, in seconds.
    /// Negative when the promise is already breached.
    pub promised_duration_seconds: i64,
    /// Minimum absolute delay (seconds) that triggers a notification.
    pub notification_threshold_seconds: u64,
    pub customer: CustomerInfo,
    #[serde(default)]
    pub notification_settings: NotificationSettings,
}

impl OrderContext {
    /// Phone number to notify, if SMS is enabled and a number is known.
    pub fn sms_target(&self) -> Option<&str> {
        if self.notification_settings.sms_enabled {
            self.customer.phone()
        } else {
            None
        }
    }

    /// Email address to notify, if email is enabled and an address is known.
    pub fn email_target(&self) -> Option<&str> {
        if self.notification_settings.email_enabled {
            self.customer.email_address()
        } else {
            None
        }
    }
}

/// Result of one delay check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// False only when estimation failed while the order was still on schedule.
    pub success: bool,
    /// Estimated transit duration in seconds, when the estimator answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<i64>,
    pub sms_sent: u32,
    pub emails_sent: u32,
    /// Messages from every failed sub-step, in order of occurrence.
    #[serde(default)]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(phone: Option<&str>, email: Option<&str>) -> CustomerInfo {
        CustomerInfo {
            id: "client01".to_string(),
            first_name: "Mike".to_string(),
            second_name: "Cold".to_string(),
            phone_number: phone.map(String::from),
            email: email.map(String::from),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(customer(None, None).full_name(), "Mike Cold");
    }

    #[test]
    fn test_empty_contact_counts_as_absent() {
        let c = customer(Some(""), Some(""));
        assert_eq!(c.phone(), None);
        assert_eq!(c.email_address(), None);

        let c = customer(Some("+15005550006"), Some("mike@example.com"));
        assert_eq!(c.phone(), Some("+15005550006"));
        assert_eq!(c.email_address(), Some("mike@example.com"));
    }

    #[test]
    fn test_targets_respect_settings() {
        let mut order = OrderContext {
            order_id: "order01".to_string(),
            route: RouteInfo {
                origin_address: "A".to_string(),
                destination_address: "B".to_string(),
            },
            promised_duration_seconds: 1000,
            notification_threshold_seconds: 300,
            customer: customer(Some("+15005550006"), Some("mike@example.com")),
            notification_settings: NotificationSettings {
                sms_enabled: true,
                email_enabled: false,
            },
        };
        assert_eq!(order.sms_target(), Some("+15005550006"));
        assert_eq!(order.email_target(), None);

        order.notification_settings.email_enabled = true;
        order.customer.phone_number = None;
        assert_eq!(order.sms_target(), None);
        assert_eq!(order.email_target(), Some("mike@example.com"));
    }

    #[test]
    fn test_deserialize_order_minimal() {
        let json = r#"{
            "order_id": "order01",
            "route": {"origin_address": "1 Main St", "destination_address": "456 Elm St"},
            "promised_duration_seconds": -50,
            "notification_threshold_seconds": 30,
            "customer": {"first_name": "Mike", "second_name": "Cold"}
        }"#;
        let order: OrderContext = serde_json::from_str(json).unwrap();
        assert_eq!(order.promised_duration_seconds, -50);
        assert_eq!(order.customer.id, "");
        assert!(!order.notification_settings.sms_enabled);
        assert!(!order.notification_settings.email_enabled);
    }

    #[test]
    fn test_outcome_omits_missing_estimate() {
        let outcome = CheckOutcome {
            success: false,
            errors: vec!["boom".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(!json.contains("estimated_duration"));
        assert!(json.contains("\"errors\":[\"boom\"]"));
    }
}
