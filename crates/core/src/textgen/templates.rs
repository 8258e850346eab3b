//! Deterministic notification templates.
//!
//! These never fail and are used whenever LLM generation is unavailable or
//! returns an error.

use crate::delay::DelayDelta;
use crate::order::{CustomerInfo, RouteInfo};

/// Renders fixed-format notification text.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    company_name: String,
}

impl TemplateRenderer {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
        }
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    /// SMS text for the customer.
    pub fn sms_text(&self, order_id: &str, delta: DelayDelta, customer: &CustomerInfo) -> String {
        let minutes = delta.rounded_minutes();
        if delta.is_late() {
            format!(
                "Hi {}, your delivery for {} is delayed by {} minutes. Thank you for your patience.",
                customer.first_name, order_id, minutes
            )
        } else {
            format!(
                "Hi {}, your delivery ({}) is arriving {} mins earlier than expected!",
                customer.first_name, order_id, minutes
            )
        }
    }

    /// Email body for the customer.
    pub fn email_text(
        &self,
        order_id: &str,
        route: &RouteInfo,
        delta: DelayDelta,
        customer: &CustomerInfo,
    ) -> String {
        let name = customer.full_name();
        let minutes = delta.rounded_minutes();
        let company = &self.company_name;
        let origin = &route.origin_address;
        let destination = &route.destination_address;

        if delta.is_late() {
            format!(
                "Dear {name},

We hope this message finds you well. We wanted to inform you that your delivery ({order_id}) from {origin} to {destination} is currently experiencing a delay of approximately {minutes} minutes.

At {company}, we prioritize timely deliveries and customer satisfaction. We are working diligently to get your order to you as soon as possible.

Thank you for your understanding and patience. If you have any questions, please feel free to reach out.

Best regards,
The {company} Team"
            )
        } else {
            format!(
                "Dear {name},

We wanted to share some great news about your recent order (Order ID: {order_id}) with {company}! Your delivery, originating from {origin}, is expected to arrive at {destination} {minutes} minutes earlier than planned.

We're committed to providing timely service and ensuring your satisfaction. Thank you for choosing {company}!

Best regards,
The {company} Team"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            id: "client01".to_string(),
            first_name: "Mike".to_string(),
            second_name: "Cold".to_string(),
            phone_number: Some("+15005550006".to_string()),
            email: Some("mike@example.com".to_string()),
        }
    }

    fn route() -> RouteInfo {
        RouteInfo {
            origin_address: "1 Main St, Springfield, IL".to_string(),
            destination_address: "456 Elm St, Shelbyville, IL".to_string(),
        }
    }

    #[test]
    fn test_sms_delay_template() {
        let renderer = TemplateRenderer::new("FastExpress");
        let text = renderer.sms_text("order01", DelayDelta::from_seconds(-400), &customer());
        assert_eq!(
            text,
            "Hi Mike, your delivery for order01 is delayed by 7 minutes. Thank you for your patience."
        );
    }

    #[test]
    fn test_sms_early_template() {
        let renderer = TemplateRenderer::new("FastExpress");
        let text = renderer.sms_text("order01", DelayDelta::from_seconds(900), &customer());
        assert_eq!(
            text,
            "Hi Mike, your delivery (order01) is arriving 15 mins earlier than expected!"
        );
    }

    #[test]
    fn test_email_delay_template_uses_positive_minutes() {
        let renderer = TemplateRenderer::new("FastExpress");
        let text = renderer.email_text(
            "order01",
            &route(),
            DelayDelta::from_seconds(-400),
            &customer(),
        );
        assert!(text.starts_with("Dear Mike Cold,"));
        assert!(text.contains("from 1 Main St, Springfield, IL to 456 Elm St, Shelbyville, IL"));
        assert!(text.contains("a delay of approximately 7 minutes"));
        assert!(text.ends_with("The FastExpress Team"));
    }

    #[test]
    fn test_email_early_template_uses_computed_minutes() {
        let renderer = TemplateRenderer::new("QuickShip");
        let text = renderer.email_text(
            "order01",
            &route(),
            DelayDelta::from_seconds(1200),
            &customer(),
        );
        assert!(text.contains("20 minutes earlier than planned"));
        assert!(!text.contains("74"));
        assert!(text.contains("with QuickShip!"));
        assert!(text.ends_with("The QuickShip Team"));
    }
}
