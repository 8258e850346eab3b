//! Prompts for LLM-generated notification text.

use crate::delay::DelayDelta;
use crate::order::{CustomerInfo, RouteInfo};

/// Prompt for a very short SMS about the delay or earlier arrival.
pub fn sms_prompt(order_id: &str, delta: DelayDelta, customer: &CustomerInfo) -> String {
    let framing = delta.framing().phrase();
    format!(
        "Generate a very short SMS for the customer about the {framing} of their delivery.
The message should include the following details:
- Customer's name: {name}
- Order ID: {order_id}
- Expected {framing} in minutes: {minutes}

The message should be very short because of SMS length limits.
Do not include anything else apart from the message itself.",
        name = customer.first_name,
        minutes = delta.rounded_minutes(),
    )
}

/// Prompt for an email body about the delay or earlier arrival.
pub fn email_prompt(
    order_id: &str,
    route: &RouteInfo,
    delta: DelayDelta,
    customer: &CustomerInfo,
    company_name: &str,
) -> String {
    let framing = delta.framing().phrase();
    format!(
        "Generate a friendly message for the customer about the {framing} of their delivery.
The message should include the following details:
- Customer's name: {name}
- Order ID: {order_id}
- Expected {framing} in minutes: {minutes}
- Origin address: {origin}
- Destination address: {destination}
- Delivery company name: {company_name}

The message should be concise and reassuring, emphasizing our commitment to timely delivery and customer satisfaction.
The message should be suitable for an email format.
Do not include anything else apart from the message itself.",
        name = customer.full_name(),
        minutes = delta.rounded_minutes(),
        origin = route.origin_address,
        destination = route.destination_address,
    )
}
