//! Per-channel generate-then-send pipelines.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::delay::DelayDelta;
use crate::executor::{Step, StepError, StepExecutor};
use crate::metrics::{LLM_TOKENS, MESSAGE_GENERATION_TOTAL, NOTIFICATIONS_TOTAL};
use crate::order::OrderContext;
use crate::textgen::{prompts, CompletionRequest, LlmClient, LlmError, TemplateRenderer};
use crate::transport::{EmailTransport, SmsTransport, TransportError};

/// Notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Sms,
    Email,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::Email => "email",
        }
    }

    fn generate_step(&self) -> Step {
        match self {
            Channel::Sms => Step::GenerateSmsText,
            Channel::Email => Step::GenerateEmailText,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial result of one channel pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelReport {
    pub sent: u32,
    pub errors: Vec<String>,
}

impl ChannelReport {
    /// Report for a pipeline that died before producing a result.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            sent: 0,
            errors: vec![message.into()],
        }
    }
}

/// Everything a channel pipeline needs, owned so it can run on its own task.
pub(crate) struct Pipeline<E: StepExecutor> {
    pub order: Arc<OrderContext>,
    pub delta: DelayDelta,
    pub executor: Arc<E>,
    pub llm: Option<Arc<dyn LlmClient>>,
    pub llm_max_tokens: u32,
    pub renderer: Arc<TemplateRenderer>,
}

impl<E: StepExecutor> Pipeline<E> {
    /// Generate the SMS text and send it to `phone`.
    pub async fn run_sms(
        self,
        transport: Option<Arc<dyn SmsTransport>>,
        phone: String,
    ) -> ChannelReport {
        let mut report = ChannelReport::default();
        let order = &self.order;

        let prompt = prompts::sms_prompt(&order.order_id, self.delta, &order.customer);
        let text = self
            .generate(Channel::Sms, prompt, &mut report.errors, || {
                self.renderer
                    .sms_text(&order.order_id, self.delta, &order.customer)
            })
            .await;

        let result = match transport {
            Some(transport) => {
                self.executor
                    .execute(Step::SendSms, move || {
                        let (transport, phone, text) =
                            (Arc::clone(&transport), phone.clone(), text.clone());
                        async move { transport.send_sms(&phone, &text).await.map_err(StepError::from) }
                    })
                    .await
            }
            None => Err(StepError::from(TransportError::NotConfigured(
                Channel::Sms.to_string(),
            ))),
        };

        self.record_send(Channel::Sms, result, &mut report);
        report
    }

    /// Generate the email body and send it to `address`.
    pub async fn run_email(
        self,
        transport: Option<Arc<dyn EmailTransport>>,
        address: String,
        subject: String,
    ) -> ChannelReport {
        let mut report = ChannelReport::default();
        let order = &self.order;

        let prompt = prompts::email_prompt(
            &order.order_id,
            &order.route,
            self.delta,
            &order.customer,
            self.renderer.company_name(),
        );
        let text = self
            .generate(Channel::Email, prompt, &mut report.errors, || {
                self.renderer.email_text(
                    &order.order_id,
                    &order.route,
                    self.delta,
                    &order.customer,
                )
            })
            .await;

        let result = match transport {
            Some(transport) => {
                self.executor
                    .execute(Step::SendEmail, move || {
                        let transport = Arc::clone(&transport);
                        let (address, subject, text) =
                            (address.clone(), subject.clone(), text.clone());
                        async move {
                            transport
                                .send_email(&address, &subject, &text)
                                .await
                                .map_err(StepError::from)
                        }
                    })
                    .await
            }
            None => Err(StepError::from(TransportError::NotConfigured(
                Channel::Email.to_string(),
            ))),
        };

        self.record_send(Channel::Email, result, &mut report);
        report
    }

    /// LLM text when available, template text otherwise.
    ///
    /// A failed or empty completion is recorded and replaced by the template.
    async fn generate(
        &self,
        channel: Channel,
        prompt: String,
        errors: &mut Vec<String>,
        fallback: impl FnOnce() -> String,
    ) -> String {
        let Some(llm) = &self.llm else {
            debug!(%channel, "No LLM configured, using template");
            MESSAGE_GENERATION_TOTAL
                .with_label_values(&[channel.as_str(), "template"])
                .inc();
            return fallback();
        };

        let request = CompletionRequest::new(prompt).with_max_tokens(self.llm_max_tokens);
        let client = Arc::clone(llm);
        let result = self
            .executor
            .execute(channel.generate_step(), move || {
                let (llm, request) = (Arc::clone(&client), request.clone());
                async move {
                    let response = llm.complete(request).await?;
                    if response.text.trim().is_empty() {
                        return Err(StepError::from(LlmError::EmptyResponse {
                            provider: llm.provider().to_string(),
                        }));
                    }
                    Ok::<_, StepError>(response)
                }
            })
            .await;

        match result {
            Ok(response) => {
                LLM_TOKENS
                    .with_label_values(&[llm.provider(), "input"])
                    .inc_by(response.usage.input_tokens as u64);
                LLM_TOKENS
                    .with_label_values(&[llm.provider(), "output"])
                    .inc_by(response.usage.output_tokens as u64);
                MESSAGE_GENERATION_TOTAL
                    .with_label_values(&[channel.as_str(), "llm"])
                    .inc();
                debug!(%channel, model = %response.model, "Generated text with LLM");
                response.text
            }
            Err(e) => {
                warn!(%channel, error = %e, "Text generation failed, falling back to template");
                errors.push(e.to_string());
                MESSAGE_GENERATION_TOTAL
                    .with_label_values(&[channel.as_str(), "template"])
                    .inc();
                fallback()
            }
        }
    }

    fn record_send(&self, channel: Channel, result: Result<(), StepError>, report: &mut ChannelReport) {
        match result {
            Ok(()) => {
                info!(%channel, order_id = %self.order.order_id, "Notification sent");
                NOTIFICATIONS_TOTAL
                    .with_label_values(&[channel.as_str(), "sent"])
                    .inc();
                report.sent += 1;
            }
            Err(e) => {
                warn!(%channel, order_id = %self.order.order_id, error = %e, "Notification failed");
                NOTIFICATIONS_TOTAL
                    .with_label_values(&[channel.as_str(), "failed"])
                    .inc();
                report.errors.push(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::Sms.to_string(), "sms");
        assert_eq!(Channel::Email.as_str(), "email");
        assert_eq!(Channel::Sms.generate_step(), Step::GenerateSmsText);
        assert_eq!(Channel::Email.generate_step(), Step::GenerateEmailText);
    }

    #[test]
    fn test_failed_report() {
        let report = ChannelReport::failed("sms pipeline panicked");
        assert_eq!(report.sent, 0);
        assert_eq!(report.errors, vec!["sms pipeline panicked".to_string()]);
    }
}
