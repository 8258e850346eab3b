//! Delay notification orchestrator.
//!
//! One `check` call walks an order through:
//!
//! ```text
//! Estimating ──► Deciding ──┬──► Skipped
//!                           │
//!                           └──► Notifying ──► Done
//!                                  │
//!                                  ├── sms:   generate ──► send
//!                                  └── email: generate ──► send
//! ```
//!
//! The two channel pipelines run as separate tasks and only meet again at the
//! final join, where their reports are merged into the `CheckOutcome`.

mod config;
mod pipeline;

pub use config::NotifierConfig;
pub use pipeline::{Channel, ChannelReport};

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::delay::{evaluate_delay, DelayDelta, DelayVerdict};
use crate::estimator::DurationEstimator;
use crate::executor::{Step, StepError, StepExecutor};
use crate::metrics::{CHECKS_TOTAL, CHECK_DURATION};
use crate::order::{CheckOutcome, OrderContext};
use crate::textgen::{LlmClient, TemplateRenderer};
use crate::transport::{EmailTransport, SmsTransport};

use pipeline::Pipeline;

const DEFAULT_LLM_MAX_TOKENS: u32 = 512;

/// Decides whether an order needs a customer notification and sends it.
pub struct DelayNotifier<E: StepExecutor> {
    config: NotifierConfig,
    executor: Arc<E>,
    estimator: Arc<dyn DurationEstimator>,
    llm: Option<Arc<dyn LlmClient>>,
    llm_max_tokens: u32,
    email: Option<Arc<dyn EmailTransport>>,
    sms: Option<Arc<dyn SmsTransport>>,
    renderer: Arc<TemplateRenderer>,
}

impl<E: StepExecutor> DelayNotifier<E> {
    /// Create a notifier with only a duration estimator.
    ///
    /// Without an LLM client every message comes from templates. Transports
    /// must be set via `with_*` methods for anything to be delivered.
    pub fn new(config: NotifierConfig, executor: E, estimator: Arc<dyn DurationEstimator>) -> Self {
        let renderer = Arc::new(TemplateRenderer::new(config.company_name.clone()));
        Self {
            config,
            executor: Arc::new(executor),
            estimator,
            llm: None,
            llm_max_tokens: DEFAULT_LLM_MAX_TOKENS,
            email: None,
            sms: None,
            renderer,
        }
    }

    /// Set the LLM used for message generation.
    pub fn with_llm_client(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Set the completion token limit for generated messages.
    pub fn with_llm_max_tokens(mut self, max_tokens: u32) -> Self {
        self.llm_max_tokens = max_tokens;
        self
    }

    /// Set the email transport.
    pub fn with_email_transport(mut self, transport: Arc<dyn EmailTransport>) -> Self {
        self.email = Some(transport);
        self
    }

    /// Set the SMS transport.
    pub fn with_sms_transport(mut self, transport: Arc<dyn SmsTransport>) -> Self {
        self.sms = Some(transport);
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run one delay check for `order`.
    ///
    /// Never fails: every collaborator error ends up in `CheckOutcome::errors`.
    pub async fn check(&self, order: &OrderContext) -> CheckOutcome {
        let span = info_span!(
            "delay_check",
            check_id = %Uuid::new_v4(),
            order_id = %order.order_id,
        );
        self.run_check(order).instrument(span).await
    }

    async fn run_check(&self, order: &OrderContext) -> CheckOutcome {
        let start = Instant::now();
        let mut outcome = CheckOutcome::default();

        debug!(executor = self.executor.name(), "Estimating duration");
        let estimate = self.estimate(order).await;
        match &estimate {
            Ok(seconds) => outcome.estimated_duration = Some(*seconds),
            Err(e) => {
                warn!(error = %e, "Duration estimation failed");
                outcome.errors.push(e.to_string());
            }
        }

        let verdict = evaluate_delay(
            order.promised_duration_seconds,
            order.notification_threshold_seconds,
            estimate.ok(),
        );

        let delta = match verdict {
            DelayVerdict::Abort => {
                warn!("No estimate and delivery still on schedule, aborting check");
                outcome.success = false;
                record_check("aborted", start);
                return outcome;
            }
            DelayVerdict::Skip { delta } => {
                info!(
                    delta_seconds = delta.seconds(),
                    threshold_seconds = order.notification_threshold_seconds,
                    "Delay under threshold, no notification needed"
                );
                outcome.success = true;
                record_check("skipped", start);
                return outcome;
            }
            DelayVerdict::Notify { delta } => delta,
        };

        info!(
            delta_seconds = delta.seconds(),
            minutes = delta.rounded_minutes(),
            framing = delta.framing().phrase(),
            "Delay reaches threshold, notifying customer"
        );

        let (sms, email) = self.notify(order, delta).await;

        outcome.sms_sent = sms.sent;
        outcome.emails_sent = email.sent;
        outcome.errors.extend(sms.errors);
        outcome.errors.extend(email.errors);
        outcome.success = true;

        record_check("notified", start);
        info!(
            sms_sent = outcome.sms_sent,
            emails_sent = outcome.emails_sent,
            errors = outcome.errors.len(),
            "Check complete"
        );
        outcome
    }

    // Explicit `Send` bound: lets callers in generic contexts (e.g. axum
    // handlers) prove the future is `Send` despite higher-ranked lifetimes.
    fn estimate<'a>(
        &'a self,
        order: &'a OrderContext,
    ) -> impl std::future::Future<Output = Result<i64, StepError>> + Send + 'a {
        async move {
            let estimator = Arc::clone(&self.estimator);
            let origin = order.route.origin_address.clone();
            let destination = order.route.destination_address.clone();

            self.executor
                .execute(Step::EstimateDuration, move || {
                    let estimator = Arc::clone(&estimator);
                    let (origin, destination) = (origin.clone(), destination.clone());
                    async move {
                        estimator
                            .estimate_duration(&origin, &destination)
                            .await
                            .map_err(StepError::from)
                    }
                })
                .await
        }
    }

    /// Launch both channel pipelines and wait for both reports.
    async fn notify(&self, order: &OrderContext, delta: DelayDelta) -> (ChannelReport, ChannelReport) {
        let order = Arc::new(order.clone());

        let sms_task = order.sms_target().map(|phone| {
            let pipeline = self.pipeline(&order, delta);
            let run = pipeline.run_sms(self.sms.clone(), phone.to_string());
            spawn_channel(Channel::Sms, run)
        });

        let email_task = order.email_target().map(|address| {
            let pipeline = self.pipeline(&order, delta);
            let run = pipeline.run_email(
                self.email.clone(),
                address.to_string(),
                self.config.email_subject.clone(),
            );
            spawn_channel(Channel::Email, run)
        });

        let sms = join_channel(Channel::Sms, sms_task).await;
        let email = join_channel(Channel::Email, email_task).await;
        (sms, email)
    }

    fn pipeline(&self, order: &Arc<OrderContext>, delta: DelayDelta) -> Pipeline<E> {
        Pipeline {
            order: Arc::clone(order),
            delta,
            executor: Arc::clone(&self.executor),
            llm: self.llm.clone(),
            llm_max_tokens: self.llm_max_tokens,
            renderer: Arc::clone(&self.renderer),
        }
    }
}

fn spawn_channel<F>(channel: Channel, run: F) -> JoinHandle<ChannelReport>
where
    F: std::future::Future<Output = ChannelReport> + Send + 'static,
{
    let span = info_span!(parent: Span::current(), "channel", %channel);
    tokio::spawn(run.instrument(span))
}

async fn join_channel(channel: Channel, task: Option<JoinHandle<ChannelReport>>) -> ChannelReport {
    let Some(task) = task else {
        debug!(%channel, "Channel disabled or no contact, skipping");
        return ChannelReport::default();
    };

    match task.await {
        Ok(report) => report,
        Err(e) => {
            warn!(%channel, error = %e, "Channel pipeline did not complete");
            ChannelReport::failed(format!("{} pipeline failed: {}", channel, e))
        }
    }
}

fn record_check(result: &str, start: Instant) {
    CHECKS_TOTAL.with_label_values(&[result]).inc();
    CHECK_DURATION
        .with_label_values(&[result])
        .observe(start.elapsed().as_secs_f64());
}
