pub mod config;
pub mod delay;
pub mod estimator;
pub mod executor;
pub mod metrics;
pub mod notifier;
pub mod order;
pub mod testing;
pub mod textgen;
pub mod transport;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, EmailConfig,
    RoutesConfig, SanitizedConfig, ServerConfig, SmsConfig,
};
pub use delay::{evaluate_delay, DelayDelta, DelayFraming, DelayVerdict};
pub use estimator::{DurationEstimator, EstimateError, GoogleRoutesClient};
pub use executor::{BoundedExecutor, DirectExecutor, ExecutorConfig, Step, StepError, StepExecutor};
pub use notifier::{Channel, ChannelReport, DelayNotifier, NotifierConfig};
pub use order::{CheckOutcome, CustomerInfo, NotificationSettings, OrderContext, RouteInfo};
pub use textgen::{
    create_llm_client, LlmClient, LlmConfig, LlmError, LlmProvider, TemplateRenderer,
};
pub use transport::{
    EmailTransport, SendGridClient, SmsTransport, TransportError, TwilioClient,
};
