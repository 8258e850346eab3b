use delaywatch_core::{BoundedExecutor, Config, DelayNotifier, SanitizedConfig};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    config: Config,
    notifier: Arc<DelayNotifier<BoundedExecutor>>,
}

impl AppState {
    pub fn new(config: Config, notifier: Arc<DelayNotifier<BoundedExecutor>>) -> Self {
        Self { config, notifier }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn notifier(&self) -> &DelayNotifier<BoundedExecutor> {
        &self.notifier
    }
}
