use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use delaywatch_core::{
    create_llm_client, load_config, validate_config, BoundedExecutor, DelayNotifier,
    DurationEstimator, GoogleRoutesClient, LlmClient, SendGridClient, StepExecutor,
    TwilioClient,
};
use delaywatch_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("DELAYWATCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Company name: {}", config.notifier.company_name);

    // Duration estimator (required)
    let estimator: Arc<dyn DurationEstimator> = Arc::new(
        GoogleRoutesClient::new(config.routes.clone())
            .context("Failed to create routes client")?,
    );
    info!("Using Google Routes API at {}", config.routes.api_base);

    let executor = BoundedExecutor::new(config.executor.clone());
    let mut notifier = DelayNotifier::new(config.notifier.clone(), executor, estimator);
    let policy = notifier.executor().config();
    info!(
        "Step policy ({}): timeout {}s, {} attempt(s)",
        notifier.executor().name(),
        policy.step_timeout_secs,
        policy.max_attempts
    );

    // Create LLM client if configured
    match &config.llm {
        Some(llm_config) => {
            let client: Arc<dyn LlmClient> = Arc::from(
                create_llm_client(llm_config).context("Failed to create LLM client")?,
            );
            info!(
                "Using LLM provider {} with model {}",
                client.provider(),
                client.model()
            );
            notifier = notifier
                .with_llm_client(client)
                .with_llm_max_tokens(llm_config.max_tokens);
        }
        None => info!("No LLM configured, notifications will use templates"),
    }

    // Create transports if configured
    match &config.email {
        Some(email_config) => {
            let client = SendGridClient::new(email_config.clone())
                .context("Failed to create SendGrid client")?;
            info!("Email transport: SendGrid (sandbox: {})", email_config.sandbox_mode);
            notifier = notifier.with_email_transport(Arc::new(client));
        }
        None => info!("No email transport configured"),
    }

    match &config.sms {
        Some(sms_config) => {
            let client =
                TwilioClient::new(sms_config.clone()).context("Failed to create Twilio client")?;
            info!("SMS transport: Twilio (from {})", sms_config.from_number);
            notifier = notifier.with_sms_transport(Arc::new(client));
        }
        None => info!("No SMS transport configured"),
    }

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), Arc::new(notifier)));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
