//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Delay checks (verdicts, duration)
//! - Notifications (per channel delivery results, generation method)
//! - External steps (duration, retries, LLM token usage)

use std::time::Duration;

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

use crate::executor::{Step, StepError};

// =============================================================================
// Check Metrics
// =============================================================================

/// Delay checks total by result.
pub static CHECKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("delaywatch_checks_total", "Total delay checks"),
        &["result"], // "notified", "skipped", "aborted"
    )
    .unwrap()
});

/// Delay check duration in seconds.
pub static CHECK_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "delaywatch_check_duration_seconds",
            "Duration of a full delay check",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Notification Metrics
// =============================================================================

/// Notifications by channel and delivery result.
pub static NOTIFICATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "delaywatch_notifications_total",
            "Total notification delivery attempts",
        ),
        &["channel", "result"], // result: "sent", "failed"
    )
    .unwrap()
});

/// Message texts by channel and how they were produced.
pub static MESSAGE_GENERATION_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "delaywatch_message_generation_total",
            "Notification texts produced, by generation method",
        ),
        &["channel", "method"], // method: "llm", "template"
    )
    .unwrap()
});

// =============================================================================
// Step Metrics
// =============================================================================

/// External step duration.
pub static STEP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "delaywatch_step_duration_seconds",
            "Duration of a single step attempt",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["step", "result"], // result: "success", "error", "timeout"
    )
    .unwrap()
});

/// Step retries total.
pub static STEP_RETRIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("delaywatch_step_retries_total", "Total step retries"),
        &["step"],
    )
    .unwrap()
});

/// LLM tokens used.
pub static LLM_TOKENS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("delaywatch_llm_tokens_total", "Total LLM tokens used"),
        &["provider", "direction"], // direction: "input", "output"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Record one step attempt.
pub fn record_step<T>(step: Step, elapsed: Duration, result: &Result<T, StepError>) {
    let label = match result {
        Ok(_) => "success",
        Err(StepError::Timeout { .. }) => "timeout",
        Err(_) => "error",
    };
    STEP_DURATION
        .with_label_values(&[step.as_str(), label])
        .observe(elapsed.as_secs_f64());
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Checks
        Box::new(CHECKS_TOTAL.clone()),
        Box::new(CHECK_DURATION.clone()),
        // Notifications
        Box::new(NOTIFICATIONS_TOTAL.clone()),
        Box::new(MESSAGE_GENERATION_TOTAL.clone()),
        // Steps
        Box::new(STEP_DURATION.clone()),
        Box::new(STEP_RETRIES.clone()),
        Box::new(LLM_TOKENS.clone()),
    ]
}
