//! Delay evaluation: signed delay computation and threshold policy.

use serde::{Deserialize, Serialize};

/// Signed delay in seconds: promised minus estimated duration.
///
/// Negative means the delivery is late, non-negative means it arrives early
/// or on time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DelayDelta(i64);

impl DelayDelta {
    pub fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    pub fn seconds(&self) -> i64 {
        self.0
    }

    pub fn is_late(&self) -> bool {
        self.0 < 0
    }

    pub fn framing(&self) -> DelayFraming {
        if self.is_late() {
            DelayFraming::Delay
        } else {
            DelayFraming::EarlierArrival
        }
    }

    /// Magnitude in whole minutes, rounded half up.
    pub fn rounded_minutes(&self) -> u64 {
        (self.0.unsigned_abs() + 30) / 60
    }

    /// Whether the magnitude reaches the notification threshold.
    pub fn reaches(&self, threshold_seconds: u64) -> bool {
        self.0.unsigned_abs() >= threshold_seconds
    }
}

/// How a notification talks about the delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayFraming {
    /// The delivery is running late.
    Delay,
    /// The delivery is arriving earlier than promised.
    EarlierArrival,
}

impl DelayFraming {
    /// Phrase used in generation prompts.
    pub fn phrase(&self) -> &'static str {
        match self {
            DelayFraming::Delay => "delay",
            DelayFraming::EarlierArrival => "earlier arrival",
        }
    }
}

/// Outcome of the delay evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayVerdict {
    /// No reliable estimate and the promise is not yet breached.
    Abort,
    /// The delta stays under the threshold.
    Skip { delta: DelayDelta },
    /// The delta reaches the threshold; the customer must be told.
    Notify { delta: DelayDelta },
}

impl DelayVerdict {
    pub fn delta(&self) -> Option<DelayDelta> {
        match self {
            DelayVerdict::Abort => None,
            DelayVerdict::Skip { delta } | DelayVerdict::Notify { delta } => Some(*delta),
        }
    }
}

/// Computes the delay delta and applies the threshold rule.
///
/// `estimated_seconds` is `None` when the estimator failed. In that case the
/// promise alone is used as a degraded delta, but only if it is already
/// breached; otherwise the check aborts.
pub fn evaluate_delay(
    promised_seconds: i64,
    threshold_seconds: u64,
    estimated_seconds: Option<i64>,
) -> DelayVerdict {
    let delta = match estimated_seconds {
        Some(estimated) => DelayDelta(promised_seconds.saturating_sub(estimated)),
        None if promised_seconds < 0 => DelayDelta(promised_seconds),
        None => return DelayVerdict::Abort,
    };

    if delta.reaches(threshold_seconds) {
        DelayVerdict::Notify { delta }
    } else {
        DelayVerdict::Skip { delta }
    }
}
