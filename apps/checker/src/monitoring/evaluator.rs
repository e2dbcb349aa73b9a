//! Classification of probe outcomes against a [`Policy`].
//!
//! Checks run in a fixed order and the first match wins:
//! transport error, then status mismatch, then latency threshold.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{error, info, warn};

use super::types::{Policy, ProbeOutcome, Target, Verdict};

/// A verdict plus everything needed to describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub verdict: Verdict,
    target: String,
    latency: Duration,
    status: Option<StatusCode>,
    error: Option<String>,
    threshold: Option<Duration>,
}

/// Classify `outcome`. Pure: the same inputs always give the same evaluation.
pub fn evaluate(target: &Target, outcome: &ProbeOutcome, policy: &Policy) -> Evaluation {
    let verdict = match &outcome.response {
        Err(_) => Verdict::TransportError,
        Ok(status) if *status != policy.expected_status() => Verdict::UnexpectedStatus,
        Ok(_) => match policy.latency_threshold() {
            Some(threshold) if outcome.latency > threshold => Verdict::SlowResponse,
            _ => Verdict::Nominal,
        },
    };

    Evaluation {
        verdict,
        target: target.to_string(),
        latency: outcome.latency,
        status: outcome.status(),
        error: outcome.error().map(ToString::to_string),
        threshold: policy.latency_threshold(),
    }
}

impl Evaluation {
    /// Non-nominal verdicts always notify; nominal ones only in test mode.
    pub fn should_notify(&self, policy: &Policy) -> bool {
        !self.verdict.is_nominal() || policy.test_mode()
    }

    /// Human-readable notification text.
    pub fn message(&self) -> String {
        let status = self.status.map(|s| s.as_u16()).unwrap_or_default();
        match self.verdict {
            Verdict::TransportError => format!(
                "🚨 Site down: {}\nError: {}\nLatency: {:?}",
                self.target,
                self.error.as_deref().unwrap_or("unknown error"),
                self.latency
            ),
            Verdict::UnexpectedStatus => format!(
                "🚨 Site down: {}\nStatus code: {}\nLatency: {:?}",
                self.target, status, self.latency
            ),
            Verdict::SlowResponse => format!(
                "🐢 Slow response: {}\nLatency: {:?}\nThreshold: {:?}\nStatus code: {}",
                self.target,
                self.latency,
                self.threshold.unwrap_or_default(),
                status
            ),
            Verdict::Nominal => format!(
                "✅ Site healthy: {}\nStatus code: {}\nLatency: {:?}",
                self.target, status, self.latency
            ),
        }
    }

    /// Emit the per-cycle log line at a level matching the verdict.
    pub fn log(&self) {
        let status = self.status.map(|s| s.as_u16());
        match self.verdict {
            Verdict::TransportError => error!(
                target_url = %self.target,
                error = self.error.as_deref().unwrap_or_default(),
                latency = ?self.latency,
                "Probe failed"
            ),
            Verdict::UnexpectedStatus => warn!(
                target_url = %self.target,
                status,
                latency = ?self.latency,
                "Unexpected status"
            ),
            Verdict::SlowResponse => warn!(
                target_url = %self.target,
                status,
                latency = ?self.latency,
                threshold = ?self.threshold,
                "Slow response"
            ),
            Verdict::Nominal => info!(
                target_url = %self.target,
                status,
                latency = ?self.latency,
                "Target healthy"
            ),
        }
    }
}
