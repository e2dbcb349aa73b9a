use std::sync::Arc;

use tracing::{debug, warn};

use super::checker::Checker;
use super::evaluator::evaluate;
use super::types::{Policy, Target, Verdict};
use crate::notification::{DispatchSummary, Dispatcher};

/// What one cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub verdict: Verdict,
    /// `None` when nothing was sent.
    pub dispatch: Option<DispatchSummary>,
}

/// Monitoring executor - runs one probe, evaluate, notify cycle
pub struct MonitoringExecutor {
    checker: Arc<dyn Checker>,
    dispatcher: Dispatcher,
    target: Target,
    policy: Policy,
}

impl MonitoringExecutor {
    pub fn new(checker: Arc<dyn Checker>, dispatcher: Dispatcher, target: Target, policy: Policy) -> Self {
        Self { checker, dispatcher, target, policy }
    }

    /// Execute a single cycle. Never fails: probe and notification problems are
    /// classified or logged, and the next cycle is the retry.
    pub async fn execute_check(&self) -> CycleReport {
        let outcome = self.checker.check(&self.target).await;
        let evaluation = evaluate(&self.target, &outcome, &self.policy);
        evaluation.log();

        if !evaluation.should_notify(&self.policy) || !self.dispatcher.has_any_channel() {
            return CycleReport { verdict: evaluation.verdict, dispatch: None };
        }

        let summary = self.dispatcher.notify(&evaluation.message()).await;
        if summary.failed > 0 {
            warn!(
                failed = summary.failed,
                attempted = summary.attempted,
                "Some notifications could not be delivered"
            );
        } else {
            debug!(delivered = summary.delivered, "Notifications sent");
        }

        CycleReport { verdict: evaluation.verdict, dispatch: Some(summary) }
    }
}
