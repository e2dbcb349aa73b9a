use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, error};

use super::NotificationConfig;
use super::channel::{Notifier, NotifyError, WebhookChannel};
use crate::error::describe;

/// Outcome counts of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Best-effort broadcast to every configured channel.
///
/// Sends run concurrently and are joined before [`Dispatcher::notify`] returns.
/// A failing channel is logged and never affects the others or the caller.
pub struct Dispatcher {
    channels: Vec<Box<dyn Notifier>>,
}

impl Dispatcher {
    /// Build one webhook channel per configured endpoint, each send bounded by `send_timeout`.
    pub fn from_config(config: &NotificationConfig, send_timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(send_timeout)
            .build()
            .map_err(|e| NotifyError::Client { reason: describe(&e) })?;

        let channels = config
            .endpoints()
            .map(|(kind, endpoint)| {
                Box::new(WebhookChannel::new(kind, endpoint.clone(), client.clone())) as Box<dyn Notifier>
            })
            .collect();

        Ok(Self { channels })
    }

    pub fn with_channels(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    pub fn has_any_channel(&self) -> bool {
        !self.channels.is_empty()
    }

    pub async fn notify(&self, message: &str) -> DispatchSummary {
        let sends = self.channels.iter().map(|channel| async move {
            let result = channel.send(message).await;
            (channel.name(), result)
        });

        let mut summary = DispatchSummary { attempted: self.channels.len(), ..Default::default() };
        for (name, result) in join_all(sends).await {
            match result {
                Ok(()) => {
                    debug!(channel = name, "Notification delivered");
                    summary.delivered += 1;
                }
                Err(e) => {
                    error!(channel = name, "Failed to send {} notification: {}", name, e);
                    summary.failed += 1;
                }
            }
        }
        summary
    }
}
