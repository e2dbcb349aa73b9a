//! Notification fan-out: webhook channels and the dispatcher that broadcasts
//! one message to all of them.

pub mod channel;
pub mod dispatcher;

pub use channel::{ChannelKind, Notifier, NotifyError};
pub use dispatcher::{DispatchSummary, Dispatcher};

use std::collections::BTreeMap;

use url::Url;

/// Webhook endpoints keyed by channel kind. Absent kinds are disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationConfig {
    endpoints: BTreeMap<ChannelKind, Url>,
}

impl NotificationConfig {
    pub fn insert(&mut self, kind: ChannelKind, endpoint: Url) {
        self.endpoints.insert(kind, endpoint);
    }

    pub fn endpoints(&self) -> impl Iterator<Item = (ChannelKind, &Url)> {
        self.endpoints.iter().map(|(kind, url)| (*kind, url))
    }

    pub fn is_enabled(&self, kind: ChannelKind) -> bool {
        self.endpoints.contains_key(&kind)
    }

    /// True when at least one channel has an endpoint.
    pub fn has_any_channel(&self) -> bool {
        !self.endpoints.is_empty()
    }

    /// "Slack notifications enabled", "Slack and Discord notifications enabled", ...
    pub fn status_line(&self) -> Option<String> {
        let services: Vec<&str> = self.endpoints.keys().map(|kind| kind.label()).collect();
        let list = match services.as_slice() {
            [] => return None,
            [only] => (*only).to_string(),
            [head @ .., last] => format!("{} and {}", head.join(", "), last),
        };
        Some(format!("{list} notifications enabled"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn empty_config_has_no_channels() {
        let config = NotificationConfig::default();
        assert!(!config.has_any_channel());
        assert_eq!(config.status_line(), None);
    }

    #[test]
    fn status_line_lists_enabled_channels() {
        let mut config = NotificationConfig::default();
        config.insert(ChannelKind::Discord, url("https://discord.com/api/webhooks/1/a"));
        assert!(config.has_any_channel());
        assert_eq!(config.status_line().as_deref(), Some("Discord notifications enabled"));

        config.insert(ChannelKind::Slack, url("https://hooks.slack.com/services/T/B/X"));
        assert_eq!(config.status_line().as_deref(), Some("Slack and Discord notifications enabled"));
        assert_eq!(config.endpoints().count(), 2);
    }
}
