use std::fmt;
use std::time::Duration;

use super::{DEFAULT_INTERVAL, DEFAULT_NOTIFY_TIMEOUT, DEFAULT_TIMEOUT, GlobalConfig};
use super::duration::parse_positive;
use crate::error::ConfigError;
use crate::monitoring::types::{Policy, Target};
use crate::notification::{ChannelKind, NotificationConfig};
use crate::validation::validate_http_endpoint;

/// Raw, unvalidated run values as they arrive from the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsInput {
    pub url: Option<String>,
    pub interval: Option<String>,
    pub timeout: Option<String>,
    pub latency_threshold: Option<String>,
    pub notify_timeout: Option<String>,
    pub slack_webhook: Option<String>,
    pub discord_webhook: Option<String>,
    pub test_mode: bool,
}

/// Validated, immutable configuration of one monitoring run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub target: Target,
    pub policy: Policy,
    pub interval: Duration,
    pub notifications: NotificationConfig,
    pub notify_timeout: Duration,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn first_set(primary: Option<String>, fallback: &Option<String>) -> Option<String> {
    non_empty(primary).or_else(|| non_empty(fallback.clone()))
}

impl SettingsInput {
    /// Fill every value the command line left unset from the config file.
    pub fn or_file(self, file: &GlobalConfig) -> Self {
        Self {
            url: first_set(self.url, &file.url),
            interval: first_set(self.interval, &file.interval),
            timeout: first_set(self.timeout, &file.timeout),
            latency_threshold: first_set(self.latency_threshold, &file.latency_threshold),
            notify_timeout: first_set(self.notify_timeout, &file.notify_timeout),
            slack_webhook: first_set(self.slack_webhook, &file.slack_webhook),
            discord_webhook: first_set(self.discord_webhook, &file.discord_webhook),
            test_mode: self.test_mode,
        }
    }
}

impl Settings {
    /// Merge command-line values over the config file and validate the result.
    pub fn resolve(input: SettingsInput, file: &GlobalConfig) -> Result<Self, ConfigError> {
        Self::try_from(input.or_file(file))
    }
}

impl TryFrom<SettingsInput> for Settings {
    type Error = ConfigError;

    fn try_from(input: SettingsInput) -> Result<Self, Self::Error> {
        let url = non_empty(input.url).ok_or(ConfigError::MissingTarget)?;
        let url = validate_http_endpoint("url", &url)?;

        let interval = parse_positive("interval", input.interval.as_deref().unwrap_or(DEFAULT_INTERVAL))?;
        let timeout = parse_positive("timeout", input.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))?;
        let notify_timeout =
            parse_positive("notify-timeout", input.notify_timeout.as_deref().unwrap_or(DEFAULT_NOTIFY_TIMEOUT))?;
        let latency_threshold = non_empty(input.latency_threshold)
            .map(|raw| parse_positive("latency-threshold", &raw))
            .transpose()?;

        let mut notifications = NotificationConfig::default();
        if let Some(raw) = non_empty(input.slack_webhook) {
            notifications.insert(ChannelKind::Slack, validate_http_endpoint("slack-webhook", &raw)?);
        }
        if let Some(raw) = non_empty(input.discord_webhook) {
            notifications.insert(ChannelKind::Discord, validate_http_endpoint("discord-webhook", &raw)?);
        }

        Ok(Self {
            target: Target::new(url, timeout),
            policy: Policy::new(latency_threshold, input.test_mode)?,
            interval,
            notifications,
            notify_timeout,
        })
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "target: {} ({})", self.target, self.target.method())?;
        writeln!(f, "interval: {:?}", self.interval)?;
        writeln!(f, "timeout: {:?}", self.target.timeout())?;
        match self.policy.latency_threshold() {
            Some(threshold) => writeln!(f, "latency threshold: {threshold:?}")?,
            None => writeln!(f, "latency threshold: disabled")?,
        }
        writeln!(f, "test mode: {}", self.policy.test_mode())?;
        for kind in ChannelKind::ALL {
            let state = if self.notifications.is_enabled(kind) { "enabled" } else { "disabled" };
            writeln!(f, "{kind} webhook: {state}")?;
        }
        write!(f, "notify timeout: {:?}", self.notify_timeout)
    }
}
