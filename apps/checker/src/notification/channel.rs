use std::fmt;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::error::describe;

/// Supported webhook providers. Adding one means a variant plus its row in each match below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChannelKind {
    Slack,
    Discord,
}

/// Slack incoming-webhook payload.
#[derive(Serialize)]
struct SlackMessage<'a> {
    text: &'a str,
}

/// Discord webhook payload.
#[derive(Serialize)]
struct DiscordMessage<'a> {
    content: &'a str,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 2] = [ChannelKind::Slack, ChannelKind::Discord];

    pub fn label(self) -> &'static str {
        match self {
            ChannelKind::Slack => "Slack",
            ChannelKind::Discord => "Discord",
        }
    }

    /// Wrap the plain message in the provider's one-field JSON envelope.
    fn encode(self, message: &str) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            ChannelKind::Slack => serde_json::to_vec(&SlackMessage { text: message }),
            ChannelKind::Discord => serde_json::to_vec(&DiscordMessage { content: message }),
        }
    }

    fn accepts(self, status: StatusCode) -> bool {
        match self {
            ChannelKind::Slack => status == StatusCode::OK,
            ChannelKind::Discord => status == StatusCode::OK || status == StatusCode::NO_CONTENT,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to serialize {kind} message: {source}")]
    Serialize { kind: ChannelKind, source: serde_json::Error },
    #[error("failed to send {kind} request: {reason}")]
    Transmit { kind: ChannelKind, reason: String },
    #[error("{kind} API returned non-OK status: {status}")]
    Rejected { kind: ChannelKind, status: u16 },
    #[error("failed to build webhook client: {reason}")]
    Client { reason: String },
}

/// A sink that accepts a plain-text message.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, message: &str) -> Result<(), NotifyError>;
}

/// Webhook-backed channel; POSTs the provider envelope to `endpoint`.
pub struct WebhookChannel {
    kind: ChannelKind,
    endpoint: Url,
    client: reqwest::Client,
}

impl WebhookChannel {
    /// `client` should carry the per-send timeout.
    pub fn new(kind: ChannelKind, endpoint: Url, client: reqwest::Client) -> Self {
        Self { kind, endpoint, client }
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookChannel {
    fn name(&self) -> &str {
        self.kind.label()
    }

    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let kind = self.kind;
        let body = kind.encode(message).map_err(|source| NotifyError::Serialize { kind, source })?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| NotifyError::Transmit { kind, reason: describe(&e) })?;

        let status = response.status();
        if kind.accepts(status) {
            Ok(())
        } else {
            Err(NotifyError::Rejected { kind, status: status.as_u16() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubServer;
    use std::time::Duration;

    async fn send_to(kind: ChannelKind, status: u16) -> (Result<(), NotifyError>, StubServer) {
        let server = StubServer::start(status, Duration::ZERO).await;
        let channel = WebhookChannel::new(kind, Url::parse(&server.url()).unwrap(), reqwest::Client::new());
        let result = channel.send("🚨 Site down: https://example.com/").await;
        (result, server)
    }

    #[test]
    fn envelopes_use_provider_field() {
        let slack: serde_json::Value =
            serde_json::from_slice(&ChannelKind::Slack.encode("hi \"there\"").unwrap()).unwrap();
        let discord: serde_json::Value =
            serde_json::from_slice(&ChannelKind::Discord.encode("hi").unwrap()).unwrap();

        assert_eq!(slack, serde_json::json!({ "text": "hi \"there\"" }));
        assert_eq!(discord, serde_json::json!({ "content": "hi" }));
    }

    #[test]
    fn success_statuses_per_provider() {
        assert!(ChannelKind::Slack.accepts(StatusCode::OK));
        assert!(!ChannelKind::Slack.accepts(StatusCode::NO_CONTENT));
        assert!(ChannelKind::Discord.accepts(StatusCode::OK));
        assert!(ChannelKind::Discord.accepts(StatusCode::NO_CONTENT));
        assert!(!ChannelKind::Discord.accepts(StatusCode::CREATED));
    }

    #[tokio::test]
    async fn slack_posts_json_text() {
        let (result, server) = send_to(ChannelKind::Slack, 200).await;
        result.unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["text"], "🚨 Site down: https://example.com/");
    }

    #[tokio::test]
    async fn discord_accepts_no_content() {
        let (result, server) = send_to(ChannelKind::Discord, 204).await;
        result.unwrap();

        let body: serde_json::Value = serde_json::from_str(&server.requests()[0].body).unwrap();
        assert_eq!(body["content"], "🚨 Site down: https://example.com/");
    }

    #[tokio::test]
    async fn slack_rejects_no_content_with_status() {
        let (result, _server) = send_to(ChannelKind::Slack, 204).await;
        let err = result.unwrap_err();

        assert!(matches!(err, NotifyError::Rejected { kind: ChannelKind::Slack, status: 204 }));
        assert_eq!(err.to_string(), "Slack API returned non-OK status: 204");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transmit_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let channel = WebhookChannel::new(
            ChannelKind::Discord,
            Url::parse(&format!("http://127.0.0.1:{port}/hook")).unwrap(),
            reqwest::Client::new(),
        );

        let err = channel.send("hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::Transmit { kind: ChannelKind::Discord, .. }));
        assert_eq!(channel.name(), "Discord");
    }

    #[test]
    fn client_error_names_the_webhook_client() {
        let err = NotifyError::Client { reason: "no TLS backend".into() };

        assert_eq!(err.to_string(), "failed to build webhook client: no TLS backend");
    }
}
