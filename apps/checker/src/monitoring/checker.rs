use anyhow::Result;
use std::time::{Duration, Instant};
use thiserror::Error;

use super::types::{ProbeOutcome, Target};
use crate::error::describe;

/// Transport-level failure of a probe. HTTP statuses are never errors here.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
}

impl ProbeError {
    fn from_reqwest(error: &reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            ProbeError::Timeout(timeout)
        } else if error.is_connect() {
            ProbeError::Connect(describe(error))
        } else {
            ProbeError::Request(describe(error))
        }
    }
}

/// Checker trait for probing a target
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    /// Perform one bounded request. Latency is always populated, failures included.
    async fn check(&self, target: &Target) -> ProbeOutcome;
}

/// HTTP/HTTPS checker
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    pub fn new() -> Result<Self> {
        // No idle pooling: every probe pays for its own connect and TLS handshake,
        // and the socket is closed once the response is dropped.
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .user_agent(concat!("health-checker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn check(&self, target: &Target) -> ProbeOutcome {
        let start = Instant::now();

        let sent = self
            .client
            .request(target.method().clone(), target.url().clone())
            .timeout(target.timeout())
            .send()
            .await;

        let latency = start.elapsed();
        match sent {
            // Only the status line matters; the body is dropped unread.
            Ok(response) => ProbeOutcome::responded(response.status(), latency),
            Err(e) => ProbeOutcome::failed(ProbeError::from_reqwest(&e, target.timeout()), latency),
        }
    }
}
