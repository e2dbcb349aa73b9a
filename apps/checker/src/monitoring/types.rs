use std::fmt;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use url::Url;

use super::checker::ProbeError;
use crate::error::ConfigError;

/// The endpoint under observation, fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: Url,
    method: Method,
    timeout: Duration,
}

impl Target {
    /// A GET probe against `url`, bounded by `timeout`.
    pub fn new(url: Url, timeout: Duration) -> Self {
        Self { url, method: Method::GET, timeout }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Classification rules applied to every probe outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    expected_status: StatusCode,
    latency_threshold: Option<Duration>,
    test_mode: bool,
}

impl Policy {
    /// `None` disables the latency check; a zero threshold is rejected.
    pub fn new(latency_threshold: Option<Duration>, test_mode: bool) -> Result<Self, ConfigError> {
        if latency_threshold.is_some_and(|threshold| threshold.is_zero()) {
            return Err(ConfigError::NonPositive { field: "latency-threshold" });
        }

        Ok(Self { expected_status: StatusCode::OK, latency_threshold, test_mode })
    }

    pub fn expected_status(&self) -> StatusCode {
        self.expected_status
    }

    pub fn latency_threshold(&self) -> Option<Duration> {
        self.latency_threshold
    }

    /// In test mode every cycle notifies, nominal ones included.
    pub fn test_mode(&self) -> bool {
        self.test_mode
    }
}

/// What one probe observed.
#[derive(Debug)]
pub struct ProbeOutcome {
    /// Wall time from request start to response headers, or to the failure.
    pub latency: Duration,
    pub response: Result<StatusCode, ProbeError>,
}

impl ProbeOutcome {
    pub fn responded(status: StatusCode, latency: Duration) -> Self {
        Self { latency, response: Ok(status) }
    }

    pub fn failed(error: ProbeError, latency: Duration) -> Self {
        Self { latency, response: Err(error) }
    }

    /// Status code, only present when no transport error occurred.
    pub fn status(&self) -> Option<StatusCode> {
        self.response.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&ProbeError> {
        self.response.as_ref().err()
    }
}

/// Classification of one probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Nominal,
    TransportError,
    UnexpectedStatus,
    SlowResponse,
}

impl Verdict {
    pub fn is_nominal(self) -> bool {
        matches!(self, Verdict::Nominal)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Nominal => write!(f, "nominal"),
            Verdict::TransportError => write!(f, "transport error"),
            Verdict::UnexpectedStatus => write!(f, "unexpected status"),
            Verdict::SlowResponse => write!(f, "slow response"),
        }
    }
}
