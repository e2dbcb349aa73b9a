use std::env::{VarError, var};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, one line per event, no timestamps.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log format '{0}', expected 'compact' or 'json'")]
pub struct ParseLogFormatError(pub String);

impl LogFormat {
    /// Read the format from `RUST_LOG_FORMAT`. Unset or empty means compact.
    pub fn from_env() -> Result<Self, ParseLogFormatError> {
        Self::from_var(var("RUST_LOG_FORMAT"))
    }

    fn from_var(raw: Result<String, VarError>) -> Result<Self, ParseLogFormatError> {
        match raw {
            Ok(value) => value.parse(),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(value)) => Err(ParseLogFormatError(value.to_string_lossy().into_owned())),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ParseLogFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ParseLogFormatError(other.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}
