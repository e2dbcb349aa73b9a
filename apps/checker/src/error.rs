use std::error::Error as StdError;
use std::io::Error as IoError;
use std::path::PathBuf;

use logger::ParseLogFormatError;
use thiserror::Error;

/// Problems found while assembling the run configuration.
///
/// All of these are raised before the first probe is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("target URL is required (--url or [global].url)")]
    MissingTarget,
    #[error("invalid {field} '{value}': {reason}")]
    InvalidUrl { field: &'static str, value: String, reason: String },
    #[error("invalid {field} format '{value}': {reason}")]
    InvalidDuration { field: &'static str, value: String, reason: String },
    #[error("{field} must be greater than 0")]
    NonPositive { field: &'static str },
    #[error(transparent)]
    LogFormat(#[from] ParseLogFormatError),
    #[error("invalid log level '{0}'")]
    LogLevel(String),
    #[error("failed to read config file {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: IoError },
    #[error("failed to parse config file {}: {source}", path.display())]
    ParseFailed { path: PathBuf, source: Box<toml::de::Error> },
    #[error("failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
    #[error("failed to write config file {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: IoError },
    #[error("no config directory available (set XDG_CONFIG_HOME or HOME)")]
    ConfigPathUnavailable,
}

/// Render an error together with its source chain, `outer: inner: root`.
pub fn describe(error: &(dyn StdError + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer(#[source] IoError);

    #[test]
    fn describe_walks_source_chain() {
        let err = Outer(IoError::other("connection refused"));
        assert_eq!(describe(&err), "outer: connection refused");
    }

    #[test]
    fn non_positive_names_field() {
        let err = ConfigError::NonPositive { field: "latency-threshold" };
        assert_eq!(err.to_string(), "latency-threshold must be greater than 0");
    }
}
