//! Configuration sources for a run: the optional TOML file, merged with
//! command-line values into one validated [`Settings`].

pub mod duration;
pub mod settings;

pub use settings::{Settings, SettingsInput};

use std::{env, fmt, fs, path};

use logger::{LevelFilter, LogFormat};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_INTERVAL: &str = "60s";
pub const DEFAULT_TIMEOUT: &str = "5s";
pub const DEFAULT_NOTIFY_TIMEOUT: &str = "10s";

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    pub logging: LoggingConfig,
}

/// `[global]` section; every field can be overridden on the command line.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub interval: Option<String>,
    pub timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_threshold: Option<String>,
    pub notify_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_webhook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_webhook: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            url: None,
            interval: Some(DEFAULT_INTERVAL.into()),
            timeout: Some(DEFAULT_TIMEOUT.into()),
            latency_threshold: None,
            notify_timeout: Some(DEFAULT_NOTIFY_TIMEOUT.into()),
            slack_webhook: None,
            discord_webhook: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: Some("info".into()), format: None }
    }
}

impl LoggingConfig {
    /// Resolve the subscriber level and format. An unset format defers to `RUST_LOG_FORMAT`.
    pub fn resolve(&self) -> Result<(LevelFilter, LogFormat), ConfigError> {
        let level = match self.level.as_deref() {
            Some(raw) => raw.trim().parse::<LevelFilter>().map_err(|_| ConfigError::LogLevel(raw.to_string()))?,
            None => LevelFilter::INFO,
        };
        let format = match self.format.as_deref() {
            Some(raw) => raw.parse()?,
            None => LogFormat::from_env()?,
        };
        Ok((level, format))
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/health-checker/config.toml or
/// $HOME/.config/...)
pub fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Some(config_home) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("health-checker/config.toml"))
}

/// Resolve the path the `config` subcommand operates on.
pub fn config_path(optional_path: Option<&path::Path>) -> Result<path::PathBuf, ConfigError> {
    match optional_path {
        Some(path) => Ok(normalize_toml_path(path)),
        None => default_config_path(),
    }
}

fn display_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or(fallback)
}

fn enabled(value: &Option<String>) -> &'static str {
    if value.as_deref().is_some_and(|v| !v.trim().is_empty()) { "enabled" } else { "disabled" }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Health Checker Configuration:")?;
        write_title_1(f, "Global")?;
        write_1(f, "URL", &display_or(&self.global.url, "(unset)"))?;
        write_1(f, "Interval", &display_or(&self.global.interval, "(unset)"))?;
        write_1(f, "Timeout", &display_or(&self.global.timeout, "(unset)"))?;
        write_1(f, "Latency Threshold", &display_or(&self.global.latency_threshold, "disabled"))?;
        write_1(f, "Notify Timeout", &display_or(&self.global.notify_timeout, "(unset)"))?;
        write_1(f, "Slack Webhook", &enabled(&self.global.slack_webhook))?;
        write_1(f, "Discord Webhook", &enabled(&self.global.discord_webhook))?;
        write_title_1(f, "Logging")?;
        write_1(f, "Level", &display_or(&self.logging.level, "info"))?;
        write_1(f, "Format", &display_or(&self.logging.format, "from RUST_LOG_FORMAT"))?;

        Ok(())
    }
}

impl Config {
    /// Load the configuration file.
    ///
    /// An explicit path must exist. Without one, the default location is read
    /// when present and built-in defaults are used otherwise.
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path = match optional_path {
            Some(path) => normalize_toml_path(path.as_ref()),
            None => match default_config_path() {
                Ok(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let raw_string = fs::read_to_string(&config_path)
            .map_err(|source| ConfigError::ReadFailed { path: config_path.clone(), source })?;
        toml::from_str(raw_string.as_str()).map_err(|source| ConfigError::ParseFailed {
            path: config_path,
            source: Box::new(source),
        })
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), ConfigError> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::WriteFailed { path: parent.to_path_buf(), source })?;
        }

        fs::write(path, config_str)
            .map_err(|source| ConfigError::WriteFailed { path: path.to_path_buf(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn normalizes_extension() {
        assert_eq!(normalize_toml_path(path::Path::new("checker")), path::PathBuf::from("checker.toml"));
        assert_eq!(normalize_toml_path(path::Path::new("a/b.toml")), path::PathBuf::from("a/b.toml"));
        assert_eq!(normalize_toml_path(path::Path::new("a/b.yaml")), path::PathBuf::from("a/b.toml"));
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("checker.toml");
        fs::write(
            &path,
            r#"
[global]
url = "https://example.com/health"
latency_threshold = "750ms"
slack_webhook = "https://hooks.slack.com/services/T/B/X"

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = Config::from_config(Some(&path)).unwrap();
        assert_eq!(config.global.url.as_deref(), Some("https://example.com/health"));
        assert_eq!(config.global.latency_threshold.as_deref(), Some("750ms"));
        assert_eq!(config.global.interval.as_deref(), Some("60s"));
        assert_eq!(config.global.timeout.as_deref(), Some("5s"));
        assert_eq!(config.global.discord_webhook, None);
        assert_eq!(config.logging.level.as_deref(), Some("info"));
        assert_eq!(config.logging.resolve().unwrap(), (LevelFilter::INFO, LogFormat::Json));
    }

    #[test]
    fn write_then_read_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/config.toml");

        Config::default().write_config(&path).unwrap();
        let loaded = Config::from_config(Some(&path)).unwrap();

        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = Config::from_config(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[global\nurl = ").unwrap();

        let err = Config::from_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed { .. }));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let logging = LoggingConfig { level: Some("loud".into()), format: Some("compact".into()) };
        assert!(matches!(logging.resolve(), Err(ConfigError::LogLevel(level)) if level == "loud"));
    }

    #[test]
    fn display_hides_webhook_urls() {
        let config = Config {
            global: GlobalConfig {
                slack_webhook: Some("https://hooks.slack.com/services/secret".into()),
                ..GlobalConfig::default()
            },
            logging: LoggingConfig::default(),
        };

        let rendered = config.to_string();
        assert!(rendered.contains("Slack Webhook: enabled"));
        assert!(rendered.contains("Discord Webhook: disabled"));
        assert!(!rendered.contains("secret"));
    }
}
