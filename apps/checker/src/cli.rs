use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::SettingsInput;

#[derive(Debug, Parser)]
#[command(name = "health-checker", version, about = "Periodic HTTP health checks with Slack/Discord alerts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start health checking for a URL
    ///
    /// Example:
    ///   health-checker run --url https://example.com --interval 60s --timeout 5s
    Run(RunArgs),
    /// Show the config file, or write a default one with --init
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// URL to check
    #[arg(short, long)]
    pub url: Option<String>,

    /// Check interval (e.g. 60s, 1m) [default: 60s]
    #[arg(short, long)]
    pub interval: Option<String>,

    /// Request timeout (e.g. 5s, 10s) [default: 5s]
    #[arg(short, long)]
    pub timeout: Option<String>,

    /// Slack webhook URL
    #[arg(short = 's', long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    pub slack_webhook: Option<String>,

    /// Discord webhook URL
    #[arg(short = 'd', long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub discord_webhook: Option<String>,

    /// Responses slower than this are reported (e.g. 3s, 500ms)
    #[arg(long, env = "LATENCY_THRESHOLD")]
    pub latency_threshold: Option<String>,

    /// Upper bound for each webhook request [default: 10s]
    #[arg(long)]
    pub notify_timeout: Option<String>,

    /// Test mode: notify on every check, healthy ones included
    #[arg(long = "test")]
    pub test_mode: bool,

    /// Config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config file path [default: $XDG_CONFIG_HOME/health-checker/config.toml]
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Write a default config file instead of printing it
    #[arg(long)]
    pub init: bool,
}

impl From<RunArgs> for SettingsInput {
    fn from(args: RunArgs) -> Self {
        Self {
            url: args.url,
            interval: args.interval,
            timeout: args.timeout,
            latency_threshold: args.latency_threshold,
            notify_timeout: args.notify_timeout,
            slack_webhook: args.slack_webhook,
            discord_webhook: args.discord_webhook,
            test_mode: args.test_mode,
        }
    }
}
