//! Tracing subscriber setup shared by the health checker binaries.

mod format;
mod subscriber;

pub use format::{LogFormat, ParseLogFormatError};
pub use subscriber::init;
pub use tracing::level_filters::LevelFilter;
