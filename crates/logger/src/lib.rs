use std::{env::var, fmt, str::FromStr};

use thiserror::Error;
use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that overrides the configured output format.
pub const FORMAT_ENV: &str = "RUST_LOG_FORMAT";

/// Output format of the log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Error)]
#[error("unknown log format '{0}', expected 'compact' or 'json'")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(UnknownLogFormat(other.to_string())),
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

/// Initialize tracing with the compact format at INFO, unless the environment
/// says otherwise.
pub fn init() {
    init_with(LogFormat::Compact, LevelFilter::INFO);
}

/// Initialize tracing with an explicit format and default level.
///
/// `RUST_LOG` still overrides the level and `RUST_LOG_FORMAT` the format.
pub fn init_with(format: LogFormat, level: LevelFilter) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let (format, override_error) = resolve_format(format, var(FORMAT_ENV).ok());

    let log_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        LogFormat::Compact => {
            tracing_subscriber::fmt::layer().compact().with_filter(env_filter).boxed()
        }
    };

    tracing_subscriber::registry().with(log_layer).init();

    if let Some(error) = override_error {
        warn!("Ignoring {FORMAT_ENV}, falling back to {format}: {error}");
    }
}

/// Pick the effective format: a valid environment override wins over the
/// configured one.
fn resolve_format(
    configured: LogFormat,
    env_value: Option<String>,
) -> (LogFormat, Option<UnknownLogFormat>) {
    let requested = env_value.as_deref().filter(|value| !value.trim().is_empty());

    match requested.map(str::parse::<LogFormat>) {
        None => (configured, None),
        Some(Ok(format)) => (format, None),
        Some(Err(error)) => (configured, Some(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("pretty-please".parse::<LogFormat>().is_err());
    }

    #[test]
    fn environment_override_wins_when_valid() {
        let (format, error) = resolve_format(LogFormat::Compact, Some("json".into()));
        assert_eq!(format, LogFormat::Json);
        assert!(error.is_none());

        let (format, error) = resolve_format(LogFormat::Json, Some("xml".into()));
        assert_eq!(format, LogFormat::Json);
        assert!(error.is_some());

        let (format, _) = resolve_format(LogFormat::Json, None);
        assert_eq!(format, LogFormat::Json);

        let (format, error) = resolve_format(LogFormat::Json, Some(String::new()));
        assert_eq!(format, LogFormat::Json);
        assert!(error.is_none());
    }
}
