use std::{env, fmt, fs, path, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::error::ConfigError;
use crate::monitoring::checker::DEFAULT_REQUEST_TIMEOUT;
use crate::monitoring::scheduler::DEFAULT_INTERVAL;
use crate::validation::{ValidationResult, validate_interval, validate_timeout};

/// Explicit settings file location, overriding the XDG lookup
pub const SETTINGS_ENV: &str = "UPPE_MONITOR_SETTINGS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub monitor: Monitor,
    pub logging: Logging,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Monitor {
    pub interval_secs: u64,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub format: String,
    pub level: String,
}

/// Get default settings path ($XDG_CONFIG_HOME/uppe/monitor.toml or
/// $HOME/.config/...)
fn default_config_path() -> Option<path::PathBuf> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else {
        env::home_dir()?.join(".config")
    };

    Some(path.join("uppe/monitor.toml"))
}

impl Default for Monitor {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL.as_secs(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT.as_millis() as u64,
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self { format: logger::LogFormat::default().to_string(), level: "info".into() }
    }
}

impl fmt::Display for Settings {
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

        writeln!(f, "Current Monitor Settings:")?;
        write_title_1(f, "Monitor")?;
        write_1(f, "Interval (s)", &self.monitor.interval_secs)?;
        write_1(f, "Request Timeout (ms)", &self.monitor.request_timeout_ms)?;
        write_title_1(f, "Logging")?;
        write_1(f, "Format", &self.logging.format)?;
        write_1(f, "Level", &self.logging.level)?;

        Ok(())
    }
}

impl Settings {
    /// Load settings for this process.
    ///
    /// Reads the file named by `UPPE_MONITOR_SETTINGS` (which must exist), or
    /// else `~/.config/uppe/monitor.toml` when present. Without either, the
    /// defaults apply; nothing is written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(explicit) = env::var_os(SETTINGS_ENV) {
            return Self::from_path(path::PathBuf::from(explicit));
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_path(path),
            _ => Ok(Self::default()),
        }
    }

    /// Read, parse and validate a TOML settings file
    pub fn from_path(path: impl AsRef<path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let invalid = |reason: String| ConfigError::Settings { path: path.to_path_buf(), reason };

        let raw_string = fs::read_to_string(path).map_err(|err| invalid(err.to_string()))?;
        let settings: Self =
            toml::from_str(&raw_string).map_err(|err| invalid(err.to_string()))?;

        settings.validate().into_result().map_err(invalid)?;
        Ok(settings)
    }

    fn validate(&self) -> ValidationResult {
        validate_interval(self.monitor.interval_secs)
            .and_then(|| {
                validate_timeout(self.monitor.request_timeout_ms, self.monitor.interval_secs)
            })
            .and_then(|| match self.logging.format.parse::<logger::LogFormat>() {
                Ok(_) => ValidationResult::ok(),
                Err(e) => ValidationResult::err(e.to_string()),
            })
            .and_then(|| match self.logging.level.parse::<LevelFilter>() {
                Ok(_) => ValidationResult::ok(),
                Err(_) => {
                    ValidationResult::err(format!("Unknown log level '{}'", self.logging.level))
                }
            })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.monitor.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.monitor.request_timeout_ms)
    }

    pub fn log_format(&self) -> logger::LogFormat {
        self.logging.format.parse().unwrap_or_default()
    }

    pub fn log_level(&self) -> LevelFilter {
        self.logging.level.parse().unwrap_or(LevelFilter::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_match_the_monitoring_cadence() {
        let settings = Settings::default();

        assert_eq!(settings.interval(), Duration::from_secs(15));
        assert_eq!(settings.request_timeout(), Duration::from_millis(500));
        assert_eq!(settings.log_format(), logger::LogFormat::Compact);
        assert_eq!(settings.log_level(), LevelFilter::INFO);
        assert!(settings.validate().is_valid);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let file = write_settings("[monitor]\ninterval_secs = 30\n");

        let settings = Settings::from_path(file.path()).unwrap();

        assert_eq!(settings.interval(), Duration::from_secs(30));
        assert_eq!(settings.request_timeout(), Duration::from_millis(500));
        assert_eq!(settings.logging, Logging::default());
    }

    #[test]
    fn test_full_file() {
        let file = write_settings(
            r#"
[monitor]
interval_secs = 60
request_timeout_ms = 1500

[logging]
format = "json"
level = "debug"
"#,
        );

        let settings = Settings::from_path(file.path()).unwrap();

        assert_eq!(settings.request_timeout(), Duration::from_millis(1500));
        assert_eq!(settings.log_format(), logger::LogFormat::Json);
        assert_eq!(settings.log_level(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_timeout_must_fit_in_interval() {
        let file = write_settings("[monitor]\ninterval_secs = 1\nrequest_timeout_ms = 1000\n");

        let result = Settings::from_path(file.path());

        assert!(matches!(result, Err(ConfigError::Settings { .. })));
    }

    #[test]
    fn test_rejects_unknown_format_and_level() {
        let file = write_settings("[logging]\nformat = \"xml\"\n");
        assert!(Settings::from_path(file.path()).is_err());

        let file = write_settings("[logging]\nlevel = \"chatty\"\n");
        assert!(Settings::from_path(file.path()).is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let file = write_settings("[monitor\ninterval_secs = 15\n");

        assert!(matches!(Settings::from_path(file.path()), Err(ConfigError::Settings { .. })));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = Settings::from_path(dir.path().join("absent.toml"));

        assert!(matches!(result, Err(ConfigError::Settings { .. })));
    }

    #[test]
    fn test_display_lists_every_setting() {
        let rendered = Settings::default().to_string();

        assert!(rendered.contains("Interval (s): 15"));
        assert!(rendered.contains("Request Timeout (ms): 500"));
        assert!(rendered.contains("Format: compact"));
    }
}
