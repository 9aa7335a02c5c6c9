//! Observability configuration: logging level and optional file output

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

// ─────────────────────────────────────────────────────────────────────────────
// Log Rotation
// ─────────────────────────────────────────────────────────────────────────────

/// Log file rotation strategy
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LogRotation {
    /// Rotate log files hourly
    Hourly,
    /// Rotate log files daily (default)
    #[default]
    Daily,
    /// Never rotate - single log file
    Never,
}

impl LogRotation {
    /// Parse rotation string from config
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }

    /// Convert to string for TOML serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Also write JSON logs to rotating files
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// Prefix for log file names ("chatweave" -> "chatweave.2024-01-15")
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "chatweave".to_string(),
        }
    }
}

/// Logging settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            level: file
                .level
                .as_deref()
                .and_then(normalize_level)
                .unwrap_or(defaults.level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file
                .file_dir
                .map(PathBuf::from)
                .unwrap_or(defaults.file_dir),
            file_rotation: file
                .file_rotation
                .map(|s| LogRotation::from_str(&s))
                .unwrap_or(defaults.file_rotation),
            file_prefix: file
                .file_prefix
                .filter(|p| is_plain_file_name(p))
                .unwrap_or(defaults.file_prefix),
        }
    }

    /// `EnvFilter` directive used when RUST_LOG is unset
    pub fn filter_directive(&self) -> String {
        format!("chatweave={}", self.level)
    }
}

/// Canonical lowercase level name, or None if tracing would reject it
fn normalize_level(raw: &str) -> Option<String> {
    let filter = LevelFilter::from_str(raw.trim()).ok()?;
    Some(filter.to_string().to_lowercase())
}

/// Log file prefixes must not escape `file_dir`
fn is_plain_file_name(prefix: &str) -> bool {
    !prefix.is_empty() && !prefix.contains(['/', '\\']) && prefix != "." && prefix != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_level(level: &str) -> LoggingConfig {
        LoggingConfig::from_file(Some(FileLogging {
            level: Some(level.to_string()),
            ..Default::default()
        }))
    }

    #[test]
    fn test_level_is_normalized() {
        assert_eq!(with_level(" DEBUG ").level, "debug");
        assert_eq!(with_level("off").level, "off");
        assert_eq!(with_level("warn").filter_directive(), "chatweave=warn");
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        assert_eq!(with_level("loud").level, "info");
    }

    #[test]
    fn test_prefix_with_path_is_rejected() {
        let config = LoggingConfig::from_file(Some(FileLogging {
            file_prefix: Some("../escape".to_string()),
            ..Default::default()
        }));
        assert_eq!(config.file_prefix, "chatweave");
    }
}
