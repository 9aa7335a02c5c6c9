//! Configuration for the chat aggregator
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/chatweave/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! Command-line flags are applied on top by `main`.

use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod catalog;
mod feed;
mod observability;
mod render;
mod scroll;
mod serialization;

#[cfg(test)]
mod tests;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use catalog::{CatalogConfig, FileCatalog};
pub use feed::{FeedConfig, FileFeed};
pub use observability::{FileLogging, LogRotation, LoggingConfig};
pub use render::{parse_hex, FileRender, RenderConfig, UsernameColor};
pub use scroll::{FileScroll, ScrollConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Twitch channel id for channel-scope emote catalogs
    pub channel_id: Option<String>,

    /// Whether to run the TUI (disabled for headless mode)
    pub enable_tui: bool,

    /// Demo mode: generate sample chat traffic
    pub demo_mode: bool,

    /// Replay ChatMessage JSON lines from this file
    pub replay: Option<PathBuf>,

    pub feed: FeedConfig,
    pub catalog: CatalogConfig,
    pub render: RenderConfig,
    pub scroll: ScrollConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_id: None,
            enable_tui: true,
            demo_mode: false,
            replay: None,
            feed: FeedConfig::default(),
            catalog: CatalogConfig::default(),
            render: RenderConfig::default(),
            scroll: ScrollConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure (subset of Config that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub channel_id: Option<String>,
    pub demo: Option<bool>,

    /// Optional [feed] section
    pub feed: Option<FileFeed>,

    /// Optional [catalog] section
    pub catalog: Option<FileCatalog>,

    /// Optional [render] section
    pub render: Option<FileRender>,

    /// Optional [scroll] section
    pub scroll: Option<FileScroll>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

fn env_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

impl Config {
    /// Get the config file path: ~/.config/chatweave/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("chatweave").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// Exits the process if the file exists but cannot be read or parsed: a
    /// broken config should fail loudly, not fall back to defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: Check for:\n");
                    eprintln!("    - Missing quotes around string values");
                    eprintln!("    - Invalid boolean values (use true/false)");
                    eprintln!("    - Malformed array syntax");
                    eprintln!("    - Typos in section names\n");
                    eprintln!("  To reset, run `chatweave config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        Self::resolve(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn resolve<E>(file: FileConfig, env: E) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        // Channel id: env > file
        let channel_id = env("CHATWEAVE_CHANNEL_ID")
            .or(file.channel_id)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // TUI toggle: env only (runtime flag)
        let enable_tui = env("CHATWEAVE_NO_TUI")
            .map(|v| !env_flag(&v))
            .unwrap_or(true);

        // Demo mode: env > file > default
        let demo_mode = env("CHATWEAVE_DEMO")
            .map(|v| env_flag(&v))
            .or(file.demo)
            .unwrap_or(false);

        // Replay file: env only
        let replay = env("CHATWEAVE_REPLAY")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        // Subconfig loading with from_file() helpers
        let feed = FeedConfig::from_file(file.feed, env("CHATWEAVE_HIGHLIGHT"));
        let catalog = CatalogConfig::from_file(file.catalog);
        let render = RenderConfig::from_file(file.render);
        let scroll = ScrollConfig::from_file(file.scroll);
        let logging = LoggingConfig::from_file(file.logging);

        Self {
            channel_id,
            enable_tui,
            demo_mode,
            replay,
            feed,
            catalog,
            render,
            scroll,
            logging,
        }
    }
}
