//! Configuration for the guide panel
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/guidepanel/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod language;
mod logging;
mod serialization;


pub use language::{FileLanguage, FileWidget, LanguageConfig, WidgetSettings};
pub use logging::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_PAGE_URL: &str = "https://guide.local/";
const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Config {
    /// Address of the guide page; its fragment selects the initial tab
    pub page_url: String,

    /// Where the language preference is persisted (None = in memory only)
    pub store_path: Option<PathBuf>,

    /// Frame tick for the two-phase panel reveal
    pub frame_interval_ms: u64,

    pub language: LanguageConfig,

    pub widget: WidgetSettings,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            store_path: Self::default_store_path(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            language: LanguageConfig::default(),
            widget: WidgetSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub page_url: Option<String>,
    pub store_path: Option<String>,
    pub frame_interval_ms: Option<u64>,

    /// Optional [language] section
    pub language: Option<FileLanguage>,

    /// Optional [widget] section
    pub widget: Option<FileWidget>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("guidepanel"))
    }

    /// Get the config file path: ~/.config/guidepanel/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    fn default_store_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("preferences.json"))
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
                return;
            }
        }
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Read and parse a config file; `Ok(None)` when it does not exist
    pub(crate) fn read_file_config(path: &Path) -> Result<Option<FileConfig>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Cannot read {}", path.display()));
            }
        };
        let config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(config))
    }

    /// Load file config if it exists
    ///
    /// A config file that exists but cannot be read or parsed ends the
    /// process: silently falling back to defaults hides the typo.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match Self::read_file_config(&path) {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Failed to load configuration file           ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  Error: {:#}\n", e);
                eprintln!("  Tip: Check for:\n");
                eprintln!("    - Missing quotes around string values");
                eprintln!("    - Invalid boolean values (use true/false)");
                eprintln!("    - Typos in section or key names\n");
                eprintln!("  To reset, run `guidepanel config --reset`.\n");
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config();
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with environment lookups
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // Page URL: env > file > default
        let page_url = env("GUIDEPANEL_URL")
            .or(file.page_url)
            .unwrap_or(defaults.page_url);

        // Store path: env > file > default (~ expanded)
        let store_path = env("GUIDEPANEL_STORE")
            .or(file.store_path)
            .map(|p| expand_home(&p))
            .or(defaults.store_path);

        // Frame interval: file > default, never zero
        let frame_interval_ms = file
            .frame_interval_ms
            .filter(|ms| *ms > 0)
            .unwrap_or(defaults.frame_interval_ms);

        let language = LanguageConfig::from_file(file.language);
        let widget = WidgetSettings::from_file(file.widget);

        // Log level: env > file > default (RUST_LOG still wins at filter time)
        let mut logging = LoggingConfig::from_file(file.logging);
        if let Some(level) = env("GUIDEPANEL_LOG_LEVEL") {
            logging.level = level;
        }

        Self {
            page_url,
            store_path,
            frame_interval_ms,
            language,
            widget,
            logging,
        }
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
