//! Language and translation widget configuration

use serde::Deserialize;
use std::time::Duration;

use crate::language::{LanguageSettings, RetryPolicy};

// ─────────────────────────────────────────────────────────────────────────────
// Language
// ─────────────────────────────────────────────────────────────────────────────

/// Language configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Language the content is authored in
    pub native: String,
    /// Left-to-right language offered as the translation target
    pub ltr: String,
    /// Delay between widget attempts
    pub retry_interval_ms: u64,
    /// Attempts after the immediate one before giving up
    pub retry_max_attempts: u32,
    /// Delay before re-applying a saved language at load
    pub startup_delay_ms: u64,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            native: "ar".to_string(),
            ltr: "en".to_string(),
            retry_interval_ms: retry.interval.as_millis() as u64,
            retry_max_attempts: retry.max_attempts,
            startup_delay_ms: 900,
        }
    }
}

/// Language settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileLanguage {
    pub native: Option<String>,
    pub ltr: Option<String>,
    pub retry_interval_ms: Option<u64>,
    pub retry_max_attempts: Option<u32>,
    pub startup_delay_ms: Option<u64>,
}

impl LanguageConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileLanguage>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            native: file.native.unwrap_or(defaults.native),
            ltr: file.ltr.unwrap_or(defaults.ltr),
            retry_interval_ms: file
                .retry_interval_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.retry_interval_ms),
            retry_max_attempts: file
                .retry_max_attempts
                .filter(|n| *n > 0)
                .unwrap_or(defaults.retry_max_attempts),
            startup_delay_ms: file.startup_delay_ms.unwrap_or(defaults.startup_delay_ms),
        }
    }

    /// Runtime settings for the preference manager
    pub fn to_settings(&self) -> LanguageSettings {
        let mut options = vec![(self.native.clone(), display_label(&self.native))];
        if self.ltr != self.native {
            options.push((self.ltr.clone(), display_label(&self.ltr)));
        }

        LanguageSettings {
            native: self.native.clone(),
            ltr: self.ltr.clone(),
            options,
            retry: RetryPolicy {
                interval: Duration::from_millis(self.retry_interval_ms),
                max_attempts: self.retry_max_attempts,
            },
            startup_delay: Duration::from_millis(self.startup_delay_ms),
        }
    }
}

/// Name of a language in that language
fn display_label(code: &str) -> String {
    match code {
        "ar" => "العربية",
        "en" => "English",
        "fr" => "Français",
        "fa" => "فارسی",
        "ur" => "اردو",
        "tr" => "Türkçe",
        other => other,
    }
    .to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Translation widget
// ─────────────────────────────────────────────────────────────────────────────

/// Embedded translation widget configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSettings {
    /// Time between widget init and its control surface appearing
    pub ready_after_ms: u64,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            ready_after_ms: 1500,
        }
    }
}

/// Widget settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileWidget {
    pub ready_after_ms: Option<u64>,
}

impl WidgetSettings {
    pub fn from_file(file: Option<FileWidget>) -> Self {
        let defaults = Self::default();
        Self {
            ready_after_ms: file
                .and_then(|f| f.ready_after_ms)
                .unwrap_or(defaults.ready_after_ms),
        }
    }

    pub fn ready_after(&self) -> Duration {
        Duration::from_millis(self.ready_after_ms)
    }
}
