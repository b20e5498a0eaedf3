//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML document
    pub fn to_toml(&self) -> String {
        let store_path = match &self.store_path {
            Some(path) => format!("store_path = {:?}", path.display().to_string()),
            None => "# store_path = \"~/.config/guidepanel/preferences.json\"".to_string(),
        };

        format!(
            r#"# guidepanel configuration

# Guide page address; a #fragment naming a tab opens that tab
page_url = {page_url:?}

# Where the selected language is remembered (GUIDEPANEL_STORE overrides)
{store_path}

# Frame tick for panel transitions (milliseconds)
frame_interval_ms = {frame_interval_ms}

# Content language and the translation target
[language]
native = {native:?}
ltr = {ltr:?}
# Re-attempt applying a language while the translation widget loads
retry_interval_ms = {retry_interval_ms}
retry_max_attempts = {retry_max_attempts}
# Delay before re-applying a saved language at startup
startup_delay_ms = {startup_delay_ms}

# Embedded translation widget
[widget]
ready_after_ms = {ready_after_ms}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level:?}
# JSON file logging (in addition to the TUI buffer)
file_enabled = {file_enabled}
file_dir = {file_dir:?}
file_rotation = "{file_rotation}"  # hourly, daily, never
file_prefix = {file_prefix:?}
"#,
            page_url = self.page_url,
            store_path = store_path,
            frame_interval_ms = self.frame_interval_ms,
            native = self.language.native,
            ltr = self.language.ltr,
            retry_interval_ms = self.language.retry_interval_ms,
            retry_max_attempts = self.language.retry_max_attempts,
            startup_delay_ms = self.language.startup_delay_ms,
            ready_after_ms = self.widget.ready_after_ms,
            log_level = self.logging.level,
            file_enabled = self.logging.file_enabled,
            file_dir = self.logging.file_dir.display().to_string(),
            file_rotation = self.logging.file_rotation.as_str(),
            file_prefix = self.logging.file_prefix,
        )
    }
}
