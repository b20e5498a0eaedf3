//! External translation widget boundary
//!
//! The widget is a black box: it is initialized once with a fixed
//! configuration and, some unspecified time later, exposes a control
//! surface that accepts a language code. Until then every attempt fails.

use std::time::{Duration, Instant};

/// Fixed configuration handed to the widget at load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Language the content is authored in
    pub page_language: String,
    /// Languages the widget may offer
    pub included_languages: Vec<String>,
    /// Whether the widget shows its own banner/prompt
    pub auto_display: bool,
}

/// The one operation we rely on: "select language X"
pub trait TranslationWidget {
    /// Initialization entry point, invoked once per page load
    fn init(&mut self, config: &WidgetConfig);

    /// Assign `lang` to the control surface and fire its change notification
    ///
    /// Returns `false` when the control surface does not exist yet or does
    /// not accept the value.
    fn try_select(&mut self, lang: &str) -> bool;
}

/// Widget bundled with the terminal UI
///
/// Becomes available `ready_after` its `init` call, mimicking a script that
/// loads asynchronously. Once a non-page language is applied the UI renders
/// translated content.
#[derive(Debug)]
pub struct EmbeddedWidget {
    ready_after: Duration,
    initialized_at: Option<Instant>,
    config: Option<WidgetConfig>,
    applied: Option<String>,
}

impl EmbeddedWidget {
    pub fn new(ready_after: Duration) -> Self {
        Self {
            ready_after,
            initialized_at: None,
            config: None,
            applied: None,
        }
    }

    /// Whether the control surface has been rendered
    pub fn is_ready(&self) -> bool {
        self.initialized_at
            .is_some_and(|at| at.elapsed() >= self.ready_after)
    }

    /// Language currently applied by the widget, if any
    pub fn applied_language(&self) -> Option<&str> {
        self.applied.as_deref()
    }

    /// Whether the content is shown in a language other than the page's
    pub fn is_translated(&self) -> bool {
        match (self.applied_language(), &self.config) {
            (Some(applied), Some(config)) => applied != config.page_language,
            _ => false,
        }
    }
}

impl TranslationWidget for EmbeddedWidget {
    fn init(&mut self, config: &WidgetConfig) {
        tracing::debug!(
            page_language = %config.page_language,
            included = ?config.included_languages,
            "Translation widget initializing"
        );
        self.config = Some(config.clone());
        self.initialized_at = Some(Instant::now());
    }

    fn try_select(&mut self, lang: &str) -> bool {
        if !self.is_ready() {
            return false;
        }
        let Some(config) = &self.config else {
            return false;
        };
        if !config.included_languages.iter().any(|l| l == lang) {
            tracing::debug!(lang, "Translation widget rejected language");
            return false;
        }

        self.applied = Some(lang.to_string());
        tracing::debug!(lang, "Translation widget changed language");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WidgetConfig {
        WidgetConfig {
            page_language: "ar".to_string(),
            included_languages: vec!["ar".to_string(), "en".to_string()],
            auto_display: false,
        }
    }

    #[test]
    fn test_uninitialized_widget_rejects() {
        let mut widget = EmbeddedWidget::new(Duration::ZERO);
        assert!(!widget.is_ready());
        assert!(!widget.try_select("en"));
    }

    #[test]
    fn test_ready_widget_applies_allowed_language() {
        let mut widget = EmbeddedWidget::new(Duration::ZERO);
        widget.init(&config());
        assert!(widget.try_select("en"));
        assert_eq!(widget.applied_language(), Some("en"));
        assert!(widget.is_translated());

        assert!(!widget.try_select("fr"));
        assert_eq!(widget.applied_language(), Some("en"));
    }

    #[test]
    fn test_slow_widget_is_not_ready() {
        let mut widget = EmbeddedWidget::new(Duration::from_secs(3600));
        widget.init(&config());
        assert!(!widget.try_select("en"));
        assert!(!widget.is_translated());
    }
}
