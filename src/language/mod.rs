//! Language preference management
//!
//! The content is authored in a native language and translated on demand by
//! an external widget. Choosing the native language means "turn translation
//! off", which the widget cannot do in place, so it persists the choice and
//! asks the host to reload. Any other language is persisted first and then
//! handed to the widget, retrying on a fixed interval while the widget is
//! still initializing.
//!
//! State machine:
//!
//! ```text
//!   Native ──select(x≠native)──▶ Pending(x) ──widget accepts──▶ Applied(x)
//!     ▲                              │ budget spent: stays Pending
//!     └──select(native)+reload───────┴──────────────────────────────┘
//! ```

pub mod locale;
pub mod retry;
pub mod widget;

use std::time::Duration;

use crate::store::{PreferenceStore, SELECTED_LANG_KEY};
pub use locale::{DocumentLocale, LanguageOption, LanguageSelector, TextDirection};
pub use retry::{RetryId, RetryPolicy, RetryStatus, RetryTask};
pub use widget::{EmbeddedWidget, TranslationWidget, WidgetConfig};

/// Static language setup, normally built from the `[language]` config section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSettings {
    /// Language the content is authored in
    pub native: String,
    /// The one left-to-right language
    pub ltr: String,
    /// Offered languages as (code, label)
    pub options: Vec<(String, String)>,
    pub retry: RetryPolicy,
    /// Delay before re-applying a persisted choice after load
    pub startup_delay: Duration,
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            native: "ar".to_string(),
            ltr: "en".to_string(),
            options: vec![
                ("ar".to_string(), "العربية".to_string()),
                ("en".to_string(), "English".to_string()),
            ],
            retry: RetryPolicy::default(),
            startup_delay: Duration::from_millis(900),
        }
    }
}

impl LanguageSettings {
    pub fn is_known(&self, lang: &str) -> bool {
        self.options.iter().any(|(code, _)| code == lang)
    }

    /// Configuration handed to the translation widget at load
    pub fn widget_config(&self) -> WidgetConfig {
        WidgetConfig {
            page_language: self.native.clone(),
            included_languages: self.options.iter().map(|(code, _)| code.clone()).collect(),
            auto_display: false,
        }
    }
}

/// Where the language lifecycle currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageState {
    /// Untranslated content
    Native,
    /// A non-native language was chosen but the widget has not applied it
    Pending { lang: String },
    /// The widget applied a non-native language
    Applied { lang: String },
}

/// What the caller has to do after a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Unknown language, nothing changed
    Ignored,
    /// Native language chosen: rebuild the page session
    Reload,
    /// Widget applied the language right away
    Applied,
    /// Widget not ready; tick the manager every retry interval
    Retrying(RetryId),
}

/// Permission to re-apply a persisted language after load
///
/// Becomes stale as soon as the user makes a selection of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreTicket {
    lang: String,
    generation: u64,
}

impl RestoreTicket {
    pub fn lang(&self) -> &str {
        &self.lang
    }
}

/// Startup decision made by [`LanguagePreferenceManager::on_load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPlan {
    /// Nothing to restore
    Native,
    /// Re-apply a persisted language after `delay`
    Restore {
        delay: Duration,
        ticket: RestoreTicket,
    },
}

pub struct LanguagePreferenceManager<S> {
    settings: LanguageSettings,
    store: S,
    state: LanguageState,
    document: DocumentLocale,
    selector: LanguageSelector,
    retry: Option<RetryTask>,
    next_retry_id: u64,
    /// Bumped by every user selection; invalidates restore tickets
    generation: u64,
}

impl<S: PreferenceStore> LanguagePreferenceManager<S> {
    pub fn new(settings: LanguageSettings, store: S) -> Self {
        let document = DocumentLocale::for_language(&settings.native, &settings.ltr);
        let mut selector = LanguageSelector::new(settings.options.iter().cloned());
        selector.mark_selected(&settings.native);
        Self {
            settings,
            store,
            state: LanguageState::Native,
            document,
            selector,
            retry: None,
            next_retry_id: 1,
            generation: 0,
        }
    }

    pub fn settings(&self) -> &LanguageSettings {
        &self.settings
    }

    pub fn state(&self) -> &LanguageState {
        &self.state
    }

    pub fn document(&self) -> &DocumentLocale {
        &self.document
    }

    pub fn selector(&self) -> &LanguageSelector {
        &self.selector
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The in-flight retry task, if any
    pub fn retry_task(&self) -> Option<&RetryTask> {
        self.retry.as_ref()
    }

    /// Persisted preference, falling back to the native language
    pub fn saved_language(&self) -> String {
        self.store
            .get(SELECTED_LANG_KEY)
            .filter(|lang| self.settings.is_known(lang))
            .unwrap_or_else(|| self.settings.native.clone())
    }

    /// Handle a user choice from the language selector
    pub fn select<W>(&mut self, lang: &str, widget: &mut W) -> SelectOutcome
    where
        W: TranslationWidget + ?Sized,
    {
        if !self.settings.is_known(lang) {
            tracing::debug!(lang, "Ignoring unknown language");
            return SelectOutcome::Ignored;
        }

        self.generation += 1;
        if let Some(task) = self.retry.take() {
            tracing::debug!(id = task.id().0, lang = task.lang(), "Superseding retry");
        }

        self.persist(lang);

        if lang == self.settings.native {
            tracing::info!(lang, "Native language selected, reloading");
            self.state = LanguageState::Native;
            return SelectOutcome::Reload;
        }

        if widget.try_select(lang) {
            self.mark_applied(lang);
            return SelectOutcome::Applied;
        }

        let id = RetryId(self.next_retry_id);
        self.next_retry_id += 1;
        tracing::debug!(
            id = id.0,
            lang,
            attempts = self.settings.retry.max_attempts,
            "Widget not ready, scheduling retry"
        );
        self.retry = Some(RetryTask::new(id, lang, &self.settings.retry));
        self.state = LanguageState::Pending {
            lang: lang.to_string(),
        };
        SelectOutcome::Retrying(id)
    }

    /// One retry interval elapsed
    pub fn tick<W>(&mut self, widget: &mut W) -> RetryStatus
    where
        W: TranslationWidget + ?Sized,
    {
        let Some(task) = self.retry.as_mut() else {
            return RetryStatus::Idle;
        };

        let status = task.tick(|lang| widget.try_select(lang));
        match status {
            RetryStatus::Succeeded => {
                let lang = task.lang().to_string();
                self.retry = None;
                self.mark_applied(&lang);
            }
            RetryStatus::Exhausted => {
                tracing::info!(lang = task.lang(), "Translation widget never became ready, giving up");
                self.retry = None;
            }
            RetryStatus::Pending => {
                tracing::debug!(
                    id = task.id().0,
                    left = task.attempts_left(),
                    "Retry attempt failed"
                );
            }
            RetryStatus::Idle => {}
        }
        status
    }

    /// Reconcile with the persisted preference after a (re)load
    pub fn on_load(&mut self) -> LoadPlan {
        self.retry = None;
        self.document = DocumentLocale::for_language(&self.settings.native, &self.settings.ltr);
        self.selector.mark_selected(&self.settings.native);

        let saved = self.saved_language();
        if saved == self.settings.native {
            self.state = LanguageState::Native;
            return LoadPlan::Native;
        }

        tracing::debug!(lang = %saved, "Restoring saved language");
        self.state = LanguageState::Pending { lang: saved.clone() };
        LoadPlan::Restore {
            delay: self.settings.startup_delay,
            ticket: RestoreTicket {
                lang: saved,
                generation: self.generation,
            },
        }
    }

    /// Run a deferred restore; `None` when the ticket went stale
    pub fn restore<W>(&mut self, ticket: &RestoreTicket, widget: &mut W) -> Option<SelectOutcome>
    where
        W: TranslationWidget + ?Sized,
    {
        if ticket.generation != self.generation {
            tracing::debug!(lang = %ticket.lang, "Dropping stale restore");
            return None;
        }
        Some(self.select(&ticket.lang, widget))
    }

    fn mark_applied(&mut self, lang: &str) {
        self.persist(lang);
        self.document = DocumentLocale::for_language(lang, &self.settings.ltr);
        self.selector.mark_selected(lang);
        self.state = LanguageState::Applied {
            lang: lang.to_string(),
        };
        tracing::info!(lang, dir = self.document.dir.as_str(), "Language applied");
    }

    fn persist(&mut self, lang: &str) {
        if let Err(e) = self.store.set(SELECTED_LANG_KEY, lang) {
            tracing::warn!("Failed to persist language preference: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    /// Widget whose control surface appears after a number of checks
    #[derive(Default)]
    struct ScriptedWidget {
        unavailable_checks: usize,
        checks: usize,
        received: Vec<String>,
    }

    impl ScriptedWidget {
        fn ready_after(checks: usize) -> Self {
            Self {
                unavailable_checks: checks,
                ..Default::default()
            }
        }

        fn never_ready() -> Self {
            Self::ready_after(usize::MAX)
        }
    }

    impl TranslationWidget for ScriptedWidget {
        fn init(&mut self, _config: &WidgetConfig) {}

        fn try_select(&mut self, lang: &str) -> bool {
            self.checks += 1;
            if self.checks <= self.unavailable_checks {
                return false;
            }
            self.received.push(lang.to_string());
            true
        }
    }

    fn manager() -> LanguagePreferenceManager<MemoryStore> {
        LanguagePreferenceManager::new(LanguageSettings::default(), MemoryStore::new())
    }

    fn saved(m: &LanguagePreferenceManager<MemoryStore>) -> Option<String> {
        m.store().get(SELECTED_LANG_KEY)
    }

    #[test]
    fn test_initial_state_is_native() {
        let m = manager();
        assert_eq!(m.state(), &LanguageState::Native);
        assert_eq!(m.document().lang, "ar");
        assert_eq!(m.document().dir, TextDirection::Rtl);
        assert_eq!(m.selector().button_label, "العربية");
    }

    #[test]
    fn test_immediate_apply() {
        let mut m = manager();
        let mut widget = ScriptedWidget::ready_after(0);

        assert_eq!(m.select("en", &mut widget), SelectOutcome::Applied);
        assert_eq!(widget.received, vec!["en"]);
        assert_eq!(saved(&m).as_deref(), Some("en"));
        assert_eq!(m.document().lang, "en");
        assert_eq!(m.document().dir, TextDirection::Ltr);
        assert_eq!(m.selector().button_label, "English");
        assert_eq!(m.state(), &LanguageState::Applied { lang: "en".into() });
        assert!(m.retry_task().is_none());
    }

    #[test]
    fn test_retry_succeeds_once_widget_appears() {
        let mut m = manager();
        // The immediate attempt plus four ticks fail, the fifth tick lands
        let mut widget = ScriptedWidget::ready_after(5);

        assert!(matches!(m.select("en", &mut widget), SelectOutcome::Retrying(_)));
        // Persisted before any attempt succeeded
        assert_eq!(saved(&m).as_deref(), Some("en"));
        assert_eq!(m.state(), &LanguageState::Pending { lang: "en".into() });
        assert_eq!(m.document().lang, "ar");

        for _ in 0..4 {
            assert_eq!(m.tick(&mut widget), RetryStatus::Pending);
        }
        assert_eq!(m.tick(&mut widget), RetryStatus::Succeeded);
        assert_eq!(widget.received, vec!["en"]);
        assert_eq!(m.document().dir, TextDirection::Ltr);

        // Loop cancelled: further ticks do nothing
        assert_eq!(m.tick(&mut widget), RetryStatus::Idle);
        assert_eq!(widget.checks, 6);
        assert_eq!(widget.received.len(), 1);
    }

    #[test]
    fn test_retry_gives_up_after_budget() {
        let mut m = manager();
        let mut widget = ScriptedWidget::never_ready();

        m.select("en", &mut widget);
        for _ in 0..19 {
            assert_eq!(m.tick(&mut widget), RetryStatus::Pending);
        }
        assert_eq!(m.tick(&mut widget), RetryStatus::Exhausted);
        assert_eq!(m.tick(&mut widget), RetryStatus::Idle);

        // One immediate attempt plus twenty ticks
        assert_eq!(widget.checks, 21);
        assert!(widget.received.is_empty());
        assert_eq!(saved(&m).as_deref(), Some("en"));
        assert_eq!(m.document().lang, "ar");
        assert_eq!(m.state(), &LanguageState::Pending { lang: "en".into() });
    }

    #[test]
    fn test_native_selection_persists_and_reloads() {
        let mut m = manager();
        let mut widget = ScriptedWidget::ready_after(0);
        m.select("en", &mut widget);

        assert_eq!(m.select("ar", &mut widget), SelectOutcome::Reload);
        assert_eq!(saved(&m).as_deref(), Some("ar"));
        assert_eq!(m.state(), &LanguageState::Native);
        // The widget is never asked to apply the native language
        assert_eq!(widget.received, vec!["en"]);
    }

    #[test]
    fn test_native_selection_cancels_retry() {
        let mut m = manager();
        let mut widget = ScriptedWidget::never_ready();
        m.select("en", &mut widget);
        assert!(m.retry_task().is_some());

        assert_eq!(m.select("ar", &mut widget), SelectOutcome::Reload);
        assert!(m.retry_task().is_none());
        assert_eq!(m.tick(&mut widget), RetryStatus::Idle);
    }

    #[test]
    fn test_new_selection_supersedes_retry() {
        let settings = LanguageSettings {
            options: vec![
                ("ar".into(), "العربية".into()),
                ("en".into(), "English".into()),
                ("fa".into(), "فارسی".into()),
            ],
            ..Default::default()
        };
        let mut m = LanguagePreferenceManager::new(settings, MemoryStore::new());
        let mut widget = ScriptedWidget::ready_after(3);

        let SelectOutcome::Retrying(first) = m.select("en", &mut widget) else {
            panic!("expected retry");
        };
        let SelectOutcome::Retrying(second) = m.select("fa", &mut widget) else {
            panic!("expected retry");
        };
        assert_ne!(first, second);
        assert_eq!(m.retry_task().map(|t| t.id()), Some(second));

        assert_eq!(m.tick(&mut widget), RetryStatus::Pending);
        assert_eq!(m.tick(&mut widget), RetryStatus::Succeeded);
        assert_eq!(widget.received, vec!["fa"]);
        assert_eq!(m.document().dir, TextDirection::Rtl);
        assert_eq!(saved(&m).as_deref(), Some("fa"));
    }

    #[test]
    fn test_unknown_language_is_ignored() {
        let mut m = manager();
        let mut widget = ScriptedWidget::ready_after(0);
        assert_eq!(m.select("de", &mut widget), SelectOutcome::Ignored);
        assert_eq!(saved(&m), None);
        assert_eq!(widget.checks, 0);
    }

    #[test]
    fn test_load_without_preference() {
        let mut m = manager();
        assert_eq!(m.on_load(), LoadPlan::Native);

        let mut store = MemoryStore::new();
        store.set(SELECTED_LANG_KEY, "ar").unwrap();
        let mut m = LanguagePreferenceManager::new(LanguageSettings::default(), store);
        assert_eq!(m.on_load(), LoadPlan::Native);
    }

    #[test]
    fn test_load_restores_saved_language() {
        let mut store = MemoryStore::new();
        store.set(SELECTED_LANG_KEY, "en").unwrap();
        let mut m = LanguagePreferenceManager::new(LanguageSettings::default(), store);
        let mut widget = ScriptedWidget::ready_after(0);

        let LoadPlan::Restore { delay, ticket } = m.on_load() else {
            panic!("expected restore");
        };
        assert_eq!(delay, Duration::from_millis(900));
        assert_eq!(ticket.lang(), "en");
        // Nothing changes until the delay elapses
        assert_eq!(m.document().lang, "ar");

        assert_eq!(m.restore(&ticket, &mut widget), Some(SelectOutcome::Applied));
        assert_eq!(m.document().lang, "en");
    }

    #[test]
    fn test_user_selection_invalidates_restore() {
        let mut store = MemoryStore::new();
        store.set(SELECTED_LANG_KEY, "en").unwrap();
        let mut m = LanguagePreferenceManager::new(LanguageSettings::default(), store);
        let mut widget = ScriptedWidget::ready_after(0);

        let LoadPlan::Restore { ticket, .. } = m.on_load() else {
            panic!("expected restore");
        };
        assert_eq!(m.select("ar", &mut widget), SelectOutcome::Reload);
        assert_eq!(m.restore(&ticket, &mut widget), None);
        assert!(widget.received.is_empty());
    }

    #[test]
    fn test_unknown_saved_language_loads_native() {
        let mut store = MemoryStore::new();
        store.set(SELECTED_LANG_KEY, "xx").unwrap();
        let mut m = LanguagePreferenceManager::new(LanguageSettings::default(), store);
        assert_eq!(m.saved_language(), "ar");
        assert_eq!(m.on_load(), LoadPlan::Native);
    }
}
