// TUI application state
//
// One `App` is one open guide page. A reload (switching back to the native
// language) rebuilds the per-page parts: switcher, frame queue, navigator
// and translation widget. The location and the preference store survive,
// the same way a browser keeps the address and local storage.

use super::toast::Toast;
use crate::detect::DetectionResult;
use crate::guide;
use crate::keyboard::KeyboardNavigator;
use crate::language::{
    EmbeddedWidget, LanguagePreferenceManager, LanguageSettings, LoadPlan, RestoreTicket, RetryId,
    RetryStatus, SelectOutcome, TranslationWidget,
};
use crate::logging::LogBuffer;
use crate::panels::frame::FrameQueue;
use crate::panels::location::{HashChange, SessionLocation};
use crate::panels::{ActivateOptions, PanelSwitcher};
use crate::store::PreferenceStore;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use std::time::Duration;
use tokio::time::Instant;

/// Boxed store so the app does not care which backend it got
pub type Store = Box<dyn PreferenceStore>;

/// Where keyboard input goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tabs,
    Panel,
    LanguageMenu,
}

/// Screen regions recorded by the last draw, for mouse hit testing
#[derive(Debug, Default, Clone)]
pub struct HitAreas {
    pub tab_strip: Rect,
    pub language_button: Rect,
    pub language_menu: Option<Rect>,
}

pub struct App {
    pub detection: DetectionResult,
    pub location: SessionLocation,
    pub language: LanguagePreferenceManager<Store>,

    pub switcher: PanelSwitcher,
    pub navigator: KeyboardNavigator,
    pub frames: FrameQueue,
    pub widget: EmbeddedWidget,

    pub focus: Focus,
    /// Highlighted row while the language menu is open
    pub menu_cursor: usize,
    pub toast: Option<Toast>,
    pub hit_areas: HitAreas,

    pub log_buffer: LogBuffer,
    pub should_quit: bool,

    /// Deferred re-application of a saved language
    pending_restore: Option<(Instant, RestoreTicket)>,
    widget_ready_after: Duration,
}

impl App {
    pub fn new(
        detection: DetectionResult,
        location: SessionLocation,
        settings: LanguageSettings,
        store: Store,
        widget_ready_after: Duration,
        log_buffer: LogBuffer,
    ) -> Self {
        let mut app = Self {
            detection,
            location,
            language: LanguagePreferenceManager::new(settings, store),
            switcher: PanelSwitcher::new(guide::keys()),
            navigator: KeyboardNavigator::new(),
            frames: FrameQueue::new(),
            widget: EmbeddedWidget::new(widget_ready_after),
            focus: Focus::Tabs,
            menu_cursor: 0,
            toast: None,
            hit_areas: HitAreas::default(),
            log_buffer,
            should_quit: false,
            pending_restore: None,
            widget_ready_after,
        };
        app.load();
        app
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Page lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Everything that happens when the page finishes loading
    fn load(&mut self) {
        let widget_config = self.language.settings().widget_config();
        self.widget.init(&widget_config);

        self.focus = Focus::Tabs;
        self.sync_from_location();

        self.pending_restore = match self.language.on_load() {
            LoadPlan::Native => None,
            LoadPlan::Restore { delay, ticket } => Some((Instant::now() + delay, ticket)),
        };
    }

    /// Rebuild the page session
    pub fn reload(&mut self) {
        tracing::info!(url = %self.location.url(), "Reloading page");
        self.switcher = PanelSwitcher::new(guide::keys());
        self.navigator = KeyboardNavigator::new();
        self.frames = FrameQueue::new();
        self.widget = EmbeddedWidget::new(self.widget_ready_after);
        self.toast = None;
        self.load();
    }

    /// Re-run tab initialization against the current fragment
    fn sync_from_location(&mut self) {
        let initialized =
            self.switcher
                .initialize(&self.detection, &mut self.frames, &mut self.location);
        if let Some(key) = initialized {
            tracing::debug!(key = %key, "Panels initialized");
        }
        if let Some(index) = self.switcher.selected_index() {
            self.navigator.focus(index);
        }
    }

    /// Follow an in-page link to `#fragment`, pushing a history entry
    pub fn follow_link(&mut self, fragment: &str) {
        let change = self.location.navigate_fragment(fragment);
        tracing::debug!(fragment = ?change.fragment, "Hash changed");
        self.sync_from_location();
    }

    /// Back/forward through the fragment history
    pub fn navigate_history(&mut self, forward: bool) {
        let change: Option<HashChange> = if forward {
            self.location.forward()
        } else {
            self.location.back()
        };
        if let Some(change) = change {
            tracing::debug!(fragment = ?change.fragment, "Hash changed");
            self.sync_from_location();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Timers (driven by the event loop)
    // ─────────────────────────────────────────────────────────────────────────

    /// Next frame: run deferred reveals, expire the toast
    pub fn on_frame(&mut self) {
        for reveal in self.frames.drain() {
            if let Some(request) = self.switcher.reveal(reveal) {
                tracing::trace!(key = %request.key, "Panel focused");
                if self.focus != Focus::LanguageMenu {
                    self.focus = Focus::Panel;
                }
            }
        }
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }

    /// When the saved-language restore is due
    pub fn restore_deadline(&self) -> Option<Instant> {
        self.pending_restore.as_ref().map(|(at, _)| *at)
    }

    pub fn run_restore(&mut self) {
        let Some((_, ticket)) = self.pending_restore.take() else {
            return;
        };
        if let Some(outcome) = self.language.restore(&ticket, &mut self.widget) {
            self.apply_outcome(outcome);
        }
    }

    /// Id of the retry loop the event loop should keep ticking
    pub fn active_retry(&self) -> Option<RetryId> {
        self.language.retry_task().map(|task| task.id())
    }

    pub fn retry_interval(&self) -> Duration {
        self.language.settings().retry.interval
    }

    pub fn on_retry_tick(&mut self) {
        if self.language.tick(&mut self.widget) == RetryStatus::Succeeded {
            self.toast_language();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Language
    // ─────────────────────────────────────────────────────────────────────────

    pub fn select_language(&mut self, code: &str) {
        let outcome = self.language.select(code, &mut self.widget);
        self.apply_outcome(outcome);
    }

    fn apply_outcome(&mut self, outcome: SelectOutcome) {
        match outcome {
            SelectOutcome::Reload => self.reload(),
            SelectOutcome::Applied => self.toast_language(),
            SelectOutcome::Retrying(_) | SelectOutcome::Ignored => {}
        }
    }

    fn toast_language(&mut self) {
        let label = self.language.selector().button_label.clone();
        self.toast = Some(Toast::new(label));
    }

    /// Whether panel text should come from the translated catalog
    pub fn is_translated(&self) -> bool {
        self.widget.is_translated()
    }

    pub fn open_menu(&mut self) {
        self.menu_cursor = self.language.selector().selected_index().unwrap_or(0);
        self.focus = Focus::LanguageMenu;
    }

    pub fn close_menu(&mut self) {
        if self.focus == Focus::LanguageMenu {
            self.focus = Focus::Tabs;
        }
    }

    fn choose_menu_option(&mut self, index: usize) {
        let code = self
            .language
            .selector()
            .options
            .get(index)
            .map(|o| o.code.clone());
        self.close_menu();
        if let Some(code) = code {
            self.select_language(&code);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.focus == Focus::LanguageMenu {
            self.handle_menu_key(key.code);
            return;
        }

        if key.modifiers.contains(KeyModifiers::ALT) {
            match key.code {
                KeyCode::Left => self.navigate_history(false),
                KeyCode::Right => self.navigate_history(true),
                _ => {}
            }
            return;
        }

        match self.focus {
            Focus::Tabs => {
                let handled = self.navigator.handle_key(
                    key.code,
                    &mut self.switcher,
                    &mut self.frames,
                    &mut self.location,
                );
                if handled.was_handled() {
                    return;
                }
            }
            Focus::Panel => {
                if matches!(key.code, KeyCode::Esc | KeyCode::BackTab) {
                    self.return_to_tabs();
                    return;
                }
            }
            Focus::LanguageMenu => {}
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('l') => self.open_menu(),
            // Numbered deep links follow #<key> in strip order
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(key) = guide::keys().nth(index) {
                    self.follow_link(key);
                }
            }
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        let count = self.language.selector().options.len();
        match code {
            KeyCode::Up => self.menu_cursor = self.menu_cursor.saturating_sub(1),
            KeyCode::Down => {
                self.menu_cursor = (self.menu_cursor + 1).min(count.saturating_sub(1));
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.choose_menu_option(self.menu_cursor),
            KeyCode::Esc | KeyCode::Char('l') => self.close_menu(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn return_to_tabs(&mut self) {
        self.switcher.blur_panel();
        if let Some(index) = self.switcher.selected_index() {
            self.navigator.focus(index);
        }
        self.focus = Focus::Tabs;
    }

    /// Left click at a screen cell
    pub fn handle_click(&mut self, column: u16, row: u16) {
        if let Some(menu) = self.hit_areas.language_menu {
            // Only rows strictly inside the border map to options
            if contains(menu, column, row) && row > menu.y && row + 1 < menu.bottom() {
                self.choose_menu_option((row - menu.y - 1) as usize);
            } else {
                self.close_menu();
            }
            return;
        }

        if contains(self.hit_areas.language_button, column, row) {
            self.open_menu();
            return;
        }

        if contains(self.hit_areas.tab_strip, column, row) {
            let titles = super::views::tab_titles(self);
            if let Some(index) = super::views::tab_at(self.hit_areas.tab_strip, &titles, column) {
                let key = self.switcher.tabs()[index].key.clone();
                self.switcher.activate(
                    &key,
                    ActivateOptions::default(),
                    &mut self.frames,
                    &mut self.location,
                );
                self.navigator.focus(index);
                self.focus = Focus::Tabs;
            }
        }
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}
