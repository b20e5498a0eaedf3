//! Panel switcher - the tab/panel state machine
//!
//! Exactly one tab is selected and exactly one panel is active once the
//! switcher has been initialized, and the two always share a key.
//!
//! # Transition
//!
//! ```text
//! activate(key) ──commit──▶ selected/active updated, visible cleared,
//!                           fragment replaced, Reveal requested
//!                                   │
//!                              next frame
//!                                   ▼
//! reveal(Reveal) ─────────▶ visible = true (+ focus, no scroll)
//! ```
//!
//! Unknown keys are ignored: malformed fragments are expected input.

pub mod frame;
pub mod location;

use crate::detect::DetectionResult;
use frame::{FrameScheduler, Reveal};
use location::Location;

/// Selectable control for one panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub key: String,
    pub selected: bool,
    /// 0 for the selected tab (reachable by sequential traversal), -1 otherwise
    pub tab_index: i32,
}

/// Content region paired with a tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub key: String,
    pub active: bool,
    /// Entry animation flag; lags `active` by one frame
    pub visible: bool,
    pub focused: bool,
}

/// Options for [`PanelSwitcher::activate`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivateOptions {
    pub focus_panel: bool,
}

impl ActivateOptions {
    pub fn focus_panel() -> Self {
        Self { focus_panel: true }
    }
}

/// Focus move produced by the reveal phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRequest {
    pub key: String,
    /// Focus without scrolling the viewport to the panel
    pub prevent_scroll: bool,
}

/// Owns the tab and panel state
#[derive(Debug, Clone)]
pub struct PanelSwitcher {
    tabs: Vec<Tab>,
    panels: Vec<Panel>,
}

impl PanelSwitcher {
    /// Build from matching tab and panel keys (the usual case)
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a str> + Clone) -> Self {
        Self::from_markup(keys.clone(), keys)
    }

    /// Build from separately declared tabs and panels
    ///
    /// Keys present on only one side can never be activated.
    pub fn from_markup<'a>(
        tab_keys: impl IntoIterator<Item = &'a str>,
        panel_keys: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let tabs = tab_keys
            .into_iter()
            .map(|key| Tab {
                key: key.to_string(),
                selected: false,
                tab_index: -1,
            })
            .collect();
        let panels = panel_keys
            .into_iter()
            .map(|key| Panel {
                key: key.to_string(),
                active: false,
                visible: false,
                focused: false,
            })
            .collect();
        Self { tabs, panels }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Index of the selected tab in strip order
    pub fn selected_index(&self) -> Option<usize> {
        self.tabs.iter().position(|t| t.selected)
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.tabs.iter().find(|t| t.selected).map(|t| t.key.as_str())
    }

    pub fn active_panel(&self) -> Option<&Panel> {
        self.panels.iter().find(|p| p.active)
    }

    /// Whether a tab exists for this key (used to validate fragments)
    pub fn has_tab(&self, key: &str) -> bool {
        self.tabs.iter().any(|t| t.key == key)
    }

    /// Activate the panel for `key` (commit phase)
    ///
    /// Returns `false` and changes nothing when either the tab or the panel
    /// is missing. Calling it with the already-active key is safe.
    pub fn activate<F, L>(
        &mut self,
        key: &str,
        options: ActivateOptions,
        frames: &mut F,
        location: &mut L,
    ) -> bool
    where
        F: FrameScheduler + ?Sized,
        L: Location + ?Sized,
    {
        let Some(tab_idx) = self.tabs.iter().position(|t| t.key == key) else {
            tracing::debug!(key, "Ignoring activation: no such tab");
            return false;
        };
        let Some(panel_idx) = self.panels.iter().position(|p| p.key == key) else {
            tracing::debug!(key, "Ignoring activation: no such panel");
            return false;
        };

        for (i, tab) in self.tabs.iter_mut().enumerate() {
            let is_selected = i == tab_idx;
            tab.selected = is_selected;
            tab.tab_index = if is_selected { 0 } else { -1 };
        }

        for (i, panel) in self.panels.iter_mut().enumerate() {
            panel.active = i == panel_idx;
            panel.visible = false;
            panel.focused = false;
        }

        frames.request_frame(Reveal {
            key: key.to_string(),
            focus_panel: options.focus_panel,
        });

        location.replace_fragment(key);

        tracing::debug!(key, focus_panel = options.focus_panel, "Panel activated");
        true
    }

    /// Run the reveal phase for a previously committed activation
    ///
    /// A reveal whose panel has since been deactivated is dropped so that
    /// `visible` never outlives `active`.
    pub fn reveal(&mut self, reveal: Reveal) -> Option<FocusRequest> {
        let panel = self
            .panels
            .iter_mut()
            .find(|p| p.key == reveal.key && p.active)?;

        panel.visible = true;
        if !reveal.focus_panel {
            return None;
        }

        panel.focused = true;
        Some(FocusRequest {
            key: reveal.key,
            prevent_scroll: true,
        })
    }

    /// Clear panel focus (focus returned to the tab strip)
    pub fn blur_panel(&mut self) {
        for panel in &mut self.panels {
            panel.focused = false;
        }
    }

    /// Resolve the initial key and activate it without focusing the panel
    ///
    /// The fragment wins when it names a known tab, otherwise the detected
    /// key is used. Also run on every navigation event.
    pub fn initialize<F, L>(
        &mut self,
        detection: &DetectionResult,
        frames: &mut F,
        location: &mut L,
    ) -> Option<String>
    where
        F: FrameScheduler + ?Sized,
        L: Location + ?Sized,
    {
        let from_fragment = location.fragment().filter(|key| self.has_tab(key));
        let key = from_fragment.unwrap_or_else(|| detection.key.to_string());

        if self.activate(&key, ActivateOptions::default(), frames, location) {
            Some(key)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::frame::FrameQueue;
    use super::location::SessionLocation;
    use super::*;
    use crate::detect;

    const KEYS: [&str; 4] = [
        detect::IPHONE_SAFARI,
        detect::ANDROID_CHROME,
        detect::WINDOWS_CHROME,
        detect::MAC,
    ];

    fn setup(address: &str) -> (PanelSwitcher, FrameQueue, SessionLocation) {
        (
            PanelSwitcher::new(KEYS),
            FrameQueue::new(),
            SessionLocation::parse(address).unwrap(),
        )
    }

    fn detection(key: &'static str) -> DetectionResult {
        DetectionResult { key, label: "test" }
    }

    /// Exactly one selected tab, exactly one active panel, same key
    fn assert_consistent(switcher: &PanelSwitcher) {
        let selected: Vec<_> = switcher.tabs().iter().filter(|t| t.selected).collect();
        let active: Vec<_> = switcher.panels().iter().filter(|p| p.active).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(active.len(), 1);
        assert_eq!(selected[0].key, active[0].key);
        for tab in switcher.tabs() {
            assert_eq!(tab.tab_index, if tab.selected { 0 } else { -1 });
        }
        for panel in switcher.panels() {
            assert!(!panel.visible || panel.active, "visible panel must be active");
        }
    }

    #[test]
    fn test_activate_commits_and_reveals_next_frame() {
        let (mut sw, mut frames, mut loc) = setup("https://guide.local/");
        assert!(sw.activate(detect::MAC, ActivateOptions::default(), &mut frames, &mut loc));
        assert_consistent(&sw);

        // Commit phase: active but not yet visible
        let panel = sw.active_panel().unwrap();
        assert_eq!(panel.key, detect::MAC);
        assert!(!panel.visible);

        // Reveal phase
        for reveal in frames.drain() {
            assert!(sw.reveal(reveal).is_none());
        }
        assert!(sw.active_panel().unwrap().visible);
        assert!(!sw.active_panel().unwrap().focused);
        assert_consistent(&sw);
    }

    #[test]
    fn test_activate_replaces_fragment() {
        let (mut sw, mut frames, mut loc) = setup("https://guide.local/#mac");
        sw.activate(detect::WINDOWS_CHROME, ActivateOptions::default(), &mut frames, &mut loc);
        assert_eq!(loc.fragment().as_deref(), Some(detect::WINDOWS_CHROME));
        assert_eq!(loc.history_len(), 1);
    }

    #[test]
    fn test_focus_panel_moves_focus_without_scroll() {
        let (mut sw, mut frames, mut loc) = setup("https://guide.local/");
        sw.activate(detect::MAC, ActivateOptions::focus_panel(), &mut frames, &mut loc);
        assert!(!sw.active_panel().unwrap().focused);

        let reveals = frames.drain();
        assert_eq!(reveals.len(), 1);
        let focus = sw.reveal(reveals[0].clone()).unwrap();
        assert_eq!(focus.key, detect::MAC);
        assert!(focus.prevent_scroll);
        assert!(sw.active_panel().unwrap().focused);
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let (mut sw, mut frames, mut loc) = setup("https://guide.local/");
        sw.activate(detect::MAC, ActivateOptions::default(), &mut frames, &mut loc);
        frames.drain().into_iter().for_each(|r| {
            sw.reveal(r);
        });
        let before = sw.clone();

        assert!(!sw.activate("linux", ActivateOptions::default(), &mut frames, &mut loc));
        assert!(frames.is_empty());
        assert_eq!(sw.tabs(), before.tabs());
        assert_eq!(sw.panels(), before.panels());
        assert_eq!(loc.fragment().as_deref(), Some(detect::MAC));
    }

    #[test]
    fn test_tab_without_panel_is_noop() {
        let mut sw = PanelSwitcher::from_markup(["a", "b"], ["a"]);
        let mut frames = FrameQueue::new();
        let mut loc = SessionLocation::parse("https://guide.local/").unwrap();
        assert!(sw.activate("a", ActivateOptions::default(), &mut frames, &mut loc));
        assert!(!sw.activate("b", ActivateOptions::default(), &mut frames, &mut loc));
        assert_eq!(sw.selected_key(), Some("a"));
    }

    #[test]
    fn test_activate_twice_is_idempotent() {
        let (mut sw, mut frames, mut loc) = setup("https://guide.local/");
        sw.activate(detect::MAC, ActivateOptions::default(), &mut frames, &mut loc);
        frames.drain().into_iter().for_each(|r| {
            sw.reveal(r);
        });
        let once = (sw.tabs().to_vec(), sw.panels().to_vec(), loc.url().clone());

        sw.activate(detect::MAC, ActivateOptions::default(), &mut frames, &mut loc);
        frames.drain().into_iter().for_each(|r| {
            sw.reveal(r);
        });
        let twice = (sw.tabs().to_vec(), sw.panels().to_vec(), loc.url().clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_stale_reveal_is_dropped() {
        let (mut sw, mut frames, mut loc) = setup("https://guide.local/");
        sw.activate(detect::MAC, ActivateOptions::focus_panel(), &mut frames, &mut loc);
        sw.activate(detect::IPHONE_SAFARI, ActivateOptions::default(), &mut frames, &mut loc);

        let reveals = frames.drain();
        assert_eq!(reveals.len(), 2);
        let focus: Vec<_> = reveals.into_iter().filter_map(|r| sw.reveal(r)).collect();
        assert!(focus.is_empty(), "stale focus request must not fire");

        let mac = sw.panels().iter().find(|p| p.key == detect::MAC).unwrap();
        assert!(!mac.visible);
        assert_consistent(&sw);
    }

    #[test]
    fn test_initialize_prefers_valid_fragment() {
        let (mut sw, mut frames, mut loc) = setup("https://guide.local/#windows-chrome");
        let key = sw.initialize(&detection(detect::MAC), &mut frames, &mut loc);
        assert_eq!(key.as_deref(), Some(detect::WINDOWS_CHROME));
        assert_consistent(&sw);
    }

    #[test]
    fn test_initialize_ignores_invalid_fragment() {
        let (mut sw, mut frames, mut loc) = setup("https://guide.local/#nonsense");
        let key = sw.initialize(&detection(detect::MAC), &mut frames, &mut loc);
        assert_eq!(key.as_deref(), Some(detect::MAC));
        assert_eq!(loc.fragment().as_deref(), Some(detect::MAC));
    }

    #[test]
    fn test_fragment_round_trip_overrides_detection() {
        let (mut sw, mut frames, mut loc) = setup("https://guide.local/");
        sw.initialize(&detection(detect::MAC), &mut frames, &mut loc);
        sw.activate(detect::ANDROID_CHROME, ActivateOptions::default(), &mut frames, &mut loc);

        // Reload from the same address: fresh switcher, same fragment
        let mut reloaded = PanelSwitcher::new(KEYS);
        let mut loc2 = SessionLocation::parse(loc.url().as_str()).unwrap();
        let key = reloaded.initialize(&detection(detect::MAC), &mut FrameQueue::new(), &mut loc2);
        assert_eq!(key.as_deref(), Some(detect::ANDROID_CHROME));
    }

    #[test]
    fn test_navigation_event_reinitializes() {
        let (mut sw, mut frames, mut loc) = setup("https://guide.local/#mac");
        sw.initialize(&detection(detect::ANDROID_CHROME), &mut frames, &mut loc);
        loc.navigate_fragment(detect::IPHONE_SAFARI);
        sw.initialize(&detection(detect::ANDROID_CHROME), &mut frames, &mut loc);
        assert_eq!(sw.selected_key(), Some(detect::IPHONE_SAFARI));

        loc.back();
        sw.initialize(&detection(detect::ANDROID_CHROME), &mut frames, &mut loc);
        assert_eq!(sw.selected_key(), Some(detect::MAC));
        assert_consistent(&sw);
    }

    #[test]
    fn test_invariant_holds_over_random_sequence() {
        let (mut sw, mut frames, mut loc) = setup("https://guide.local/");
        sw.initialize(&detection(detect::MAC), &mut frames, &mut loc);
        let script = ["mac", "x", "iphone-safari", "", "mac", "windows-chrome", "android-chrome"];
        for (i, key) in script.iter().enumerate() {
            let opts = ActivateOptions {
                focus_panel: i % 2 == 0,
            };
            sw.activate(key, opts, &mut frames, &mut loc);
            if i % 3 == 0 {
                frames.drain().into_iter().for_each(|r| {
                    sw.reveal(r);
                });
            }
            assert_consistent(&sw);
        }
    }

    #[test]
    fn test_blur_panel() {
        let (mut sw, mut frames, mut loc) = setup("https://guide.local/");
        sw.activate(detect::MAC, ActivateOptions::focus_panel(), &mut frames, &mut loc);
        frames.drain().into_iter().for_each(|r| {
            sw.reveal(r);
        });
        sw.blur_panel();
        assert!(sw.panels().iter().all(|p| !p.focused));
    }
}
