// Keyboard navigation for the tab strip
//
// Arrow keys, Home and End only move a virtual focus cursor between tabs
// (browsing is cheap). Enter and Space commit the focused tab and move
// focus into its panel. Everything else passes through untouched.

use crate::panels::frame::FrameScheduler;
use crate::panels::location::Location;
use crate::panels::{ActivateOptions, PanelSwitcher};
use crossterm::event::KeyCode;

/// Result of handling a key event
///
/// `Yes` means the key was consumed and its default effect suppressed;
/// `No` lets it bubble up to the app's own bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Yes,
    No,
}

impl Handled {
    pub fn was_handled(self) -> bool {
        self == Self::Yes
    }
}

/// Focus cursor over the tab strip
#[derive(Debug, Default, Clone)]
pub struct KeyboardNavigator {
    cursor: usize,
}

impl KeyboardNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the tab holding input focus
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Put focus on a tab, e.g. after a click or an activation
    pub fn focus(&mut self, index: usize) {
        self.cursor = index;
    }

    /// Handle a key pressed while a tab has focus
    pub fn handle_key<F, L>(
        &mut self,
        code: KeyCode,
        switcher: &mut PanelSwitcher,
        frames: &mut F,
        location: &mut L,
    ) -> Handled
    where
        F: FrameScheduler + ?Sized,
        L: Location + ?Sized,
    {
        let len = switcher.tabs().len();
        if len == 0 {
            return Handled::No;
        }
        let last = len - 1;
        let current = self.cursor.min(last);

        let next = match code {
            KeyCode::Right => (current + 1).min(last),
            KeyCode::Left => current.saturating_sub(1),
            KeyCode::Home => 0,
            KeyCode::End => last,
            KeyCode::Enter | KeyCode::Char(' ') => {
                let key = switcher.tabs()[current].key.clone();
                switcher.activate(&key, ActivateOptions::focus_panel(), frames, location);
                self.cursor = current;
                return Handled::Yes;
            }
            _ => return Handled::No,
        };

        if next == current {
            return Handled::No;
        }

        tracing::trace!(from = current, to = next, "Tab focus moved");
        self.cursor = next;
        Handled::Yes
    }
}
