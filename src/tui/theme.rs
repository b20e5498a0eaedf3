// Colors for the guide panel
//
// One fixed palette; the terminal's own background shows through.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

#[derive(Debug, Clone)]
pub struct Palette {
    pub foreground: Color,
    pub muted: Color,
    pub highlight: Color,
    pub accent: Color,
    pub warning: Color,
    pub error: Color,
    pub border_type: BorderType,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: Color::Reset,
            muted: Color::DarkGray,
            highlight: Color::Cyan,
            accent: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            border_type: BorderType::Rounded,
        }
    }
}

impl Palette {
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.highlight)
        } else {
            Style::default().fg(self.muted)
        }
    }
}
