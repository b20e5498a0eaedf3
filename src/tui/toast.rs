//! Toast notification
//!
//! A non-blocking overlay that auto-dismisses. Renders in the bottom-right
//! corner on top of all other content.

use super::theme::Palette;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

const DEFAULT_DURATION: Duration = Duration::from_secs(2);

pub struct Toast {
    pub message: String,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            created_at: Instant::now(),
            duration: DEFAULT_DURATION,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    pub fn render(&self, f: &mut Frame, area: Rect, palette: &Palette) {
        // Display width, not byte length: labels are often Arabic
        let width = (self.message.width() as u16 + 4).min(area.width.saturating_sub(4));
        let height = 3;

        let x = area.right().saturating_sub(width + 2);
        let y = area.bottom().saturating_sub(height + 2);
        let toast_area = Rect::new(x, y, width, height).intersection(area);
        if toast_area.is_empty() {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(palette.border_type)
            .border_style(Style::default().fg(palette.highlight));

        let text = Paragraph::new(self.message.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.foreground))
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(text, toast_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_fresh_toast_is_live() {
        let toast = Toast::new("English");
        assert!(!toast.is_expired());
    }

    fn render_on(width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let toast = Toast::new("English");
        terminal
            .draw(|f| {
                let screen = f.area();
                toast.render(f, screen, &Palette::default());
            })
            .unwrap();
        terminal
    }

    #[test]
    fn test_renders_inside_small_screens() {
        for (width, height) in [(80, 2), (80, 4), (3, 30), (1, 1)] {
            render_on(width, height);
        }
    }

    #[test]
    fn test_renders_message_bottom_right() {
        let terminal = render_on(40, 10);
        let buffer = terminal.backend().buffer();
        let row: String = (0..40)
            .map(|x| buffer[(x, 6)].symbol().to_string())
            .collect();
        assert!(row.contains("English"));
    }

    #[test]
    fn test_zero_duration_expires() {
        let toast = Toast {
            duration: Duration::ZERO,
            ..Toast::new("x")
        };
        assert!(toast.is_expired());
    }
}
