// UI rendering
//
// Layout, top to bottom: header (detected device + language button), tab
// strip, active panel, system logs, key hints. The language menu and the
// toast render as overlays.

use super::app::{App, Focus};
use super::theme::Palette;
use crate::guide;
use crate::language::{LanguageState, TextDirection};
use crate::logging::LogEntry;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};
use tracing::Level;
use unicode_width::UnicodeWidthStr;

const TAB_PADDING: &str = " ";
const TAB_DIVIDER: &str = "│";

/// Main render function, called on every frame
///
/// Records the interactive regions in `app.hit_areas` for mouse handling.
pub fn draw(f: &mut Frame, app: &mut App) {
    let palette = Palette::default();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Tab strip
            Constraint::Min(6),    // Active panel
            Constraint::Length(6), // System logs
            Constraint::Length(1), // Key hints
        ])
        .split(f.area());

    render_header(f, chunks[0], app, &palette);
    render_tabs(f, chunks[1], app, &palette);
    render_panel(f, chunks[2], app, &palette);
    render_logs(f, chunks[3], app);
    render_hints(f, chunks[4], app, &palette);

    app.hit_areas.language_menu = None;
    if app.focus == Focus::LanguageMenu {
        render_language_menu(f, app, &palette);
    }

    let screen = f.area();
    if let Some(toast) = &app.toast {
        toast.render(f, screen, &palette);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Header
// ─────────────────────────────────────────────────────────────────────────────

fn language_button_text(app: &App) -> String {
    let pending = matches!(app.language.state(), LanguageState::Pending { .. })
        && app.active_retry().is_some();
    format!(
        " {} {} ",
        app.language.selector().button_label,
        if pending { "…" } else { "▾" }
    )
}

fn render_header(f: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let button = language_button_text(app);
    let button_width = button.width() as u16 + 2;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(button_width)])
        .split(area);

    let detected = Paragraph::new(Line::from(vec![
        Span::styled("● ", Style::default().fg(palette.accent)),
        Span::raw(app.detection.label),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(palette.border_type)
            .border_style(palette.border(false))
            .title(format!(" guidepanel v{} ", crate::config::VERSION)),
    );
    f.render_widget(detected, columns[0]);

    let button_widget = Paragraph::new(button)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(palette.border_type)
                .border_style(palette.border(app.focus == Focus::LanguageMenu)),
        );
    f.render_widget(button_widget, columns[1]);
    app.hit_areas.language_button = columns[1];
}

fn render_language_menu(f: &mut Frame, app: &mut App, palette: &Palette) {
    let selector = app.language.selector();
    let button = app.hit_areas.language_button;

    let width = selector
        .options
        .iter()
        .map(|o| o.label.width() as u16 + 6)
        .max()
        .unwrap_or(10)
        .max(button.width);
    let height = selector.options.len() as u16 + 2;
    let screen = f.area();
    let x = button.right().saturating_sub(width).max(screen.x);
    let menu = Rect::new(x, button.bottom(), width, height).intersection(screen);

    let items: Vec<ListItem> = selector
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let marker = if option.selected { "✓ " } else { "  " };
            let style = if i == app.menu_cursor {
                palette.selected()
            } else {
                Style::default().fg(palette.foreground)
            };
            ListItem::new(format!("{}{}", marker, option.label)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(palette.border_type)
            .border_style(palette.border(true)),
    );

    f.render_widget(Clear, menu);
    f.render_widget(list, menu);
    app.hit_areas.language_menu = Some(menu);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tabs and panel
// ─────────────────────────────────────────────────────────────────────────────

/// Tab titles in strip order, in the current content language
pub fn tab_titles(app: &App) -> Vec<String> {
    let translated = app.is_translated();
    app.switcher
        .tabs()
        .iter()
        .map(|tab| {
            guide::content(&tab.key, translated)
                .map(|c| c.tab_title.to_string())
                .unwrap_or_else(|| tab.key.clone())
        })
        .collect()
}

/// Which tab sits under `column` in a strip rendered into `area`
pub fn tab_at(area: Rect, titles: &[String], column: u16) -> Option<usize> {
    // Inside the left border
    let mut x = area.x + 1;
    let pad = TAB_PADDING.width() as u16;
    let divider = TAB_DIVIDER.width() as u16;

    for (i, title) in titles.iter().enumerate() {
        let end = x + pad + title.width() as u16 + pad;
        if column >= x && column < end {
            return Some(i);
        }
        x = end + divider;
    }
    None
}

fn render_tabs(f: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let titles = tab_titles(app);
    let cursor = app.navigator.cursor();
    let strip_focused = app.focus == Focus::Tabs;

    let lines: Vec<Line> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let mut style = Style::default().fg(palette.foreground);
            if strip_focused && i == cursor {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            Line::from(Span::styled(title.clone(), style))
        })
        .collect();

    let tabs = Tabs::new(lines)
        .select(app.switcher.selected_index().unwrap_or(0))
        .highlight_style(palette.selected())
        .padding(TAB_PADDING, TAB_PADDING)
        .divider(TAB_DIVIDER)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(palette.border_type)
                .border_style(palette.border(strip_focused)),
        );

    f.render_widget(tabs, area);
    app.hit_areas.tab_strip = area;
}

fn render_panel(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(panel) = app.switcher.active_panel() else {
        f.render_widget(Block::default().borders(Borders::ALL), area);
        return;
    };
    let Some(content) = guide::content(&panel.key, app.is_translated()) else {
        return;
    };

    let alignment = match app.language.document().dir {
        TextDirection::Rtl => Alignment::Right,
        TextDirection::Ltr => Alignment::Left,
    };

    // Not yet revealed: the frame before the entry transition
    let body_style = if panel.visible {
        Style::default().fg(palette.foreground)
    } else {
        Style::default().fg(palette.muted)
    };

    let mut lines = vec![
        Line::from(Span::styled(
            content.heading,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    lines.extend(
        content
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| Line::from(format!("{}. {}", i + 1, step))),
    );

    let paragraph = Paragraph::new(lines)
        .alignment(alignment)
        .style(body_style)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(palette.border_type)
                .border_style(palette.border(panel.focused)),
        );

    f.render_widget(paragraph, area);
}

// ─────────────────────────────────────────────────────────────────────────────
// Footer
// ─────────────────────────────────────────────────────────────────────────────

fn render_logs(f: &mut Frame, area: Rect, app: &App) {
    let height = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .log_buffer
        .recent(height)
        .iter()
        .map(|entry| ListItem::new(format_log_entry(entry)).style(log_level_style(entry.level)))
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Logs "));
    f.render_widget(list, area);
}

fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {:5} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

fn log_level_style(level: Level) -> Style {
    let palette = Palette::default();
    match level {
        Level::ERROR => Style::default()
            .fg(palette.error)
            .add_modifier(Modifier::BOLD),
        Level::WARN => Style::default().fg(palette.warning),
        Level::INFO => Style::default().fg(palette.highlight),
        _ => Style::default().fg(palette.muted),
    }
}

fn render_hints(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let hints = match app.focus {
        Focus::Tabs => "←/→ Home/End move · Enter/Space open · l language · 1-4 link · Alt+←/→ history · q quit",
        Focus::Panel => "Esc/Shift+Tab back to tabs · l language · q quit",
        Focus::LanguageMenu => "↑/↓ choose · Enter select · Esc close",
    };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", app.location.url()), Style::default().fg(palette.muted)),
        Span::raw(hints),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
