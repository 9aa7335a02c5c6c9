//! Logs panel component
//!
//! Displays the in-memory log buffer with color-coded severity. Follows the
//! newest entry like a tail.

use super::scrollbar::{render_scrollbar, ScrollbarStyle};
use crate::logging::{LogEntry, LogLevel};
use crate::tui::app::App;
use crate::tui::scroll::ScrollState;
use crate::tui::theme::Theme;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub struct LogsPanel {
    scroll: ScrollState,
}

impl LogsPanel {
    pub fn new() -> Self {
        Self {
            scroll: ScrollState::new(),
        }
    }

    /// Sync dimensions with the current entries (call each frame)
    pub fn sync_entries(&mut self, entries: &[LogEntry], viewport_height: usize) {
        self.scroll.update_dimensions(entries.len(), viewport_height);
    }

    pub fn render_with_entries(&self, f: &mut Frame, area: Rect, entries: &[LogEntry], theme: &Theme) {
        let width = area.width.saturating_sub(3) as usize;
        let (start, end) = self.scroll.visible_range();

        let items: Vec<ListItem> = entries[start..end]
            .iter()
            .map(|entry| {
                let style = Style::default().fg(theme.log_level(entry.level));
                let style = if entry.level == LogLevel::Error {
                    style.add_modifier(Modifier::BOLD)
                } else {
                    style
                };
                ListItem::new(truncate_to_width(&format_log_entry(entry), width)).style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.panel_logs))
                .title(" System Logs "),
        );

        f.render_widget(list, area);
        render_scrollbar(f, area, &self.scroll, ScrollbarStyle::Minimal);
    }
}

impl Default for LogsPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn format_log_entry(entry: &LogEntry) -> String {
    // Module path below the crate root, e.g. "emotes::aggregator"
    let module = entry
        .target
        .strip_prefix("chatweave")
        .map(|rest| rest.trim_start_matches("::"))
        .unwrap_or(&entry.target);
    if module.is_empty() {
        format!(
            "[{}] {:5} {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.level.as_str(),
            entry.message
        )
    } else {
        format!(
            "[{}] {:5} {}: {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.level.as_str(),
            module,
            entry.message
        )
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let height = area.height.saturating_sub(2) as usize;
    let entries = app.log_buffer.get_all();

    app.logs_panel.sync_entries(&entries, height);
    app.logs_panel
        .render_with_entries(f, area, &entries, &app.theme);
}
