// Status bar component
//
// Renders feed counters, the active filter, follow state and key hints.

use crate::tui::app::{App, InputMode, View};
use crate::tui::scroll::FollowMode;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Follow state label
pub fn follow_label(mode: FollowMode, unseen: usize) -> String {
    match mode {
        FollowMode::Following => "▼ live".to_string(),
        FollowMode::Paused if unseen > 0 => format!("⏸ paused (+{})", unseen),
        FollowMode::Paused => "⏸ paused".to_string(),
    }
}

fn key_hints(app: &App) -> &'static str {
    match (app.input_mode, app.view) {
        (InputMode::FeedSearch, _) | (InputMode::EmoteSearch, _) => "Enter:apply  Esc:cancel",
        (InputMode::Normal, View::Emotes) => {
            "←→:tab  ↑↓:select  Enter/y:copy  /:search  e:feed  q:quit"
        }
        (InputMode::Normal, View::Feed) => {
            "↑↓:scroll  G:latest  /:search  p:platform  m/v/s:roles  b:bots  x:clear  r:reload  e:emotes  l:logs  q:quit"
        }
    }
}

/// "shown/buffered msgs", flagged once the buffer evicts
pub fn count_label(shown: usize, buffered: usize, capacity: usize) -> String {
    if buffered >= capacity {
        format!("{}/{} msgs (full)", shown, buffered)
    } else {
        format!("{}/{} msgs", shown, buffered)
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut parts = vec![
        count_label(app.visible_messages().len(), app.feed.len(), app.feed.capacity()),
        format!("{} dup", app.duplicates),
        follow_label(app.follow.mode(), app.follow.unseen()),
    ];
    if app.filter.is_active() {
        parts.push(format!("filter: {}", app.filter.describe()));
    }
    if app.input_mode == InputMode::FeedSearch {
        parts.push(format!("search: {}▏", app.filter.query));
    }

    let line = Line::from(vec![
        Span::styled(
            format!(" {} │ ", parts.join(" │ ")),
            Style::default().fg(app.theme.status_bar),
        ),
        Span::styled(key_hints(app), Style::default().fg(app.theme.muted)),
    ]);

    let status = Paragraph::new(line).block(Block::default().borders(Borders::TOP));
    f.render_widget(status, area);
}
