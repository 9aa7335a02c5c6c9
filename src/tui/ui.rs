// UI layout - one frame of the TUI
//
// [title] [feed | emote browser] [logs (toggle)] [status]

use super::app::{App, View};
use super::components::{emote_panel, feed_panel, logs_panel, status_bar, title_bar};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

/// Height of the logs panel when shown
const LOGS_HEIGHT: u16 = 10;

pub fn draw(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(bg_block, f.area());

    let mut constraints = vec![Constraint::Length(3), Constraint::Min(5)];
    if app.show_logs {
        constraints.push(Constraint::Length(LOGS_HEIGHT));
    }
    constraints.push(Constraint::Length(2));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    title_bar::render(f, chunks[0], app);

    match app.view {
        View::Feed => feed_panel::render(f, chunks[1], app),
        View::Emotes => emote_panel::render(f, chunks[1], app),
    }

    if app.show_logs {
        logs_panel::render(f, chunks[2], app);
    }

    status_bar::render(f, chunks[chunks.len() - 1], app);

    if let Some(toast) = &app.toast {
        toast.render(f, f.area(), &app.theme);
    }
}
