// Title bar component
//
// Renders the app name, channel, catalog status and message source.

use crate::emotes::Catalog;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Catalog summary: building spinner, code count, failed buckets
pub fn catalog_status(catalog: &Catalog, building: Option<char>, enabled: bool) -> String {
    if !enabled {
        return "emotes off".to_string();
    }
    if let Some(spinner) = building {
        return format!("{} loading emotes", spinner);
    }
    match catalog.failed_buckets() {
        0 => format!("{} emotes", catalog.len()),
        failed => format!("{} emotes ({} sources failed)", catalog.len(), failed),
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let catalog = app.catalog();
    let building = app
        .catalogs
        .is_building()
        .then(|| app.spinner_char());
    let status = catalog_status(&catalog, building, app.config.catalog.enabled);

    let channel = app
        .config
        .channel_id
        .as_deref()
        .map(|c| format!("#{}", c))
        .unwrap_or_else(|| "no channel".to_string());

    let title_text = format!(
        " 💬 chatweave ──── {} │ {} │ {}",
        channel, status, app.source_label
    );

    let title = Paragraph::new(title_text)
        .style(
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.title))
                .title_top(Line::from(format!(" {} ", app.uptime())).right_aligned()),
        );

    f.render_widget(title, area);
}
