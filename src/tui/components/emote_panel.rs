//! Emote browser component
//!
//! Lists the active catalog per provider, channel group first, then global,
//! filtered by a case-insensitive search on the emote code.

use super::scrollbar::{render_scrollbar, ScrollbarStyle};
use crate::emotes::{BucketStatus, Catalog, CatalogEntry, Provider, Scope};
use crate::tui::app::{App, InputMode};
use crate::tui::scroll::ScrollState;
use crate::tui::theme::Theme;
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
    Frame,
};

/// Tab order in the browser
pub const TABS: [Provider; 3] = [Provider::SevenTv, Provider::Bttv, Provider::Ffz];

/// Entries of one provider matching `query`, channel scope first
pub fn matching_entries<'a>(
    catalog: &'a Catalog,
    provider: Provider,
    query: &str,
) -> (Vec<&'a CatalogEntry>, Vec<&'a CatalogEntry>) {
    let query = query.trim().to_lowercase();
    let filter = |scope: Scope| -> Vec<&'a CatalogEntry> {
        catalog
            .entries(provider, scope)
            .iter()
            .filter(|e| query.is_empty() || e.code.to_lowercase().contains(&query))
            .collect()
    };
    (filter(Scope::Channel), filter(Scope::Global))
}

/// One displayed row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmoteRow<'a> {
    Header(String),
    Emote(&'a CatalogEntry),
}

fn group_header(catalog: &Catalog, provider: Provider, scope: Scope, count: usize) -> String {
    let label = match scope {
        Scope::Channel => "Channel",
        Scope::Global => "Global",
    };
    match catalog.bucket(provider, scope).map(|b| &b.status) {
        Some(BucketStatus::Failed(_)) => format!("{} (failed to load)", label),
        Some(BucketStatus::Skipped) => format!("{} (not loaded)", label),
        _ => format!("{} ({})", label, count),
    }
}

/// Display rows: a header per group followed by its entries
pub fn emote_rows<'a>(catalog: &'a Catalog, provider: Provider, query: &str) -> Vec<EmoteRow<'a>> {
    let (channel, global) = matching_entries(catalog, provider, query);
    let mut rows = Vec::with_capacity(channel.len() + global.len() + 2);
    rows.push(EmoteRow::Header(group_header(
        catalog,
        provider,
        Scope::Channel,
        channel.len(),
    )));
    rows.extend(channel.into_iter().map(EmoteRow::Emote));
    rows.push(EmoteRow::Header(group_header(
        catalog,
        provider,
        Scope::Global,
        global.len(),
    )));
    rows.extend(global.into_iter().map(EmoteRow::Emote));
    rows
}

pub struct EmotePanel {
    tab: usize,
    pub query: String,
    /// Index among emote rows (headers excluded)
    selected: usize,
    scroll: ScrollState,
}

impl EmotePanel {
    pub fn new() -> Self {
        Self {
            tab: 0,
            query: String::new(),
            selected: 0,
            scroll: ScrollState::manual(),
        }
    }

    pub fn provider(&self) -> Provider {
        TABS[self.tab]
    }

    pub fn next_tab(&mut self) {
        self.tab = (self.tab + 1) % TABS.len();
        self.reset_selection();
    }

    pub fn previous_tab(&mut self) {
        self.tab = (self.tab + TABS.len() - 1) % TABS.len();
        self.reset_selection();
    }

    pub fn reset_selection(&mut self) {
        self.selected = 0;
    }

    fn entry_count(&self, catalog: &Catalog) -> usize {
        let (channel, global) = matching_entries(catalog, self.provider(), &self.query);
        channel.len() + global.len()
    }

    pub fn select_next(&mut self, catalog: &Catalog) {
        if self.selected + 1 < self.entry_count(catalog) {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn page(&mut self, catalog: &Catalog, rows: isize) {
        let last = self.entry_count(catalog).saturating_sub(1);
        let next = (self.selected as isize + rows).clamp(0, last as isize);
        self.selected = next as usize;
    }

    /// Keep the selection inside the current list (after a catalog swap)
    pub fn clamp_selection(&mut self, catalog: &Catalog) {
        self.selected = self.selected.min(self.entry_count(catalog).saturating_sub(1));
    }

    /// Selected entry, if the list is not empty
    pub fn selected_entry<'a>(&self, catalog: &'a Catalog) -> Option<&'a CatalogEntry> {
        let (channel, global) = matching_entries(catalog, self.provider(), &self.query);
        channel.into_iter().chain(global).nth(self.selected)
    }

    /// Row index of the selection in `emote_rows` output
    fn selected_row(&self, catalog: &Catalog) -> usize {
        let (channel, _) = matching_entries(catalog, self.provider(), &self.query);
        if self.selected < channel.len() {
            self.selected + 1
        } else {
            self.selected + 2
        }
    }

    fn render_with_catalog(
        &mut self,
        f: &mut Frame,
        area: Rect,
        catalog: &Catalog,
        theme: &Theme,
        searching: bool,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.panel_emotes))
            .title(format!(" Emotes ({} codes) ", catalog.len()));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .split(inner);

        let titles: Vec<Line> = TABS.iter().map(|p| Line::from(p.label())).collect();
        let tabs = Tabs::new(titles)
            .select(self.tab)
            .style(Style::default().fg(theme.muted))
            .highlight_style(
                Style::default()
                    .fg(theme.panel_emotes)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, chunks[0]);

        let search_style = if searching {
            Style::default().fg(theme.highlight)
        } else {
            Style::default().fg(theme.muted)
        };
        let cursor = if searching { "▏" } else { "" };
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Search: ", search_style),
                Span::styled(format!("{}{}", self.query, cursor), search_style),
            ])),
            chunks[1],
        );

        let list_area = chunks[2];
        let height = list_area.height as usize;
        let width = list_area.width.saturating_sub(2) as usize;
        let rows = emote_rows(catalog, self.provider(), &self.query);
        let selected_row = self.selected_row(catalog);

        self.scroll.update_dimensions(rows.len(), height);
        self.scroll.ensure_visible(selected_row);
        let (start, end) = self.scroll.visible_range();

        let items: Vec<ListItem> = rows[start..end]
            .iter()
            .enumerate()
            .map(|(i, row)| match row {
                EmoteRow::Header(title) => ListItem::new(Line::from(Span::styled(
                    title.clone(),
                    Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
                ))),
                EmoteRow::Emote(entry) => {
                    let style = if start + i == selected_row {
                        Style::default()
                            .fg(theme.selection_fg)
                            .bg(theme.selection)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(theme.emote)
                    };
                    let text = format!("  {}  {}", entry.code, entry.url);
                    ListItem::new(truncate_to_width(&text, width)).style(style)
                }
            })
            .collect();

        f.render_widget(List::new(items), list_area);
        render_scrollbar(f, list_area, &self.scroll, ScrollbarStyle::Minimal);
    }
}

impl Default for EmotePanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the emote browser from App's active catalog
pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let catalog = app.catalog();
    let searching = app.input_mode == InputMode::EmoteSearch;
    app.emote_panel
        .render_with_catalog(f, area, &catalog, &app.theme, searching);
}
