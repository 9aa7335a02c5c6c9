//! Scrollbar rendering helper
//!
//! One entry point for panels with a `ScrollState` and one for raw row
//! counts (the feed, whose geometry lives in `FeedViewport`).

use crate::tui::scroll::ScrollState;
use ratatui::{
    layout::Rect,
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Visual style for the scrollbar
#[derive(Debug, Clone, Copy, Default)]
pub enum ScrollbarStyle {
    /// Arrows at top and bottom (↑ ↓)
    Arrows,
    /// Just the thumb
    #[default]
    Minimal,
}

impl ScrollbarStyle {
    fn widget(self) -> Scrollbar<'static> {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        match self {
            ScrollbarStyle::Arrows => scrollbar.begin_symbol(Some("↑")).end_symbol(Some("↓")),
            ScrollbarStyle::Minimal => scrollbar.begin_symbol(None).end_symbol(None),
        }
    }
}

/// Render a vertical scrollbar on the right edge of `area` if content overflows
pub fn render_scrollbar(f: &mut Frame, area: Rect, scroll: &ScrollState, style: ScrollbarStyle) {
    if !scroll.needs_scrollbar() {
        return;
    }
    render_scrollbar_raw(
        f,
        area,
        scroll.total(),
        scroll.viewport(),
        scroll.offset(),
        style,
    );
}

/// Render a scrollbar from raw row counts
pub fn render_scrollbar_raw(
    f: &mut Frame,
    area: Rect,
    total: usize,
    viewport: usize,
    offset: usize,
    style: ScrollbarStyle,
) {
    if total <= viewport {
        return;
    }

    // ScrollbarState wants the scrollable length, not the content length
    let content_length = total.saturating_sub(viewport);
    let mut state = ScrollbarState::new(content_length).position(offset);

    f.render_stateful_widget(style.widget(), area, &mut state);
}
