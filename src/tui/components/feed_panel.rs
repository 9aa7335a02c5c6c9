//! Feed panel component
//!
//! Two halves:
//! - `FeedViewport`: row geometry of the feed. Executes the controller's
//!   scroll commands, keeps a paused view anchored to the message at its top
//!   while the buffer grows, evicts or gets refiltered, and steps animated
//!   jumps.
//! - Presentation: turns a message and its segments into styled lines
//!   (decoration bar, timestamp, badges, username, segments).

use std::collections::HashMap;
use std::time::Instant;

use super::scrollbar::{render_scrollbar_raw, ScrollbarStyle};
use crate::config::{RenderConfig, UsernameColor};
use crate::models::ChatMessage;
use crate::render::RenderSegment;
use crate::tui::app::App;
use crate::tui::scroll::{ScrollCommand, ScrollMetrics, ScrollOrigin};
use crate::tui::theme::Theme;
use crate::util::wrap_spans;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

// ═══════════════════════════════════════════════════════════════════════════
// Viewport
// ═══════════════════════════════════════════════════════════════════════════

/// Row-based viewport over the visible feed
#[derive(Debug, Clone, Default)]
pub struct FeedViewport {
    /// First visible row
    top: usize,
    /// Total rendered rows
    total: usize,
    /// Visible rows
    height: usize,
    /// Message id and first row, per message, from the last layout
    rows: Vec<(String, usize)>,
    /// Instant snap to the bottom requested
    pending_snap: bool,
    /// Animated jump in progress
    animating: bool,
}

impl FeedViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a scroll command from the follow controller
    pub fn request(&mut self, cmd: ScrollCommand) {
        match cmd {
            ScrollCommand::ToBottom { animated: false } => {
                self.pending_snap = true;
                self.animating = false;
            }
            ScrollCommand::ToBottom { animated: true } => {
                self.animating = true;
            }
        }
    }

    /// Recompute geometry for a new frame
    ///
    /// `rows` lists each visible message's id and rendered row count, oldest
    /// first. Returns who moved the top row, if it moved: a snap or a running
    /// jump animation is `Programmatic`; a re-anchor or clamp after reflow
    /// (growth, eviction, refilter, resize) is `Unattributed`.
    pub fn layout(
        &mut self,
        rows: &[(String, usize)],
        height: usize,
        following: bool,
    ) -> Option<ScrollOrigin> {
        let was_at_bottom = self.top >= self.max_top();
        let anchor = self.anchor();
        let previous_top = self.top;

        let mut starts = Vec::with_capacity(rows.len());
        let mut total = 0;
        for (id, count) in rows {
            starts.push((id.clone(), total));
            total += count;
        }
        let previous_rows = std::mem::replace(&mut self.rows, starts);
        self.total = total;
        self.height = height;

        let snapped = following && (self.pending_snap || (was_at_bottom && !self.animating));
        if snapped {
            self.top = self.max_top();
            self.animating = false;
        } else if let Some((index, offset)) = anchor {
            self.top = self.restore_anchor(&previous_rows, index, offset);
        }
        self.top = self.top.min(self.max_top());
        // A paused viewport never executes a stale snap
        self.pending_snap = false;

        if self.top == previous_top {
            None
        } else if snapped || self.animating {
            Some(ScrollOrigin::Programmatic)
        } else {
            Some(ScrollOrigin::Unattributed)
        }
    }

    /// Index into `rows` of the message at the top, and how far into it
    fn anchor(&self) -> Option<(usize, usize)> {
        let index = self
            .rows
            .iter()
            .rposition(|(_, start)| *start <= self.top)?;
        Some((index, self.top - self.rows[index].1))
    }

    /// Top row that keeps the anchored message in place
    ///
    /// If the anchor message is gone (evicted, filtered out), the next
    /// surviving message takes its place.
    fn restore_anchor(&self, previous: &[(String, usize)], index: usize, offset: usize) -> usize {
        let starts: HashMap<&str, usize> = self
            .rows
            .iter()
            .map(|(id, start)| (id.as_str(), *start))
            .collect();

        if let Some(start) = previous.get(index).and_then(|(id, _)| starts.get(id.as_str())) {
            return start + offset;
        }
        previous
            .iter()
            .skip(index + 1)
            .find_map(|(id, _)| starts.get(id.as_str()).copied())
            .unwrap_or(0)
    }

    /// Advance an animated jump by one frame; true if the top row moved
    pub fn step_animation(&mut self) -> bool {
        if !self.animating {
            return false;
        }
        let target = self.max_top();
        if self.top >= target {
            self.top = target;
            self.animating = false;
            return false;
        }
        let step = ((target - self.top) / 3).max(1);
        self.top = (self.top + step).min(target);
        if self.top == target {
            self.animating = false;
        }
        true
    }

    /// User scroll by `rows` (negative is up); cancels an animation
    pub fn scroll_by(&mut self, rows: isize) {
        self.animating = false;
        let top = self.top as isize + rows;
        self.top = top.clamp(0, self.max_top() as isize) as usize;
    }

    /// Geometry in pixel-equivalents for the follow controller
    pub fn metrics(&self, row_px: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.top as f64 * row_px,
            content_height: self.total as f64 * row_px,
            viewport_height: self.height as f64 * row_px,
        }
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    fn max_top(&self) -> usize {
        self.total.saturating_sub(self.height)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Presentation
// ═══════════════════════════════════════════════════════════════════════════

const DECORATION: &str = "▌";

/// Left-edge decoration color: favorite > mod > vip (vip not for subs)
pub fn decoration_color(
    message: &ChatMessage,
    favorite: bool,
    render: &RenderConfig,
    theme: &Theme,
) -> Option<Color> {
    if favorite {
        Some(theme.favorite)
    } else if message.is_mod {
        Some(render.mod_color(message.platform).unwrap_or(theme.info))
    } else if message.is_vip && !message.is_sub() {
        Some(render.vip_color(message.platform).unwrap_or(theme.highlight))
    } else {
        None
    }
}

/// Username color: static override, else message color, else gold for
/// favorites, else the default foreground
pub fn username_color(
    message: &ChatMessage,
    favorite: bool,
    render: &RenderConfig,
    theme: &Theme,
) -> Color {
    if render.username_color == UsernameColor::Static {
        return render.static_color().unwrap_or(theme.foreground);
    }
    if let Some(color) = message.color.as_deref().and_then(crate::config::parse_hex) {
        return color;
    }
    if favorite {
        theme.favorite
    } else {
        theme.foreground
    }
}

/// Badge spans (role badges and platform tag)
fn badge_spans(message: &ChatMessage, render: &RenderConfig, theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let badge = |text: &'static str, color: Color| {
        Span::styled(
            format!("{} ", text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    };

    if message.is_mod {
        spans.push(badge("MOD", render.mod_color(message.platform).unwrap_or(theme.info)));
    }
    if message.is_vip {
        spans.push(badge(
            "VIP",
            render.vip_color(message.platform).unwrap_or(theme.highlight),
        ));
    }
    if message.is_member {
        spans.push(badge("MEMBER", render.member_color().unwrap_or(theme.info)));
    }
    spans.push(Span::styled(
        format!("{} ", message.platform.tag()),
        Style::default().fg(theme.platform(message.platform)),
    ));
    spans
}

fn segment_span(segment: &RenderSegment, theme: &Theme) -> Span<'static> {
    match segment {
        RenderSegment::Text(text) => {
            Span::styled(text.clone(), Style::default().fg(theme.foreground))
        }
        RenderSegment::Emote { alt, .. } => Span::styled(
            alt.clone(),
            Style::default().fg(theme.emote).add_modifier(Modifier::ITALIC),
        ),
        RenderSegment::Mention { text, highlight: true } => Span::styled(
            text.clone(),
            Style::default()
                .fg(theme.highlight)
                .bg(theme.mention_highlight_bg)
                .add_modifier(Modifier::BOLD),
        ),
        RenderSegment::Mention { text, highlight: false } => Span::styled(
            text.clone(),
            Style::default().fg(theme.mention).add_modifier(Modifier::BOLD),
        ),
    }
}

/// Styled, wrapped lines for one message
///
/// `width` is the usable column count including the decoration column.
pub fn message_lines(
    message: &ChatMessage,
    segments: &[RenderSegment],
    favorite: bool,
    render: &RenderConfig,
    theme: &Theme,
    width: usize,
) -> Vec<Line<'static>> {
    let content_width = width.saturating_sub(1).max(1);
    let mut lines = Vec::new();

    if message.is_sub() {
        if let Some(system) = &message.system_message {
            let spans = vec![Span::styled(
                format!("✦ {}", system),
                Style::default()
                    .fg(theme.system_text)
                    .add_modifier(Modifier::ITALIC),
            )];
            lines.extend(wrap_spans(spans, content_width));
        }
    }

    // A sub notice without a personal message is just the system line
    let has_body = !segments.is_empty() || !message.is_sub() || message.system_message.is_none();
    if has_body {
        let mut spans = Vec::new();
        if render.show_timestamp {
            spans.push(Span::styled(
                format!("{} ", message.timestamp.format("%H:%M")),
                Style::default().fg(theme.muted),
            ));
        }
        if render.show_badges {
            spans.extend(badge_spans(message, render, theme));
        }
        if favorite {
            spans.push(Span::styled("★ ", Style::default().fg(theme.favorite)));
        }
        spans.push(Span::styled(
            message.username.clone(),
            Style::default()
                .fg(username_color(message, favorite, render, theme))
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(": ", Style::default().fg(theme.muted)));
        spans.extend(segments.iter().map(|s| segment_span(s, theme)));
        lines.extend(wrap_spans(spans, content_width));
    }

    let bar = match decoration_color(message, favorite, render, theme) {
        Some(color) => Span::styled(DECORATION, Style::default().fg(color)),
        None => Span::raw(" "),
    };
    for line in &mut lines {
        line.spans.insert(0, bar.clone());
    }
    lines
}

// ═══════════════════════════════════════════════════════════════════════════
// Render Entry Point
// ═══════════════════════════════════════════════════════════════════════════

/// Render the feed using App's viewport and follow state
pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let height = area.height.saturating_sub(2) as usize;
    // Borders plus one column for the scrollbar
    let width = area.width.saturating_sub(3) as usize;

    let catalog = app.catalog();
    let filter = &app.filter;
    let visible = app.feed.current_view(|m| filter.matches(m));

    let mut rows = Vec::with_capacity(visible.len());
    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in visible {
        let favorite = app.is_favorite(&message.username);
        let segments = app
            .annotations
            .get_or_annotate(message, &catalog, &app.highlights);
        let message_lines =
            message_lines(message, segments, favorite, &app.config.render, &app.theme, width);
        rows.push((message.id.clone(), message_lines.len()));
        lines.extend(message_lines);
    }

    app.apply_layout(&rows, height, Instant::now());

    let top = app.viewport.top();
    let shown: Vec<Line> = lines.into_iter().skip(top).take(height).collect();

    let title = if app.filter.is_active() {
        format!(" Feed [{}] ", app.filter.describe())
    } else {
        " Feed ".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.panel_feed))
        .title(title);

    let empty = shown.is_empty();
    let paragraph = if empty {
        Paragraph::new(Line::from(Span::styled(
            "Waiting for messages...",
            Style::default().fg(app.theme.muted),
        )))
        .alignment(Alignment::Center)
    } else {
        Paragraph::new(shown)
    };
    f.render_widget(paragraph.block(block), area);

    render_scrollbar_raw(
        f,
        area,
        app.viewport.total(),
        height,
        top,
        ScrollbarStyle::Arrows,
    );

    if app.follow.show_more_indicator() && area.height > 2 {
        render_more_indicator(f, area, app.follow.unseen(), &app.theme);
    }
}

/// "More messages" pill along the bottom border
fn render_more_indicator(f: &mut Frame, area: Rect, unseen: usize, theme: &Theme) {
    let text = if unseen > 0 {
        format!(" More messages ↓ ({} new) ", unseen)
    } else {
        " More messages ↓ ".to_string()
    };
    let width = (text.chars().count() as u16).min(area.width.saturating_sub(2));
    let pill = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + area.height - 2,
        width,
        height: 1,
    };
    f.render_widget(Clear, pill);
    f.render_widget(
        Paragraph::new(text).style(
            Style::default()
                .fg(theme.background)
                .bg(theme.indicator)
                .add_modifier(Modifier::BOLD),
        ),
        pill,
    );
}
