// App state - everything the TUI renders, and the operations keys trigger
//
// The event loop owns one App. Inbound messages, key presses and catalog
// completions all arrive on that single task, so nothing here is shared.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use super::components::emote_panel::EmotePanel;
use super::components::feed_panel::FeedViewport;
use super::components::toast::Toast;
use super::components::logs_panel::LogsPanel;
use super::scroll::{ScrollController, ScrollOrigin};
use super::theme::Theme;
use crate::config::Config;
use crate::emotes::{Catalog, CatalogStore};
use crate::feed::{FeedBuffer, FeedFilter};
use crate::logging::LogBuffer;
use crate::models::ChatMessage;
use crate::render::{annotate_message, HighlightSet, RenderSegment};

/// Top-level view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Feed,
    Emotes,
}

/// Where typed characters go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Editing the feed search query
    FeedSearch,
    /// Editing the emote browser filter
    EmoteSearch,
}

/// Rows moved per mouse wheel notch
pub const WHEEL_ROWS: isize = 3;

/// Annotated segments per message id, valid for one catalog generation
#[derive(Debug, Default)]
pub struct AnnotationCache {
    generation: u64,
    segments: HashMap<String, Vec<RenderSegment>>,
}

impl AnnotationCache {
    /// Segments for `message`, annotating on first use
    pub fn get_or_annotate(
        &mut self,
        message: &ChatMessage,
        catalog: &Catalog,
        highlights: &HighlightSet,
    ) -> &[RenderSegment] {
        if catalog.generation() != self.generation {
            self.segments.clear();
            self.generation = catalog.generation();
        }
        self.segments
            .entry(message.id.clone())
            .or_insert_with(|| annotate_message(message, catalog, highlights))
    }

    /// Drop entries for messages no longer in the feed
    pub fn retain_present(&mut self, feed: &FeedBuffer) {
        self.segments.retain(|id, _| feed.contains(id));
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }
}

pub struct App {
    pub config: Config,
    pub theme: Theme,

    // ─── Feed ────────────────────────────────────────────────
    pub feed: FeedBuffer,
    pub filter: FeedFilter,
    pub highlights: HighlightSet,
    pub follow: ScrollController,
    pub viewport: FeedViewport,
    pub annotations: AnnotationCache,
    /// Messages accepted / dropped as duplicates since start
    pub accepted: u64,
    pub duplicates: u64,

    // ─── Catalog ─────────────────────────────────────────────
    pub catalogs: CatalogStore,

    // ─── Views ───────────────────────────────────────────────
    pub view: View,
    pub input_mode: InputMode,
    pub emote_panel: EmotePanel,
    pub show_logs: bool,
    pub logs_panel: LogsPanel,
    pub log_buffer: LogBuffer,

    pub source_label: String,
    pub toast: Option<Toast>,
    pub should_quit: bool,
    pub start_time: Instant,
    animation_frame: usize,
}

impl App {
    pub fn new(config: Config, log_buffer: LogBuffer, source_label: impl Into<String>) -> Self {
        let highlights = HighlightSet::new(&config.feed.highlight_terms);
        let follow = ScrollController::new(config.scroll.tuning());
        let feed = FeedBuffer::with_capacity(config.feed.capacity);

        Self {
            theme: Theme::default(),
            feed,
            filter: FeedFilter::default(),
            highlights,
            follow,
            viewport: FeedViewport::new(),
            annotations: AnnotationCache::default(),
            accepted: 0,
            duplicates: 0,
            catalogs: CatalogStore::new(),
            view: View::Feed,
            input_mode: InputMode::Normal,
            emote_panel: EmotePanel::new(),
            show_logs: false,
            logs_panel: LogsPanel::new(),
            log_buffer,
            source_label: source_label.into(),
            toast: None,
            should_quit: false,
            start_time: Instant::now(),
            animation_frame: 0,
            config,
        }
    }

    // ─── Feed mutations ──────────────────────────────────────

    /// Offer an inbound message to the feed
    pub fn ingest(&mut self, message: ChatMessage, now: Instant) {
        let visible = self.filter.matches(&message);
        if !self.feed.append(message) {
            self.duplicates += 1;
            return;
        }
        self.accepted += 1;
        self.annotations.retain_present(&self.feed);
        self.buffer_mutated(usize::from(visible), now);
    }

    /// Empty the feed
    pub fn clear_feed(&mut self, now: Instant) {
        self.feed.clear();
        self.annotations.clear();
        self.buffer_mutated(0, now);
    }

    /// Replace the filter; the visible window changes like a mutation
    pub fn set_filter(&mut self, filter: FeedFilter, now: Instant) {
        if filter == self.filter {
            return;
        }
        self.filter = filter;
        self.buffer_mutated(0, now);
    }

    /// Apply a change to a copy of the current filter
    pub fn update_filter(&mut self, now: Instant, change: impl FnOnce(&mut FeedFilter)) {
        let mut filter = self.filter.clone();
        change(&mut filter);
        self.set_filter(filter, now);
    }

    fn buffer_mutated(&mut self, appended: usize, now: Instant) {
        if let Some(cmd) = self.follow.on_buffer_mutated(appended, now) {
            self.viewport.request(cmd);
        }
    }

    /// Messages that pass the current filter
    pub fn visible_messages(&self) -> Vec<&ChatMessage> {
        self.feed.current_view(|m| self.filter.matches(m))
    }

    // ─── Feed scrolling ──────────────────────────────────────

    /// User-driven scroll by `rows` (negative is up)
    pub fn scroll_feed(&mut self, rows: isize, now: Instant) {
        self.viewport.scroll_by(rows);
        let metrics = self.viewport.metrics(self.config.render.row_px());
        self.follow.on_scroll(ScrollOrigin::User, metrics, now);
    }

    pub fn page_rows(&self) -> isize {
        self.viewport.height().saturating_sub(1).max(1) as isize
    }

    /// Explicit jump to the newest message
    pub fn jump_to_latest(&mut self, now: Instant) {
        let cmd = self.follow.jump_to_latest(now);
        self.viewport.request(cmd);
    }

    /// Lay out the feed for a frame and report any position change it caused
    pub fn apply_layout(&mut self, rows: &[(String, usize)], height: usize, now: Instant) {
        let following = self.follow.is_following();
        if let Some(origin) = self.viewport.layout(rows, height, following) {
            self.report_scroll(origin, now);
        }
    }

    fn report_scroll(&mut self, origin: ScrollOrigin, now: Instant) {
        let metrics = self.viewport.metrics(self.config.render.row_px());
        self.follow.on_scroll(origin, metrics, now);
    }

    // ─── Catalog ─────────────────────────────────────────────

    /// Start a new catalog generation; the caller spawns the build
    pub fn begin_catalog_rebuild(&mut self) -> u64 {
        self.catalogs.begin_rebuild()
    }

    /// Install a finished catalog if it is still the latest requested
    pub fn install_catalog(&mut self, catalog: Catalog) -> bool {
        let installed = self.catalogs.install(catalog);
        if installed {
            self.emote_panel.clamp_selection(&self.catalogs.current());
        }
        installed
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalogs.current()
    }

    // ─── Favorites ───────────────────────────────────────────

    pub fn is_favorite(&self, username: &str) -> bool {
        self.config.feed.is_favorite(username)
    }

    // ─── Views / input ───────────────────────────────────────

    pub fn toggle_emotes(&mut self) {
        self.view = match self.view {
            View::Feed => View::Emotes,
            View::Emotes => View::Feed,
        };
        self.input_mode = InputMode::Normal;
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
    }

    pub fn begin_search(&mut self) {
        self.input_mode = match self.view {
            View::Feed => InputMode::FeedSearch,
            View::Emotes => InputMode::EmoteSearch,
        };
    }

    /// Text typed while a search input is active
    pub fn search_push(&mut self, c: char, now: Instant) {
        match self.input_mode {
            InputMode::FeedSearch => self.update_filter(now, |f| f.query.push(c)),
            InputMode::EmoteSearch => {
                self.emote_panel.query.push(c);
                self.emote_panel.reset_selection();
            }
            InputMode::Normal => {}
        }
    }

    pub fn search_backspace(&mut self, now: Instant) {
        match self.input_mode {
            InputMode::FeedSearch => self.update_filter(now, |f| {
                f.query.pop();
            }),
            InputMode::EmoteSearch => {
                self.emote_panel.query.pop();
                self.emote_panel.reset_selection();
            }
            InputMode::Normal => {}
        }
    }

    /// Leave the search input; `discard` also clears the query
    pub fn end_search(&mut self, discard: bool, now: Instant) {
        if discard {
            match self.input_mode {
                InputMode::FeedSearch => self.update_filter(now, |f| f.query.clear()),
                InputMode::EmoteSearch => {
                    self.emote_panel.query.clear();
                    self.emote_panel.reset_selection();
                }
                InputMode::Normal => {}
            }
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn show_toast(&mut self, message: impl Into<String>, now: Instant) {
        self.toast = Some(Toast::new(message, now));
    }

    // ─── Ticks ───────────────────────────────────────────────

    /// Advance animations and expire the toast
    pub fn tick(&mut self, now: Instant) {
        self.animation_frame = self.animation_frame.wrapping_add(1);

        if self.viewport.step_animation() {
            self.report_scroll(ScrollOrigin::Programmatic, now);
        }

        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }

    /// Spinner frame for in-flight work
    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        SPINNER[(self.animation_frame / 2) % SPINNER.len()]
    }

    /// Formatted uptime (e.g., "1h 23m 45s")
    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
        if h > 0 {
            format!("{}h {:02}m {:02}s", h, m, s)
        } else if m > 0 {
            format!("{}m {:02}s", m, s)
        } else {
            format!("{}s", s)
        }
    }
}
