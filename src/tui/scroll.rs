// Scroll handling for TUI panels
//
// Two pieces:
// - ScrollState: line-offset scrolling with auto-follow for simple panels
//   (logs, emote browser)
// - ScrollController: the feed's follow/pause state machine
//
// The feed controller decides when the viewport snaps to the newest message
// and when it holds still. It must tell its own snaps apart from user input:
// programmatic scrolls are tagged, and scroll notifications whose origin is
// unknown are ignored for a short guard window after each snap.

use std::time::{Duration, Instant};

/// Scroll state for a single panel
///
/// Owns all state needed for scrolling: position, content size, viewport size.
#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Current scroll offset (line/item index at top of viewport)
    offset: usize,

    /// Total number of items/lines in content
    total: usize,

    /// Number of items/lines visible in viewport
    viewport: usize,

    /// Whether to keep the view at the bottom as content grows
    pub auto_follow: bool,
}

impl ScrollState {
    /// Create new scroll state with auto-follow enabled
    pub fn new() -> Self {
        Self {
            offset: 0,
            total: 0,
            viewport: 0,
            auto_follow: true,
        }
    }

    /// Create scroll state that starts at the top and stays there
    pub fn manual() -> Self {
        Self {
            auto_follow: false,
            ..Self::new()
        }
    }

    /// Update content and viewport dimensions (call each render frame)
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;

        if self.auto_follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    /// Scroll just enough for `index` to be inside the viewport
    pub fn ensure_visible(&mut self, index: usize) {
        if self.viewport == 0 {
            return;
        }
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + self.viewport {
            self.offset = index + 1 - self.viewport;
        }
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Visible range (start_index, end_index)
    pub fn visible_range(&self) -> (usize, usize) {
        let start = self.offset;
        let end = (self.offset + self.viewport).min(self.total);
        (start, end)
    }

    /// Check if content overflows viewport (scrollbar needed)
    pub fn needs_scrollbar(&self) -> bool {
        self.total > self.viewport
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Feed follow/pause controller
// ─────────────────────────────────────────────────────────────────────────────

/// Default distance from the bottom that still counts as "at the bottom"
pub const DEFAULT_PROXIMITY_PX: f64 = 150.0;

/// Default guard after an instant snap
pub const DEFAULT_INSTANT_GUARD: Duration = Duration::from_millis(100);

/// Default guard after an animated jump
pub const DEFAULT_ANIMATED_GUARD: Duration = Duration::from_millis(500);

/// Viewport behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowMode {
    /// Viewport snaps to the newest message on every mutation
    Following,
    /// Viewport holds position; arrivals show the "more messages" indicator
    Paused,
}

/// Who caused a scroll notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOrigin {
    /// Key press, mouse wheel, drag
    User,
    /// Issued by this controller
    Programmatic,
    /// Raw position notification without attribution; treated as user input
    /// unless it lands inside a guard window
    Unattributed,
}

/// Viewport geometry in a common unit (pixels or pixel-equivalents)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub content_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn distance_from_bottom(&self) -> f64 {
        (self.content_height - self.scroll_top - self.viewport_height).max(0.0)
    }
}

/// Scroll the owner must perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollCommand {
    ToBottom { animated: bool },
}

/// Tunables for the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTuning {
    pub proximity: f64,
    pub instant_guard: Duration,
    pub animated_guard: Duration,
}

impl Default for ScrollTuning {
    fn default() -> Self {
        Self {
            proximity: DEFAULT_PROXIMITY_PX,
            instant_guard: DEFAULT_INSTANT_GUARD,
            animated_guard: DEFAULT_ANIMATED_GUARD,
        }
    }
}

/// Feed follow/pause state machine
#[derive(Debug, Clone)]
pub struct ScrollController {
    mode: FollowMode,
    tuning: ScrollTuning,
    /// Unattributed notifications before this instant are our own echoes
    guard_until: Option<Instant>,
    /// Arrivals while paused
    unseen: usize,
}

impl ScrollController {
    pub fn new(tuning: ScrollTuning) -> Self {
        Self {
            mode: FollowMode::Following,
            tuning,
            guard_until: None,
            unseen: 0,
        }
    }

    pub fn mode(&self) -> FollowMode {
        self.mode
    }

    pub fn is_following(&self) -> bool {
        self.mode == FollowMode::Following
    }

    /// Whether the "more messages" indicator should be shown
    pub fn show_more_indicator(&self) -> bool {
        self.mode == FollowMode::Paused
    }

    /// Messages that arrived since the viewport paused
    pub fn unseen(&self) -> usize {
        self.unseen
    }

    /// The buffer changed (append, eviction, clear, filter change)
    ///
    /// While following this yields an instant scroll to the bottom so the
    /// feed never lags under bursts.
    pub fn on_buffer_mutated(&mut self, appended: usize, now: Instant) -> Option<ScrollCommand> {
        match self.mode {
            FollowMode::Following => {
                self.arm_guard(now, self.tuning.instant_guard);
                Some(ScrollCommand::ToBottom { animated: false })
            }
            FollowMode::Paused => {
                self.unseen += appended;
                None
            }
        }
    }

    /// A scroll notification arrived
    pub fn on_scroll(&mut self, origin: ScrollOrigin, metrics: ScrollMetrics, now: Instant) {
        match origin {
            ScrollOrigin::Programmatic => return,
            ScrollOrigin::Unattributed if self.in_guard(now) => return,
            ScrollOrigin::User | ScrollOrigin::Unattributed => {}
        }

        let near_bottom = metrics.distance_from_bottom() < self.tuning.proximity;
        match (self.mode, near_bottom) {
            (FollowMode::Following, false) => {
                tracing::debug!(
                    "Feed paused ({:.0} from bottom)",
                    metrics.distance_from_bottom()
                );
                self.mode = FollowMode::Paused;
                self.unseen = 0;
            }
            (FollowMode::Paused, true) => self.resume(),
            _ => {}
        }
    }

    /// Explicit "jump to latest": resume following with an animated scroll
    pub fn jump_to_latest(&mut self, now: Instant) -> ScrollCommand {
        self.resume();
        self.arm_guard(now, self.tuning.animated_guard);
        ScrollCommand::ToBottom { animated: true }
    }

    fn resume(&mut self) {
        if self.mode == FollowMode::Paused {
            tracing::debug!("Feed following again ({} unseen)", self.unseen);
        }
        self.mode = FollowMode::Following;
        self.unseen = 0;
    }

    fn arm_guard(&mut self, now: Instant, window: Duration) {
        let until = now + window;
        self.guard_until = Some(match self.guard_until {
            Some(existing) if existing > until => existing,
            _ => until,
        });
    }

    fn in_guard(&self, now: Instant) -> bool {
        self.guard_until.is_some_and(|until| now < until)
    }
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(ScrollTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(scroll_top: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top,
            content_height: 1000.0,
            viewport_height: 400.0,
        }
    }

    const BOTTOM: f64 = 600.0;

    // ─── ScrollState ─────────────────────────────────────────

    #[test]
    fn test_auto_follow_on_new_content() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(10, 5);
        assert_eq!(scroll.offset(), 5);

        scroll.update_dimensions(15, 5);
        assert_eq!(scroll.offset(), 10);
    }

    #[test]
    fn test_ensure_visible_moves_minimally() {
        let mut scroll = ScrollState::manual();
        scroll.update_dimensions(20, 5);
        scroll.ensure_visible(7);
        assert_eq!(scroll.offset(), 3);
        scroll.ensure_visible(5);
        assert_eq!(scroll.offset(), 3);
        scroll.ensure_visible(1);
        assert_eq!(scroll.offset(), 1);
    }

    #[test]
    fn test_manual_scroll_mode() {
        let mut scroll = ScrollState::manual();
        scroll.update_dimensions(10, 5);
        assert_eq!(scroll.offset(), 0);
        assert_eq!(scroll.visible_range(), (0, 5));
    }

    // ─── ScrollController ────────────────────────────────────

    #[test]
    fn test_starts_following() {
        let controller = ScrollController::default();
        assert_eq!(controller.mode(), FollowMode::Following);
        assert!(!controller.show_more_indicator());
    }

    #[test]
    fn test_mutation_while_following_snaps_instantly() {
        let mut controller = ScrollController::default();
        let cmd = controller.on_buffer_mutated(1, Instant::now());
        assert_eq!(cmd, Some(ScrollCommand::ToBottom { animated: false }));
    }

    #[test]
    fn test_programmatic_snap_does_not_pause() {
        let mut controller = ScrollController::default();
        let now = Instant::now();
        controller.on_buffer_mutated(1, now);

        // Content grew before the snap landed: we are far from the bottom, but
        // the notification is ours
        controller.on_scroll(ScrollOrigin::Programmatic, at(0.0), now);
        assert!(controller.is_following());

        // Same echo without a tag, still inside the guard window
        controller.on_scroll(
            ScrollOrigin::Unattributed,
            at(0.0),
            now + Duration::from_millis(50),
        );
        assert!(controller.is_following());
    }

    #[test]
    fn test_unattributed_scroll_after_guard_counts_as_user() {
        let mut controller = ScrollController::default();
        let now = Instant::now();
        controller.on_buffer_mutated(1, now);
        controller.on_scroll(
            ScrollOrigin::Unattributed,
            at(0.0),
            now + Duration::from_millis(150),
        );
        assert_eq!(controller.mode(), FollowMode::Paused);
    }

    #[test]
    fn test_user_scroll_beyond_epsilon_pauses() {
        let mut controller = ScrollController::default();
        let now = Instant::now();
        controller.on_buffer_mutated(1, now);

        // User input is never suppressed by the guard
        controller.on_scroll(ScrollOrigin::User, at(BOTTOM - 200.0), now);
        assert_eq!(controller.mode(), FollowMode::Paused);
        assert!(controller.show_more_indicator());
    }

    #[test]
    fn test_user_scroll_within_epsilon_keeps_following() {
        let mut controller = ScrollController::default();
        controller.on_scroll(ScrollOrigin::User, at(BOTTOM - 100.0), Instant::now());
        assert!(controller.is_following());
    }

    #[test]
    fn test_paused_holds_and_counts_arrivals() {
        let mut controller = ScrollController::default();
        let now = Instant::now();
        controller.on_scroll(ScrollOrigin::User, at(0.0), now);

        assert_eq!(controller.on_buffer_mutated(3, now), None);
        assert_eq!(controller.on_buffer_mutated(2, now), None);
        assert_eq!(controller.unseen(), 5);
    }

    #[test]
    fn test_jump_to_latest_resumes_with_animation() {
        let mut controller = ScrollController::default();
        let now = Instant::now();
        controller.on_scroll(ScrollOrigin::User, at(0.0), now);
        controller.on_buffer_mutated(4, now);

        let cmd = controller.jump_to_latest(now);
        assert_eq!(cmd, ScrollCommand::ToBottom { animated: true });
        assert!(controller.is_following());
        assert_eq!(controller.unseen(), 0);

        // Animation frames still travelling through the old position
        controller.on_scroll(
            ScrollOrigin::Unattributed,
            at(100.0),
            now + Duration::from_millis(300),
        );
        assert!(controller.is_following());
    }

    #[test]
    fn test_user_scrolling_back_near_bottom_resumes() {
        let mut controller = ScrollController::default();
        let now = Instant::now();
        controller.on_scroll(ScrollOrigin::User, at(0.0), now);
        assert_eq!(controller.mode(), FollowMode::Paused);

        controller.on_scroll(ScrollOrigin::User, at(BOTTOM - 20.0), now);
        assert!(controller.is_following());
    }

    #[test]
    fn test_programmatic_scroll_never_resumes_or_pauses() {
        let mut controller = ScrollController::default();
        let now = Instant::now();
        controller.on_scroll(ScrollOrigin::User, at(0.0), now);
        controller.on_scroll(ScrollOrigin::Programmatic, at(BOTTOM), now);
        assert_eq!(controller.mode(), FollowMode::Paused);
    }

    #[test]
    fn test_distance_from_bottom_clamps() {
        let m = ScrollMetrics {
            scroll_top: 0.0,
            content_height: 100.0,
            viewport_height: 400.0,
        };
        assert_eq!(m.distance_from_bottom(), 0.0);
    }
}
