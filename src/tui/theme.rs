// Theme for the TUI
//
// One resolved palette. Role and username colors come from RenderConfig; the
// theme covers chrome, log levels and segment styling.

use ratatui::style::Color;
use ratatui::widgets::BorderType;

use crate::logging::LogLevel;
use crate::models::Platform;

#[derive(Debug, Clone)]
pub struct Theme {
    // ─── Terminal Colors ─────────────────────────────────────
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,

    // ─── UI Element Colors ───────────────────────────────────
    pub title: Color,
    pub status_bar: Color,
    pub highlight: Color,
    pub selection: Color,
    pub selection_fg: Color,
    pub border_type: BorderType,

    // ─── Panel Identity Colors ───────────────────────────────
    pub panel_feed: Color,
    pub panel_emotes: Color,
    pub panel_logs: Color,

    // ─── Message Colors ──────────────────────────────────────
    pub emote: Color,
    pub mention: Color,
    pub mention_highlight_bg: Color,
    pub system_text: Color,
    pub favorite: Color,
    pub indicator: Color,

    // ─── Log Levels ──────────────────────────────────────────
    pub error: Color,
    pub warn: Color,
    pub info: Color,
    pub debug: Color,
}

impl Theme {
    /// One Half Dark based palette
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(40, 44, 52),
            foreground: Color::Rgb(220, 223, 228),
            muted: Color::Rgb(127, 132, 142),

            title: Color::Rgb(86, 182, 194),
            status_bar: Color::Rgb(220, 223, 228),
            highlight: Color::Rgb(229, 192, 123),
            selection: Color::Rgb(71, 78, 93),
            selection_fg: Color::Rgb(220, 223, 228),
            border_type: BorderType::Rounded,

            panel_feed: Color::Rgb(86, 182, 194),
            panel_emotes: Color::Rgb(198, 120, 221),
            panel_logs: Color::Rgb(152, 195, 121),

            emote: Color::Rgb(86, 182, 194),
            mention: Color::Rgb(97, 175, 239),
            mention_highlight_bg: Color::Rgb(94, 70, 30),
            system_text: Color::Rgb(169, 112, 255),
            favorite: Color::Rgb(255, 215, 0),
            indicator: Color::Rgb(229, 192, 123),

            error: Color::Rgb(224, 108, 117),
            warn: Color::Rgb(229, 192, 123),
            info: Color::Rgb(152, 195, 121),
            debug: Color::Rgb(127, 132, 142),
        }
    }

    /// Brand color for a platform tag
    pub fn platform(&self, platform: Platform) -> Color {
        match platform {
            Platform::Twitch => Color::Rgb(145, 70, 255),
            Platform::YouTube => Color::Rgb(255, 0, 0),
            Platform::Kick => Color::Rgb(83, 252, 24),
        }
    }

    pub fn log_level(&self, level: LogLevel) -> Color {
        match level {
            LogLevel::Error => self.error,
            LogLevel::Warn => self.warn,
            LogLevel::Info => self.info,
            LogLevel::Debug | LogLevel::Trace => self.debug,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
