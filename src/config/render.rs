//! Render configuration: how annotated messages are presented
//!
//! An explicit value handed to the feed renderer each frame. Colors are kept
//! as `#rrggbb` strings (the on-disk form) and converted on demand.

use ratatui::style::Color;
use serde::Deserialize;

use crate::models::Platform;

/// How usernames are colored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UsernameColor {
    /// Use the color sent with the message
    #[default]
    Original,
    /// Use `static_username_color` for everyone
    Static,
}

impl UsernameColor {
    /// Parse username color mode from config
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "static" => Self::Static,
            _ => Self::Original,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Static => "static",
        }
    }
}

/// Presentation settings
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Font size in px; with `line_height` converts rows to px for scrolling
    pub font_size: f64,
    pub line_height: f64,
    pub show_badges: bool,
    pub show_timestamp: bool,
    pub username_color: UsernameColor,
    pub static_username_color: String,
    pub twitch_mod_color: String,
    pub twitch_vip_color: String,
    pub kick_mod_color: String,
    pub kick_vip_color: String,
    pub youtube_member_color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            line_height: 1.5,
            show_badges: true,
            show_timestamp: false,
            username_color: UsernameColor::Original,
            static_username_color: "#ffffff".to_string(),
            twitch_mod_color: "#00ad03".to_string(),
            twitch_vip_color: "#e9199f".to_string(),
            kick_mod_color: "#00ad03".to_string(),
            kick_vip_color: "#e9199f".to_string(),
            youtube_member_color: "#0f9d58".to_string(),
        }
    }
}

/// Render settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileRender {
    pub font_size: Option<f64>,
    pub line_height: Option<f64>,
    pub show_badges: Option<bool>,
    pub show_timestamp: Option<bool>,
    pub username_color: Option<String>,
    pub static_username_color: Option<String>,
    pub twitch_mod_color: Option<String>,
    pub twitch_vip_color: Option<String>,
    pub kick_mod_color: Option<String>,
    pub kick_vip_color: Option<String>,
    pub youtube_member_color: Option<String>,
}

impl RenderConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileRender>) -> Self {
        let file = file.unwrap_or_default();
        let d = Self::default();

        Self {
            font_size: file.font_size.filter(|v| *v > 0.0).unwrap_or(d.font_size),
            line_height: file.line_height.filter(|v| *v > 0.0).unwrap_or(d.line_height),
            show_badges: file.show_badges.unwrap_or(d.show_badges),
            show_timestamp: file.show_timestamp.unwrap_or(d.show_timestamp),
            username_color: file
                .username_color
                .map(|s| UsernameColor::from_str(&s))
                .unwrap_or(d.username_color),
            static_username_color: file.static_username_color.unwrap_or(d.static_username_color),
            twitch_mod_color: file.twitch_mod_color.unwrap_or(d.twitch_mod_color),
            twitch_vip_color: file.twitch_vip_color.unwrap_or(d.twitch_vip_color),
            kick_mod_color: file.kick_mod_color.unwrap_or(d.kick_mod_color),
            kick_vip_color: file.kick_vip_color.unwrap_or(d.kick_vip_color),
            youtube_member_color: file.youtube_member_color.unwrap_or(d.youtube_member_color),
        }
    }

    /// Height of one rendered row in px
    pub fn row_px(&self) -> f64 {
        self.font_size * self.line_height
    }

    /// Moderator accent for a platform (YouTube has none)
    pub fn mod_color(&self, platform: Platform) -> Option<Color> {
        match platform {
            Platform::Twitch => parse_hex(&self.twitch_mod_color),
            Platform::Kick => parse_hex(&self.kick_mod_color),
            Platform::YouTube => None,
        }
    }

    /// VIP accent for a platform (YouTube has none)
    pub fn vip_color(&self, platform: Platform) -> Option<Color> {
        match platform {
            Platform::Twitch => parse_hex(&self.twitch_vip_color),
            Platform::Kick => parse_hex(&self.kick_vip_color),
            Platform::YouTube => None,
        }
    }

    pub fn member_color(&self) -> Option<Color> {
        parse_hex(&self.youtube_member_color)
    }

    pub fn static_color(&self) -> Option<Color> {
        parse_hex(&self.static_username_color)
    }
}

/// Parse `#rrggbb` (leading `#` optional)
pub fn parse_hex(value: &str) -> Option<Color> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
