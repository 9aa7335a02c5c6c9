// Chat message records delivered by the platform connection layer
//
// A ChatMessage arrives fully formed: the connection layer has already parsed
// the wire protocol, resolved badges and located native emotes. Messages are
// immutable once created and live in the feed buffer until evicted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Twitch native emote CDN template (keyed by numeric emote id)
const TWITCH_EMOTE_TEMPLATE: &str = "https://static-cdn.jtvnw.net/emoticons/v2";

/// Kick emote CDN template (keyed by numeric emote id)
const KICK_EMOTE_TEMPLATE: &str = "https://files.kick.com/emotes";

/// Streaming platform a message originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Twitch,
    YouTube,
    Kick,
}

impl Platform {
    /// All platforms, in filter-cycle order
    pub fn all() -> &'static [Platform] {
        &[Platform::Twitch, Platform::YouTube, Platform::Kick]
    }

    /// Short tag for compact display
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::Twitch => "TW",
            Platform::YouTube => "YT",
            Platform::Kick => "KK",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Twitch => "Twitch",
            Platform::YouTube => "YouTube",
            Platform::Kick => "Kick",
        }
    }
}

/// Where an emote image comes from
///
/// Some platforms hand out an id that resolves through a CDN template, others
/// hand out the image URL itself. The connection layer knows which one it has,
/// so it is recorded here instead of probing the string later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmoteSource {
    /// Id resolved through the platform's CDN template
    ByProviderId { platform: Platform, id: String },
    /// Literal image URL
    DirectUrl { url: String },
}

impl EmoteSource {
    /// Classify a platform-delivered emote id
    ///
    /// YouTube delivers image URLs for its custom emoji; Twitch and Kick
    /// deliver numeric ids.
    pub fn for_platform(platform: Platform, id: impl Into<String>) -> Self {
        let id = id.into();
        match platform {
            Platform::YouTube => EmoteSource::DirectUrl { url: id },
            Platform::Twitch | Platform::Kick => EmoteSource::ByProviderId { platform, id },
        }
    }

    /// Resolve to a renderable image URL
    pub fn url(&self) -> String {
        match self {
            EmoteSource::DirectUrl { url } => url.clone(),
            EmoteSource::ByProviderId { platform, id } => match platform {
                Platform::Twitch => format!("{}/{}/default/dark/1.0", TWITCH_EMOTE_TEMPLATE, id),
                Platform::Kick => kick_emote_url(id),
                // YouTube has no id template; ids are passed through as-is
                Platform::YouTube => id.clone(),
            },
        }
    }
}

/// Image URL for a Kick emote id
pub fn kick_emote_url(id: &str) -> String {
    format!("{}/{}/fullsize", KICK_EMOTE_TEMPLATE, id)
}

/// Native emote with an explicit character range in the message text
///
/// `start` and `end` are inclusive character (not byte) offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeEmoteRef {
    pub source: EmoteSource,
    pub code: String,
    pub start: usize,
    pub end: usize,
}

impl NativeEmoteRef {
    pub fn new(source: EmoteSource, code: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            source,
            code: code.into(),
            start,
            end,
        }
    }
}

/// Kind of message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Chat,
    Sub,
}

/// A single inbound chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique id (opaque, platform-assigned)
    pub id: String,
    pub platform: Platform,
    pub username: String,
    /// Display color as `#rrggbb`
    #[serde(default)]
    pub color: Option<String>,
    pub message: String,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub is_mod: bool,
    #[serde(default)]
    pub is_vip: bool,
    #[serde(default)]
    pub is_member: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub emotes: Vec<NativeEmoteRef>,
    #[serde(default)]
    pub kind: MessageKind,
    /// Platform-generated annotation (e.g. "x subscribed for 3 months")
    #[serde(default)]
    pub system_message: Option<String>,
}

impl ChatMessage {
    /// Plain chat message with no roles, badges or emotes
    pub fn new(
        id: impl Into<String>,
        platform: Platform,
        username: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            platform,
            username: username.into(),
            color: None,
            message: message.into(),
            badges: Vec::new(),
            is_mod: false,
            is_vip: false,
            is_member: false,
            timestamp: Utc::now(),
            emotes: Vec::new(),
            kind: MessageKind::Chat,
            system_message: None,
        }
    }

    pub fn is_sub(&self) -> bool {
        self.kind == MessageKind::Sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twitch_id_resolves_through_template() {
        let source = EmoteSource::for_platform(Platform::Twitch, "25");
        assert_eq!(
            source.url(),
            "https://static-cdn.jtvnw.net/emoticons/v2/25/default/dark/1.0"
        );
    }

    #[test]
    fn test_youtube_emote_is_direct_url() {
        let source = EmoteSource::for_platform(Platform::YouTube, "https://yt3.ggpht.com/abc");
        assert_eq!(
            source,
            EmoteSource::DirectUrl {
                url: "https://yt3.ggpht.com/abc".to_string()
            }
        );
        assert_eq!(source.url(), "https://yt3.ggpht.com/abc");
    }

    #[test]
    fn test_message_deserializes_with_defaults() {
        let json = r#"{
            "id": "m1",
            "platform": "Kick",
            "username": "someone",
            "message": "hello",
            "timestamp": "2024-05-01T12:00:00Z"
        }"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.platform, Platform::Kick);
        assert_eq!(msg.kind, MessageKind::Chat);
        assert!(msg.emotes.is_empty());
        assert!(!msg.is_mod);
    }

    #[test]
    fn test_sub_kind_parses_lowercase() {
        let json = r#"{
            "id": "m2",
            "platform": "Twitch",
            "username": "someone",
            "message": "",
            "timestamp": "2024-05-01T12:00:00Z",
            "kind": "sub",
            "system_message": "someone subscribed"
        }"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert!(msg.is_sub());
        assert_eq!(msg.system_message.as_deref(), Some("someone subscribed"));
    }
}
