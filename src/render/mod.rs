// Rendering - message text to display segments
//
// `annotate` is the pure transformation from message text plus emote metadata
// to an ordered list of segments. Presentation (colors, badges, layout) is
// applied later by the TUI using an explicit RenderConfig.

mod annotate;

pub use annotate::{annotate, HighlightSet};

use crate::emotes::Catalog;
use crate::models::ChatMessage;

/// One atomic unit of rendered message output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderSegment {
    /// Plain text run
    Text(String),
    /// Emote image with its code as alt text
    Emote { url: String, alt: String },
    /// `@name` mention; `highlight` when it targets a highlight term
    Mention { text: String, highlight: bool },
}

impl RenderSegment {
    /// Text this segment stands for in the message
    pub fn as_text(&self) -> &str {
        match self {
            RenderSegment::Text(s) => s,
            RenderSegment::Emote { alt, .. } => alt,
            RenderSegment::Mention { text, .. } => text,
        }
    }
}

/// Annotate a message against the active catalog
pub fn annotate_message(
    message: &ChatMessage,
    catalog: &Catalog,
    highlights: &HighlightSet,
) -> Vec<RenderSegment> {
    annotate(&message.message, &message.emotes, catalog.lookup(), highlights)
}

/// Flatten segments to plain text (emotes as `:code:`)
pub fn plain_text(segments: &[RenderSegment]) -> String {
    segments
        .iter()
        .map(|s| match s {
            RenderSegment::Emote { alt, .. } => format!(":{}:", alt),
            other => other.as_text().to_string(),
        })
        .collect()
}
