//! Message annotation pipeline
//!
//! Four ordered stages turn message text into render segments. Every stage
//! only rewrites `Text` segments produced by the stages before it; emote and
//! mention segments are final and never rescanned, so nothing can be
//! substituted twice.
//!
//! 1. Native emotes: character ranges delivered with the message
//! 2. Bracket tokens: `[emote:<digits>:<name>]` (Kick wire convention)
//! 3. Catalog tokens: whitespace-delimited words found in the catalog map
//! 4. Mentions: `@name`, highlighted when `name` is a highlight term

use super::RenderSegment;
use crate::models::{kick_emote_url, NativeEmoteRef};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// `[emote:<digits>:<name>]` where name is word characters or hyphens
const BRACKET_EMOTE_PATTERN: &str = r"\[emote:([0-9]+):([A-Za-z0-9_\-]+)\]";

/// `@` followed by a maximal run of word characters
const MENTION_PATTERN: &str = r"@[A-Za-z0-9_]+";

fn bracket_emote_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(BRACKET_EMOTE_PATTERN).expect("bracket emote pattern is valid"))
}

fn mention_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MENTION_PATTERN).expect("mention pattern is valid"))
}

/// Normalized highlight terms (trimmed, leading `@` removed, lowercased)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet {
    terms: HashSet<String>,
}

impl HighlightSet {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| {
                let t = t.as_ref().trim();
                t.strip_prefix('@').unwrap_or(t).to_lowercase()
            })
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    /// Whether a mention (with its leading `@`) targets a highlight term
    pub fn matches_mention(&self, mention: &str) -> bool {
        let name = mention.strip_prefix('@').unwrap_or(mention);
        self.terms.contains(&name.to_lowercase())
    }
}

/// Annotate message text into ordered render segments
///
/// Pure and deterministic. Malformed native ranges are skipped rather than
/// aborting the message; an empty text yields no segments.
pub fn annotate(
    text: &str,
    native_emotes: &[NativeEmoteRef],
    catalog: &HashMap<String, String>,
    highlights: &HighlightSet,
) -> Vec<RenderSegment> {
    if text.is_empty() {
        return Vec::new();
    }

    let segments = split_native_emotes(text, native_emotes);
    let segments = map_text(segments, split_bracket_emotes);
    let segments = if catalog.is_empty() {
        segments
    } else {
        map_text(segments, |run| split_catalog_tokens(run, catalog))
    };
    let segments = map_text(segments, |run| split_mentions(run, highlights));

    coalesce(segments)
}

/// Apply a stage to every `Text` segment, leaving final segments alone
fn map_text<F>(segments: Vec<RenderSegment>, mut stage: F) -> Vec<RenderSegment>
where
    F: FnMut(&str) -> Vec<RenderSegment>,
{
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            RenderSegment::Text(run) => out.extend(stage(&run)),
            other => out.push(other),
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Stage 1: native ranged emotes
// ─────────────────────────────────────────────────────────────────────────────

fn split_native_emotes(text: &str, emotes: &[NativeEmoteRef]) -> Vec<RenderSegment> {
    if emotes.is_empty() {
        return vec![RenderSegment::Text(text.to_string())];
    }

    let mut sorted: Vec<&NativeEmoteRef> = emotes.iter().collect();
    sorted.sort_by_key(|e| e.start);

    // Byte offset of every character boundary, plus the end of the string
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = bounds.len() - 1;

    let mut out = Vec::new();
    let mut cursor = 0;
    for emote in sorted {
        if emote.start > emote.end || emote.start >= char_len || emote.start < cursor {
            tracing::debug!(
                "Skipping native emote {:?} with range {}..={} (text has {} chars, cursor {})",
                emote.code,
                emote.start,
                emote.end,
                char_len,
                cursor
            );
            continue;
        }
        let end = emote.end.min(char_len - 1);

        if emote.start > cursor {
            out.push(RenderSegment::Text(
                text[bounds[cursor]..bounds[emote.start]].to_string(),
            ));
        }
        out.push(RenderSegment::Emote {
            url: emote.source.url(),
            alt: emote.code.clone(),
        });
        cursor = end + 1;
    }

    if cursor < char_len {
        out.push(RenderSegment::Text(text[bounds[cursor]..].to_string()));
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Stage 2: bracket tokens
// ─────────────────────────────────────────────────────────────────────────────

fn split_bracket_emotes(run: &str) -> Vec<RenderSegment> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in bracket_emote_regex().captures_iter(run) {
        let (Some(whole), Some(id), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        if whole.start() > last {
            out.push(RenderSegment::Text(run[last..whole.start()].to_string()));
        }
        out.push(RenderSegment::Emote {
            url: kick_emote_url(id.as_str()),
            alt: name.as_str().to_string(),
        });
        last = whole.end();
    }
    if last < run.len() {
        out.push(RenderSegment::Text(run[last..].to_string()));
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Stage 3: catalog tokens
// ─────────────────────────────────────────────────────────────────────────────

fn split_catalog_tokens(run: &str, catalog: &HashMap<String, String>) -> Vec<RenderSegment> {
    split_whitespace_runs(run)
        .into_iter()
        .map(|token| match catalog.get(token) {
            Some(url) if !token.trim().is_empty() => RenderSegment::Emote {
                url: url.clone(),
                alt: token.to_string(),
            },
            _ => RenderSegment::Text(token.to_string()),
        })
        .collect()
}

/// Split into alternating whitespace and non-whitespace runs, keeping both
fn split_whitespace_runs(run: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (i, c) in run.char_indices() {
        let space = c.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                pieces.push(&run[start..i]);
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if start < run.len() {
        pieces.push(&run[start..]);
    }
    pieces
}

// ─────────────────────────────────────────────────────────────────────────────
// Stage 4: mentions
// ─────────────────────────────────────────────────────────────────────────────

fn split_mentions(run: &str, highlights: &HighlightSet) -> Vec<RenderSegment> {
    if run.trim().is_empty() {
        return vec![RenderSegment::Text(run.to_string())];
    }

    let mut out = Vec::new();
    let mut last = 0;
    for m in mention_regex().find_iter(run) {
        if m.start() > last {
            out.push(RenderSegment::Text(run[last..m.start()].to_string()));
        }
        out.push(RenderSegment::Mention {
            text: m.as_str().to_string(),
            highlight: highlights.matches_mention(m.as_str()),
        });
        last = m.end();
    }
    if last < run.len() {
        out.push(RenderSegment::Text(run[last..].to_string()));
    }
    out
}

/// Merge adjacent text runs and drop empty ones
fn coalesce(segments: Vec<RenderSegment>) -> Vec<RenderSegment> {
    let mut out: Vec<RenderSegment> = Vec::with_capacity(segments.len());
    for segment in segments {
        if let RenderSegment::Text(run) = &segment {
            if run.is_empty() {
                continue;
            }
            if let Some(RenderSegment::Text(prev)) = out.last_mut() {
                prev.push_str(run);
                continue;
            }
        }
        out.push(segment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmoteSource, Platform};

    fn text(s: &str) -> RenderSegment {
        RenderSegment::Text(s.to_string())
    }

    fn emote(url: &str, alt: &str) -> RenderSegment {
        RenderSegment::Emote {
            url: url.to_string(),
            alt: alt.to_string(),
        }
    }

    fn mention(s: &str, highlight: bool) -> RenderSegment {
        RenderSegment::Mention {
            text: s.to_string(),
            highlight,
        }
    }

    fn catalog(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn twitch(id: &str, code: &str, start: usize, end: usize) -> NativeEmoteRef {
        NativeEmoteRef::new(EmoteSource::for_platform(Platform::Twitch, id), code, start, end)
    }

    fn no_highlights() -> HighlightSet {
        HighlightSet::default()
    }

    #[test]
    fn test_catalog_token_substitution() {
        let map = catalog(&[("KEKW", "http://x/kekw.png")]);
        let segments = annotate("Hello KEKW world", &[], &map, &no_highlights());
        assert_eq!(
            segments,
            vec![text("Hello "), emote("http://x/kekw.png", "KEKW"), text(" world")]
        );
    }

    #[test]
    fn test_catalog_lookup_is_case_sensitive() {
        let map = catalog(&[("KEKW", "http://x/kekw.png")]);
        let segments = annotate("kekw KEKWW", &[], &map, &no_highlights());
        assert_eq!(segments, vec![text("kekw KEKWW")]);
    }

    #[test]
    fn test_highlighted_mention() {
        let highlights = HighlightSet::new(["bob"]);
        let segments = annotate("hi @bob", &[], &HashMap::new(), &highlights);
        assert_eq!(segments, vec![text("hi "), mention("@bob", true)]);
    }

    #[test]
    fn test_generic_mention() {
        let highlights = HighlightSet::new(["bob"]);
        let segments = annotate("hi @carol", &[], &HashMap::new(), &highlights);
        assert_eq!(segments, vec![text("hi "), mention("@carol", false)]);
    }

    #[test]
    fn test_highlight_terms_are_normalized() {
        let highlights = HighlightSet::new(["  @Bob ", "", "@"]);
        let segments = annotate("@BOB, ping", &[], &HashMap::new(), &highlights);
        assert_eq!(segments, vec![mention("@BOB", true), text(", ping")]);
    }

    #[test]
    fn test_native_emote_ranges() {
        let emotes = vec![twitch("25", "Kappa", 6, 10)];
        let segments = annotate("hello Kappa there", &emotes, &HashMap::new(), &no_highlights());
        assert_eq!(
            segments,
            vec![
                text("hello "),
                emote(
                    "https://static-cdn.jtvnw.net/emoticons/v2/25/default/dark/1.0",
                    "Kappa"
                ),
                text(" there"),
            ]
        );
    }

    #[test]
    fn test_native_emotes_sorted_defensively() {
        let emotes = vec![twitch("2", "B", 2, 2), twitch("1", "A", 0, 0)];
        let segments = annotate("A B", &emotes, &HashMap::new(), &no_highlights());
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], emote(&EmoteSource::for_platform(Platform::Twitch, "1").url(), "A"));
        assert_eq!(segments[1], text(" "));
    }

    #[test]
    fn test_native_ranges_use_character_offsets() {
        // "héllo " is 6 chars but 7 bytes
        let emotes = vec![twitch("25", "Kappa", 6, 10)];
        let segments = annotate("héllo Kappa", &emotes, &HashMap::new(), &no_highlights());
        assert_eq!(segments[0], text("héllo "));
        assert!(matches!(segments[1], RenderSegment::Emote { .. }));
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_malformed_native_ranges_are_skipped() {
        let emotes = vec![
            twitch("1", "Backwards", 5, 2),
            twitch("2", "OutOfBounds", 40, 45),
            twitch("3", "Kappa", 0, 4),
            twitch("4", "Overlap", 3, 6),
            twitch("5", "Clamped", 6, 99),
        ];
        let segments = annotate("Kappa Tail", &emotes, &HashMap::new(), &no_highlights());
        assert_eq!(segments.len(), 3);
        assert!(matches!(&segments[0], RenderSegment::Emote { alt, .. } if alt == "Kappa"));
        assert_eq!(segments[1], text(" "));
        assert!(matches!(&segments[2], RenderSegment::Emote { alt, .. } if alt == "Clamped"));
    }

    #[test]
    fn test_bracket_emote_tokens() {
        let segments = annotate(
            "gg [emote:37226:KEKLEO] nice[emote:1:a-b_c]",
            &[],
            &HashMap::new(),
            &no_highlights(),
        );
        assert_eq!(
            segments,
            vec![
                text("gg "),
                emote("https://files.kick.com/emotes/37226/fullsize", "KEKLEO"),
                text(" nice"),
                emote("https://files.kick.com/emotes/1/fullsize", "a-b_c"),
            ]
        );
    }

    #[test]
    fn test_malformed_bracket_tokens_stay_literal() {
        let input = "[emote:abc:Name] [emote:12:] [emote:12:bad name] [emote:12:x";
        let segments = annotate(input, &[], &HashMap::new(), &no_highlights());
        assert_eq!(segments, vec![text(input)]);
    }

    #[test]
    fn test_literal_catalog_code_outside_native_range_is_substituted() {
        // The platform flagged only the first "Kappa"; "KEKW" is plain text
        // but still matches the catalog
        let emotes = vec![twitch("25", "Kappa", 0, 4)];
        let map = catalog(&[("KEKW", "http://x/kekw"), ("Kappa", "http://x/fake-kappa")]);
        let segments = annotate("Kappa KEKW", &emotes, &map, &no_highlights());
        assert_eq!(
            segments,
            vec![
                emote(
                    "https://static-cdn.jtvnw.net/emoticons/v2/25/default/dark/1.0",
                    "Kappa"
                ),
                text(" "),
                emote("http://x/kekw", "KEKW"),
            ]
        );
    }

    #[test]
    fn test_substituted_segments_are_not_rescanned() {
        // The bracket emote's alt text equals a catalog code; it must stay
        // the bracket emote and not be replaced again
        let map = catalog(&[("KEKLEO", "http://catalog/kekleo")]);
        let segments = annotate("[emote:5:KEKLEO]", &[], &map, &no_highlights());
        assert_eq!(
            segments,
            vec![emote("https://files.kick.com/emotes/5/fullsize", "KEKLEO")]
        );
    }

    #[test]
    fn test_mention_inside_emote_code_is_not_a_mention() {
        let map = catalog(&[("@Wave", "http://x/wave")]);
        let segments = annotate("@Wave @bob", &[], &map, &HighlightSet::new(["wave"]));
        assert_eq!(
            segments,
            vec![emote("http://x/wave", "@Wave"), text(" "), mention("@bob", false)]
        );
    }

    #[test]
    fn test_empty_text() {
        let map = catalog(&[("KEKW", "http://x")]);
        assert!(annotate("", &[], &map, &no_highlights()).is_empty());
    }

    #[test]
    fn test_plain_text_passes_through() {
        let segments = annotate("  just  words  ", &[], &HashMap::new(), &no_highlights());
        assert_eq!(segments, vec![text("  just  words  ")]);
    }

    #[test]
    fn test_whitespace_runs_preserved_around_emotes() {
        let map = catalog(&[("EZ", "http://x/ez")]);
        let segments = annotate("a \t EZ\nb", &[], &map, &no_highlights());
        assert_eq!(
            segments,
            vec![text("a \t "), emote("http://x/ez", "EZ"), text("\nb")]
        );
    }

    #[test]
    fn test_split_whitespace_runs() {
        assert_eq!(split_whitespace_runs("a  b"), vec!["a", "  ", "b"]);
        assert_eq!(split_whitespace_runs(" x"), vec![" ", "x"]);
        assert!(split_whitespace_runs("").is_empty());
    }
}
