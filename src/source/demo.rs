// Demo mode: generate realistic chat traffic to showcase the feed
//
// Messages cover everything the annotator handles: native emote ranges from
// Twitch and YouTube, Kick bracket tokens, third-party catalog codes, @mentions,
// subscription notices and bot spam. Now and then an id is re-sent to show
// dedup in action.
//
// Run with: CHATWEAVE_DEMO=1 cargo run --release

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;

use crate::models::{ChatMessage, EmoteSource, MessageKind, NativeEmoteRef, Platform};

/// Name demo chatters @mention; highlight it with CHATWEAVE_HIGHLIGHT=streamer
pub const DEMO_STREAMER: &str = "streamer";

/// (username, color, is_mod, is_vip, is_member)
const CHATTERS: &[(&str, Option<&str>, bool, bool, bool)] = &[
    ("pixelpirate", Some("#1e90ff"), false, false, false),
    ("modmaria", Some("#00ad03"), true, false, false),
    ("vip_victor", Some("#e9199f"), false, true, false),
    ("lurker_lou", None, false, false, false),
    ("kappa_kid", Some("#ff7f50"), false, false, false),
    ("yt_member_yui", None, false, false, true),
    ("speedrun_sam", Some("#9acd32"), false, false, false),
    ("kick_kai", Some("#53fc18"), false, false, false),
];

const BOTS: &[&str] = &["Nightbot", "StreamElements"];

/// Plain lines sprinkled with third-party catalog codes
const CHAT_LINES: &[&str] = &[
    "catJAM catJAM this song",
    "that was so clean",
    "OMEGALUL he missed",
    "monkaS chat is it happening",
    "first time here, love the vibes",
    "PepeLaugh he doesn't know",
    "GG wp",
    "how long have you been streaming today?",
    "Pog Pog Pog",
    "lol",
];

/// Message generator; deterministic for a fixed seed
pub struct DemoGenerator {
    counter: u64,
    rng: StdRng,
    last_id: Option<String>,
}

impl DemoGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            counter: 0,
            rng,
            last_id: None,
        }
    }

    // Only called with the non-empty tables above
    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.random_range(0..items.len())]
    }

    /// Bursty pacing: mostly quick, sometimes a lull
    pub fn next_delay(&mut self) -> Duration {
        let millis = match self.rng.random_range(0..10) {
            0 => 1200,
            1..=3 => 40,
            _ => 250,
        };
        Duration::from_millis(millis)
    }

    /// Produce the next message
    pub fn next_message(&mut self) -> ChatMessage {
        self.counter += 1;

        // Occasional duplicate delivery
        if self.counter % 17 == 0 {
            if let Some(id) = self.last_id.clone() {
                return ChatMessage::new(id, Platform::Twitch, "pixelpirate", "duplicate delivery");
            }
        }

        let id = format!("demo-{}", self.counter);
        let roll = self.rng.random_range(0..20);
        let message = match roll {
            0 => self.sub_message(id),
            1 => self.bot_message(id),
            2..=4 => self.twitch_native(id),
            5..=6 => self.kick_bracket(id),
            7..=8 => self.youtube_emoji(id),
            9..=10 => self.mention(id),
            _ => self.plain(id),
        };

        self.last_id = Some(message.id.clone());
        message
    }

    fn chatter(&mut self, id: String, platform: Platform, text: &str) -> ChatMessage {
        let &(name, color, is_mod, is_vip, is_member) = self.pick(CHATTERS);
        let mut message = ChatMessage::new(id, platform, name, text);
        message.color = color.map(String::from);
        message.is_mod = is_mod && platform != Platform::YouTube;
        message.is_vip = is_vip && platform != Platform::YouTube;
        message.is_member = is_member && platform == Platform::YouTube;
        if message.is_mod {
            message.badges.push("moderator".to_string());
        }
        if message.is_vip {
            message.badges.push("vip".to_string());
        }
        if message.is_member {
            message.badges.push("member".to_string());
        }
        message
    }

    fn random_platform(&mut self) -> Platform {
        *self.pick(Platform::all())
    }

    fn plain(&mut self, id: String) -> ChatMessage {
        let text = *self.pick(CHAT_LINES);
        let platform = self.random_platform();
        self.chatter(id, platform, text)
    }

    fn twitch_native(&mut self, id: String) -> ChatMessage {
        let (text, code, emote_id) = *self.pick(&[
            ("Kappa that was close", "Kappa", "25"),
            ("LUL LUL chat", "LUL", "425618"),
            ("nice one PogChamp", "PogChamp", "305954156"),
        ]);
        let mut message = self.chatter(id, Platform::Twitch, text);
        message.emotes = native_ranges(Platform::Twitch, emote_id, text, code);
        message
    }

    fn kick_bracket(&mut self, id: String) -> ChatMessage {
        let text = *self.pick(&[
            "[emote:37226:KEKW] no way",
            "let's go [emote:39251:catJAM] [emote:39251:catJAM]",
            "[emote:37230:POLICE] stop right there",
        ]);
        self.chatter(id, Platform::Kick, text)
    }

    fn youtube_emoji(&mut self, id: String) -> ChatMessage {
        let code = ":hand-pink-waving:";
        let text = format!("{} hello from YouTube", code);
        let mut message = self.chatter(id, Platform::YouTube, &text);
        message.emotes = vec![NativeEmoteRef::new(
            EmoteSource::DirectUrl {
                url: "https://yt3.ggpht.com/KOxdr_z3A5h1Gb7kqnxqOCnbZrBmxI2B_tRQ453BhTWUhYAlpg5ZP8IKn"
                    .to_string(),
            },
            code,
            0,
            code.chars().count() - 1,
        )];
        message
    }

    fn mention(&mut self, id: String) -> ChatMessage {
        let platform = self.random_platform();
        let text = match self.rng.random_range(0..3) {
            0 => format!("@{} what's the plan for today?", DEMO_STREAMER),
            1 => "@modmaria can you pin the schedule?".to_string(),
            _ => format!("hey @{} catJAM", DEMO_STREAMER),
        };
        self.chatter(id, platform, &text)
    }

    fn sub_message(&mut self, id: String) -> ChatMessage {
        let platform = if self.rng.random_bool(0.5) {
            Platform::Twitch
        } else {
            Platform::Kick
        };
        let months = self.rng.random_range(1..=24);
        let mut message = self.chatter(id, platform, "");
        message.kind = MessageKind::Sub;
        message.system_message = Some(format!(
            "{} subscribed for {} months!",
            message.username, months
        ));
        if months % 2 == 0 {
            message.message = "love this stream PogChamp".to_string();
            if platform == Platform::Twitch {
                message.emotes =
                    native_ranges(platform, "305954156", &message.message, "PogChamp");
            }
        }
        message
    }

    fn bot_message(&mut self, id: String) -> ChatMessage {
        let name = *self.pick(BOTS);
        let mut message = ChatMessage::new(
            id,
            Platform::Twitch,
            name,
            "Join the discord: discord.gg/example | !commands",
        );
        message.color = Some("#5f9ea0".to_string());
        message.is_mod = true;
        message
    }
}

/// Native ranges for every whitespace-delimited occurrence of `code`
///
/// Offsets are inclusive character indices.
pub fn native_ranges(platform: Platform, emote_id: &str, text: &str, code: &str) -> Vec<NativeEmoteRef> {
    let mut ranges = Vec::new();
    let mut char_pos = 0usize;
    for token in text.split(' ') {
        let len = token.chars().count();
        if token == code && len > 0 {
            ranges.push(NativeEmoteRef::new(
                EmoteSource::for_platform(platform, emote_id),
                code,
                char_pos,
                char_pos + len - 1,
            ));
        }
        char_pos += len + 1;
    }
    ranges
}

/// Emit demo messages until shutdown
pub async fn run_demo(tx: mpsc::Sender<ChatMessage>, mut shutdown_rx: oneshot::Receiver<()>) {
    // Initial delay to let TUI render
    sleep(Duration::from_millis(800)).await;

    tracing::info!("Demo source started");
    let mut generator = DemoGenerator::from_entropy();

    loop {
        let message = generator.next_message();
        if tx.send(message).await.is_err() {
            break;
        }

        let delay = generator.next_delay();

        tokio::select! {
            _ = &mut shutdown_rx => {
                tracing::info!("Demo received shutdown signal");
                return;
            }
            _ = sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn char_slice(text: &str, start: usize, end: usize) -> String {
        text.chars().skip(start).take(end + 1 - start).collect()
    }

    #[test]
    fn test_native_ranges_are_char_offsets() {
        let text = "héllo Kappa x Kappa";
        let ranges = native_ranges(Platform::Twitch, "25", text, "Kappa");
        assert_eq!(ranges.len(), 2);
        assert_eq!((ranges[0].start, ranges[0].end), (6, 10));
        assert_eq!((ranges[1].start, ranges[1].end), (14, 18));
        for r in &ranges {
            assert_eq!(char_slice(text, r.start, r.end), "Kappa");
        }
    }

    #[test]
    fn test_generated_ranges_cover_their_codes() {
        let mut generator = DemoGenerator::new(7);
        for _ in 0..500 {
            let message = generator.next_message();
            for emote in &message.emotes {
                assert!(emote.start <= emote.end);
                assert_eq!(
                    char_slice(&message.message, emote.start, emote.end),
                    emote.code
                );
            }
        }
    }

    #[test]
    fn test_generator_is_deterministic_for_seed() {
        let mut a = DemoGenerator::new(42);
        let mut b = DemoGenerator::new(42);
        for _ in 0..50 {
            assert_eq!(a.next_message().message, b.next_message().message);
        }
    }

    #[test]
    fn test_seeds_produce_different_traffic() {
        let mut a = DemoGenerator::new(1);
        let mut b = DemoGenerator::new(2);
        let a: Vec<String> = (0..30).map(|_| a.next_message().message).collect();
        let b: Vec<String> = (0..30).map(|_| b.next_message().message).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_delays_stay_in_pacing_set() {
        let mut generator = DemoGenerator::new(5);
        for _ in 0..200 {
            let ms = generator.next_delay().as_millis();
            assert!([40, 250, 1200].contains(&ms), "unexpected delay {}", ms);
        }
    }

    #[test]
    fn test_generator_resends_some_ids() {
        let mut generator = DemoGenerator::new(3);
        let mut seen = HashSet::new();
        let mut duplicates = 0;
        for _ in 0..100 {
            if !seen.insert(generator.next_message().id) {
                duplicates += 1;
            }
        }
        assert!(duplicates > 0);
    }

    #[test]
    fn test_sub_messages_carry_system_line() {
        let mut generator = DemoGenerator::new(11);
        let sub = (0..1000)
            .map(|_| generator.next_message())
            .find(ChatMessage::is_sub);
        let sub = sub.as_ref();
        assert!(sub.and_then(|m| m.system_message.as_ref()).is_some());
    }
}
