//! Feed view filters
//!
//! Every enabled criterion must hold (AND-combined). An unset filter matches
//! everything.

use crate::models::{ChatMessage, Platform};

/// Well-known chat bot accounts, lowercase
const KNOWN_BOTS: &[&str] = &[
    "nightbot",
    "streamelements",
    "streamlabs",
    "moobot",
    "fossabot",
    "wizebot",
    "deepbot",
    "soundalerts",
    "sery_bot",
    "botrixoficial",
    "kickbot",
];

/// Whether a username belongs to a known bot (case-insensitive)
pub fn is_known_bot(username: &str) -> bool {
    let name = username.to_lowercase();
    KNOWN_BOTS.contains(&name.as_str())
}

/// Criteria for the visible feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    /// Case-insensitive substring of username or message text
    pub query: String,
    pub platform: Option<Platform>,
    pub mods_only: bool,
    pub vips_only: bool,
    pub members_only: bool,
    pub hide_bots: bool,
}

impl FeedFilter {
    pub fn matches(&self, message: &ChatMessage) -> bool {
        self.matches_query(message)
            && self.platform.map_or(true, |p| message.platform == p)
            && (!self.mods_only || message.is_mod)
            && (!self.vips_only || message.is_vip)
            && (!self.members_only || message.is_member)
            && (!self.hide_bots || !is_known_bot(&message.username))
    }

    fn matches_query(&self, message: &ChatMessage) -> bool {
        let query = self.query.trim();
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        message.username.to_lowercase().contains(&query)
            || message.message.to_lowercase().contains(&query)
    }

    /// Whether any criterion is set
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    /// Cycle platform filter: all -> Twitch -> YouTube -> Kick -> all
    pub fn cycle_platform(&mut self) {
        let all = Platform::all();
        self.platform = match self.platform {
            None => all.first().copied(),
            Some(current) => all
                .iter()
                .position(|&p| p == current)
                .and_then(|i| all.get(i + 1))
                .copied(),
        };
    }

    /// Short description for the status bar
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.query.trim().is_empty() {
            parts.push(format!("\"{}\"", self.query.trim()));
        }
        if let Some(p) = self.platform {
            parts.push(p.name().to_string());
        }
        if self.mods_only {
            parts.push("mods".to_string());
        }
        if self.vips_only {
            parts.push("vips".to_string());
        }
        if self.members_only {
            parts.push("members".to_string());
        }
        if self.hide_bots {
            parts.push("no bots".to_string());
        }
        parts.join(" + ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(username: &str, text: &str) -> ChatMessage {
        ChatMessage::new("1", Platform::Twitch, username, text)
    }

    #[test]
    fn test_default_matches_everything() {
        let filter = FeedFilter::default();
        assert!(filter.matches(&msg("anyone", "anything")));
        assert!(!filter.is_active());
    }

    #[test]
    fn test_query_matches_username_or_text_case_insensitive() {
        let filter = FeedFilter {
            query: "BoB".into(),
            ..Default::default()
        };
        assert!(filter.matches(&msg("bobby", "hi")));
        assert!(filter.matches(&msg("alice", "where is BOB")));
        assert!(!filter.matches(&msg("alice", "hi")));
    }

    #[test]
    fn test_criteria_are_and_combined() {
        let filter = FeedFilter {
            query: "gg".into(),
            platform: Some(Platform::Twitch),
            mods_only: true,
            ..Default::default()
        };

        let mut m = msg("modperson", "gg");
        m.is_mod = true;
        assert!(filter.matches(&m));

        m.platform = Platform::Kick;
        assert!(!filter.matches(&m));

        let mut not_mod = msg("viewer", "gg");
        not_mod.is_mod = false;
        assert!(!filter.matches(&not_mod));
    }

    #[test]
    fn test_role_flags() {
        let mut m = msg("v", "x");
        m.is_vip = true;
        let vip = FeedFilter {
            vips_only: true,
            ..Default::default()
        };
        let member = FeedFilter {
            members_only: true,
            ..Default::default()
        };
        assert!(vip.matches(&m));
        assert!(!member.matches(&m));
    }

    #[test]
    fn test_hide_bots() {
        let filter = FeedFilter {
            hide_bots: true,
            ..Default::default()
        };
        assert!(!filter.matches(&msg("Nightbot", "!commands")));
        assert!(!filter.matches(&msg("StreamElements", "follow!")));
        assert!(filter.matches(&msg("nightbotfan", "hi")));
    }

    #[test]
    fn test_cycle_platform() {
        let mut filter = FeedFilter::default();
        filter.cycle_platform();
        assert_eq!(filter.platform, Some(Platform::Twitch));
        filter.cycle_platform();
        assert_eq!(filter.platform, Some(Platform::YouTube));
        filter.cycle_platform();
        assert_eq!(filter.platform, Some(Platform::Kick));
        filter.cycle_platform();
        assert_eq!(filter.platform, None);
    }

    #[test]
    fn test_describe() {
        let filter = FeedFilter {
            query: "hi".into(),
            platform: Some(Platform::Kick),
            hide_bots: true,
            ..Default::default()
        };
        assert_eq!(filter.describe(), "\"hi\" + Kick + no bots");
    }
}
