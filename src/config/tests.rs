//! Configuration tests
//!
//! The round-trip tests guard `to_toml`: when a field is added to a config
//! section, they fail until the template writes it back.

use super::*;
use crate::emotes::MergeOrder;
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn parse(toml_str: &str) -> FileConfig {
    match toml::from_str(toml_str) {
        Ok(file) => file,
        Err(e) => panic!("TOML should parse:\n{}\nError: {}", toml_str, e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let resolved = Config::resolve(parse(&config.to_toml()), no_env);
    assert_eq!(resolved, config);
}

#[test]
fn test_config_roundtrip_non_default_values() {
    let mut config = Config::default();
    config.channel_id = Some("22484632".to_string());
    config.demo_mode = true;
    config.feed.capacity = 50;
    config.feed.highlight_terms = vec!["me".to_string(), "streamer".to_string()];
    config.feed.favorites = vec!["bestfriend".to_string()];
    config.catalog.enabled = false;
    config.catalog.timeout_secs = 9;
    config.catalog.merge_order = MergeOrder::ProviderFirst;
    config.catalog.endpoints.bttv = "http://localhost:1".to_string();
    config.catalog.endpoints.ffz = "http://localhost:2".to_string();
    config.catalog.endpoints.seven_tv = "http://localhost:3".to_string();
    config.render.font_size = 16.0;
    config.render.line_height = 1.25;
    config.render.show_badges = false;
    config.render.show_timestamp = true;
    config.render.username_color = UsernameColor::Static;
    config.render.static_username_color = "#123456".to_string();
    config.render.twitch_mod_color = "#010101".to_string();
    config.render.twitch_vip_color = "#020202".to_string();
    config.render.kick_mod_color = "#030303".to_string();
    config.render.kick_vip_color = "#040404".to_string();
    config.render.youtube_member_color = "#050505".to_string();
    config.scroll.proximity_px = 80.0;
    config.scroll.instant_guard_ms = 50;
    config.scroll.animated_guard_ms = 900;
    config.logging.level = "debug".to_string();
    config.logging.file_enabled = true;
    config.logging.file_dir = PathBuf::from("/tmp/chatweave-logs");
    config.logging.file_rotation = LogRotation::Hourly;
    config.logging.file_prefix = "cw".to_string();

    let resolved = Config::resolve(parse(&config.to_toml()), no_env);
    assert_eq!(resolved, config);
}

#[test]
fn test_empty_file_gives_defaults() {
    let resolved = Config::resolve(parse(""), no_env);
    assert_eq!(resolved, Config::default());
}

// ─────────────────────────────────────────────────────────────────────────────
// Section overrides
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_partial_section_keeps_other_defaults() {
    let file = parse(
        r#"
[catalog]
timeout_secs = 2

[scroll]
proximity_px = 40.0
"#,
    );
    let config = Config::resolve(file, no_env);

    assert_eq!(config.catalog.timeout_secs, 2);
    assert!(config.catalog.enabled);
    assert_eq!(config.catalog.merge_order, MergeOrder::ChannelFirst);
    assert_eq!(config.scroll.proximity_px, 40.0);
    assert_eq!(config.scroll.instant_guard_ms, 100);
    assert_eq!(config.scroll.animated_guard_ms, 500);
    assert_eq!(config.feed.capacity, 200);
}

#[test]
fn test_unknown_merge_order_falls_back_to_channel_first() {
    let file = parse("[catalog]\nmerge_order = \"alphabetical\"\n");
    let config = Config::resolve(file, no_env);
    assert_eq!(config.catalog.merge_order, MergeOrder::ChannelFirst);
}

#[test]
fn test_invalid_numbers_are_clamped() {
    let file = parse("[feed]\ncapacity = 0\n\n[render]\nfont_size = -3.0\n");
    let config = Config::resolve(file, no_env);
    assert_eq!(config.feed.capacity, 1);
    assert_eq!(config.render.font_size, 14.0);
}

#[test]
fn test_env_overrides_file() {
    let file = parse(
        r#"
channel_id = "111"
demo = false

[feed]
highlight_terms = ["fromfile"]
"#,
    );
    let env: HashMap<&str, &str> = [
        ("CHATWEAVE_CHANNEL_ID", "222"),
        ("CHATWEAVE_DEMO", "true"),
        ("CHATWEAVE_NO_TUI", "1"),
        ("CHATWEAVE_REPLAY", "/tmp/chat.jsonl"),
        ("CHATWEAVE_HIGHLIGHT", " alice, ,Bob "),
    ]
    .into_iter()
    .collect();

    let config = Config::resolve(file, |k| env.get(k).map(|v| v.to_string()));

    assert_eq!(config.channel_id.as_deref(), Some("222"));
    assert!(config.demo_mode);
    assert!(!config.enable_tui);
    assert_eq!(config.replay, Some(PathBuf::from("/tmp/chat.jsonl")));
    assert_eq!(config.feed.highlight_terms, vec!["alice", "Bob"]);
}

#[test]
fn test_blank_channel_id_is_none() {
    let config = Config::resolve(parse("channel_id = \"  \"\n"), no_env);
    assert_eq!(config.channel_id, None);
}

#[test]
fn test_favorites_are_case_insensitive() {
    let config = Config::resolve(parse("[feed]\nfavorites = [\"BestFriend\"]\n"), no_env);
    assert!(config.feed.is_favorite("bestfriend"));
    assert!(!config.feed.is_favorite("stranger"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Render helpers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_parse_hex() {
    use ratatui::style::Color;
    assert_eq!(parse_hex("#00ad03"), Some(Color::Rgb(0, 173, 3)));
    assert_eq!(parse_hex("ffffff"), Some(Color::Rgb(255, 255, 255)));
    assert_eq!(parse_hex("#fff"), None);
    assert_eq!(parse_hex("#zzzzzz"), None);
}

#[test]
fn test_row_px_and_scroll_tuning() {
    let config = Config::default();
    assert_eq!(config.render.row_px(), 21.0);

    let tuning = config.scroll.tuning();
    assert_eq!(tuning.proximity, 150.0);
    assert_eq!(tuning.instant_guard.as_millis(), 100);
    assert_eq!(tuning.animated_guard.as_millis(), 500);
}

#[test]
fn test_youtube_has_no_role_colors() {
    use crate::models::Platform;
    let render = RenderConfig::default();
    assert!(render.mod_color(Platform::YouTube).is_none());
    assert!(render.vip_color(Platform::Kick).is_some());
}
