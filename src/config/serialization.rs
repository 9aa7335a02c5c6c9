//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML file
    ///
    /// Every field read by `FileConfig` is written here, so the output parses
    /// back to an equivalent config.
    pub fn to_toml(&self) -> String {
        let channel_line = match &self.channel_id {
            Some(id) => format!("channel_id = {:?}\n", id),
            None => "# channel_id = \"12345678\"\n".to_string(),
        };

        format!(
            r#"# chatweave configuration

# Twitch channel id (numeric) used for channel emote catalogs
{channel_line}
# Generate sample traffic instead of reading a replay file
demo = {demo}

[feed]
# Messages kept in the feed window (oldest evicted first)
capacity = {capacity}
# @mentions of these names are highlighted
highlight_terms = {highlights:?}
# Usernames shown as favorites
favorites = {favorites:?}

# Third-party emote catalogs (BetterTTV, FrankerFaceZ, 7TV)
[catalog]
enabled = {catalog_enabled}
timeout_secs = {timeout}
# channel-first: channel emotes beat globals on name collisions
# provider-first: BTTV, then FFZ, then 7TV, each global before channel
merge_order = "{merge_order}"
bttv_base = "{bttv}"
ffz_base = "{ffz}"
seven_tv_base = "{seven_tv}"

[render]
font_size = {font_size:?}
line_height = {line_height:?}
show_badges = {show_badges}
show_timestamp = {show_timestamp}
username_color = "{username_color}"  # original, static
static_username_color = "{static_color}"
twitch_mod_color = "{twitch_mod}"
twitch_vip_color = "{twitch_vip}"
kick_mod_color = "{kick_mod}"
kick_vip_color = "{kick_vip}"
youtube_member_color = "{yt_member}"

# Follow/pause behavior of the feed
[scroll]
proximity_px = {proximity:?}
instant_guard_ms = {instant_guard}
animated_guard_ms = {animated_guard}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            channel_line = channel_line,
            demo = self.demo_mode,
            capacity = self.feed.capacity,
            highlights = self.feed.highlight_terms,
            favorites = self.feed.favorites,
            catalog_enabled = self.catalog.enabled,
            timeout = self.catalog.timeout_secs,
            merge_order = self.catalog.merge_order.as_str(),
            bttv = self.catalog.endpoints.bttv,
            ffz = self.catalog.endpoints.ffz,
            seven_tv = self.catalog.endpoints.seven_tv,
            font_size = self.render.font_size,
            line_height = self.render.line_height,
            show_badges = self.render.show_badges,
            show_timestamp = self.render.show_timestamp,
            username_color = self.render.username_color.as_str(),
            static_color = self.render.static_username_color,
            twitch_mod = self.render.twitch_mod_color,
            twitch_vip = self.render.twitch_vip_color,
            kick_mod = self.render.kick_mod_color,
            kick_vip = self.render.kick_vip_color,
            yt_member = self.render.youtube_member_color,
            proximity = self.scroll.proximity_px,
            instant_guard = self.scroll.instant_guard_ms,
            animated_guard = self.scroll.animated_guard_ms,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string().replace('\\', "/"),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
