//! Provider endpoints and payload normalization
//!
//! Each provider exposes a global endpoint and a channel endpoint keyed by the
//! numeric Twitch channel id. Payload schemas differ; normalization reduces
//! all of them to `CatalogEntry` values with one canonical image URL,
//! preferring the medium-resolution (2x) asset.

use super::{CatalogEntry, FetchError, Provider, Scope};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

pub const DEFAULT_BTTV_BASE: &str = "https://api.betterttv.net";
pub const DEFAULT_FFZ_BASE: &str = "https://api.frankerfacez.com";
pub const DEFAULT_SEVEN_TV_BASE: &str = "https://7tv.io";

const BTTV_CDN: &str = "https://cdn.betterttv.net/emote";

/// API base URLs for each provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub bttv: String,
    pub ffz: String,
    pub seven_tv: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            bttv: DEFAULT_BTTV_BASE.to_string(),
            ffz: DEFAULT_FFZ_BASE.to_string(),
            seven_tv: DEFAULT_SEVEN_TV_BASE.to_string(),
        }
    }
}

impl ProviderEndpoints {
    fn base(&self, provider: Provider) -> &str {
        let base = match provider {
            Provider::Bttv => &self.bttv,
            Provider::Ffz => &self.ffz,
            Provider::SevenTv => &self.seven_tv,
        };
        base.trim_end_matches('/')
    }

    /// Request URL for one provider/scope
    pub fn url(&self, provider: Provider, scope: Scope, channel_id: &str) -> String {
        let base = self.base(provider);
        match (provider, scope) {
            (Provider::Bttv, Scope::Global) => format!("{}/3/cached/emotes/global", base),
            (Provider::Bttv, Scope::Channel) => {
                format!("{}/3/cached/users/twitch/{}", base, channel_id)
            }
            (Provider::Ffz, Scope::Global) => format!("{}/v1/set/global", base),
            (Provider::Ffz, Scope::Channel) => format!("{}/v1/room/id/{}", base, channel_id),
            (Provider::SevenTv, Scope::Global) => format!("{}/v3/emote-sets/global", base),
            (Provider::SevenTv, Scope::Channel) => {
                format!("{}/v3/users/twitch/{}", base, channel_id)
            }
        }
    }
}

/// Normalize a provider payload into catalog entries
pub fn normalize(
    provider: Provider,
    scope: Scope,
    payload: serde_json::Value,
) -> Result<Vec<CatalogEntry>, FetchError> {
    let emotes = match (provider, scope) {
        (Provider::Bttv, Scope::Global) => {
            let list: Vec<BttvEmote> = decode(payload)?;
            bttv_entries(list)
        }
        (Provider::Bttv, Scope::Channel) => {
            let user: BttvUser = decode(payload)?;
            bttv_entries(user.channel_emotes.into_iter().chain(user.shared_emotes))
        }
        (Provider::Ffz, _) => {
            let room: FfzSets = decode(payload)?;
            ffz_entries(room)
        }
        (Provider::SevenTv, Scope::Global) => {
            let set: SevenTvSet = decode(payload)?;
            seven_tv_entries(set)
        }
        (Provider::SevenTv, Scope::Channel) => {
            let user: SevenTvUser = decode(payload)?;
            user.emote_set.map(seven_tv_entries).unwrap_or_default()
        }
    };

    Ok(emotes
        .into_iter()
        .map(|e| CatalogEntry {
            code: e.code,
            url: e.url,
            origin_id: e.id,
            provider,
            scope,
        })
        .collect())
}

fn decode<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T, FetchError> {
    serde_json::from_value(payload).map_err(|e| FetchError::Malformed(e.to_string()))
}

/// Provider-neutral (code, id, url) tuple
struct RawEmote {
    code: String,
    id: String,
    url: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// BetterTTV
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct BttvEmote {
    id: String,
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BttvUser {
    #[serde(default)]
    channel_emotes: Vec<BttvEmote>,
    #[serde(default)]
    shared_emotes: Vec<BttvEmote>,
}

fn bttv_entries(emotes: impl IntoIterator<Item = BttvEmote>) -> Vec<RawEmote> {
    emotes
        .into_iter()
        .map(|e| RawEmote {
            url: format!("{}/{}/2x", BTTV_CDN, e.id),
            code: e.code,
            id: e.id,
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// FrankerFaceZ
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FfzSets {
    #[serde(default)]
    sets: BTreeMap<String, FfzSet>,
}

#[derive(Debug, Deserialize)]
struct FfzSet {
    #[serde(default)]
    emoticons: Vec<FfzEmote>,
}

#[derive(Debug, Deserialize)]
struct FfzEmote {
    id: u64,
    name: String,
    /// Scale ("1", "2", "4") -> URL; values may be null
    #[serde(default)]
    urls: BTreeMap<String, Option<String>>,
}

fn ffz_entries(room: FfzSets) -> Vec<RawEmote> {
    room.sets
        .into_values()
        .flat_map(|set| set.emoticons)
        .filter_map(|e| {
            let url = ffz_pick_url(&e.urls)?;
            Some(RawEmote {
                code: e.name,
                id: e.id.to_string(),
                url,
            })
        })
        .collect()
}

fn ffz_pick_url(urls: &BTreeMap<String, Option<String>>) -> Option<String> {
    let pick = |scale: &str| urls.get(scale).and_then(|u| u.as_deref());
    let url = pick("2")
        .or_else(|| pick("1"))
        .or_else(|| urls.values().find_map(|u| u.as_deref()))?;
    Some(with_scheme(url))
}

// ─────────────────────────────────────────────────────────────────────────────
// 7TV
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SevenTvUser {
    emote_set: Option<SevenTvSet>,
}

#[derive(Debug, Deserialize)]
struct SevenTvSet {
    emotes: Option<Vec<SevenTvEmote>>,
}

#[derive(Debug, Deserialize)]
struct SevenTvEmote {
    id: String,
    name: String,
    data: Option<SevenTvData>,
}

#[derive(Debug, Deserialize)]
struct SevenTvData {
    host: SevenTvHost,
}

#[derive(Debug, Deserialize)]
struct SevenTvHost {
    url: String,
    #[serde(default)]
    files: Vec<SevenTvFile>,
}

#[derive(Debug, Deserialize)]
struct SevenTvFile {
    name: String,
    #[serde(default)]
    format: String,
}

fn seven_tv_entries(set: SevenTvSet) -> Vec<RawEmote> {
    set.emotes
        .unwrap_or_default()
        .into_iter()
        .filter_map(|e| {
            let host = e.data?.host;
            let file = host
                .files
                .iter()
                .find(|f| f.format == "WEBP" && f.name == "2x.webp")
                .or_else(|| host.files.first())?;
            Some(RawEmote {
                url: format!("{}/{}", with_scheme(&host.url), file.name),
                code: e.name,
                id: e.id,
            })
        })
        .collect()
}

/// Upgrade protocol-relative URLs (`//cdn...`) to https
fn with_scheme(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_urls() {
        let endpoints = ProviderEndpoints::default();
        assert_eq!(
            endpoints.url(Provider::Bttv, Scope::Channel, "1234"),
            "https://api.betterttv.net/3/cached/users/twitch/1234"
        );
        assert_eq!(
            endpoints.url(Provider::Ffz, Scope::Global, "1234"),
            "https://api.frankerfacez.com/v1/set/global"
        );
        assert_eq!(
            endpoints.url(Provider::SevenTv, Scope::Channel, "1234"),
            "https://7tv.io/v3/users/twitch/1234"
        );
    }

    #[test]
    fn test_endpoint_base_trailing_slash() {
        let endpoints = ProviderEndpoints {
            bttv: "http://localhost:9000/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            endpoints.url(Provider::Bttv, Scope::Global, ""),
            "http://localhost:9000/3/cached/emotes/global"
        );
    }

    #[test]
    fn test_bttv_global() {
        let payload = json!([
            {"id": "54fa8f1401e468494b85b537", "code": ":tf:", "imageType": "png"},
            {"id": "5590b223b344e2c42a9e28e3", "code": "PepeHands", "imageType": "png"}
        ]);
        let entries = normalize(Provider::Bttv, Scope::Global, payload).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].code, "PepeHands");
        assert_eq!(
            entries[1].url,
            "https://cdn.betterttv.net/emote/5590b223b344e2c42a9e28e3/2x"
        );
        assert_eq!(entries[1].scope, Scope::Global);
    }

    #[test]
    fn test_bttv_channel_merges_shared() {
        let payload = json!({
            "id": "abc",
            "channelEmotes": [{"id": "c1", "code": "ChanEmote"}],
            "sharedEmotes": [{"id": "s1", "code": "SharedEmote"}]
        });
        let entries = normalize(Provider::Bttv, Scope::Channel, payload).unwrap();
        let codes: Vec<_> = entries.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["ChanEmote", "SharedEmote"]);
    }

    #[test]
    fn test_ffz_prefers_medium_then_falls_back() {
        let payload = json!({
            "sets": {
                "3": {"emoticons": [
                    {"id": 1, "name": "Both", "urls": {"1": "//cdn/1x", "2": "//cdn/2x"}},
                    {"id": 2, "name": "OnlySmall", "urls": {"1": "https://cdn/small"}},
                    {"id": 3, "name": "OnlyLarge", "urls": {"2": null, "4": "https://cdn/4x"}},
                    {"id": 4, "name": "None", "urls": {}}
                ]}
            }
        });
        let entries = normalize(Provider::Ffz, Scope::Global, payload).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].url, "https://cdn/2x");
        assert_eq!(entries[1].url, "https://cdn/small");
        assert_eq!(entries[2].url, "https://cdn/4x");
        assert_eq!(entries[0].origin_id, "1");
    }

    #[test]
    fn test_seven_tv_channel() {
        let payload = json!({
            "emote_set": {
                "emotes": [
                    {
                        "id": "60ae",
                        "name": "catJAM",
                        "data": {"host": {
                            "url": "//cdn.7tv.app/emote/60ae",
                            "files": [
                                {"name": "1x.webp", "format": "WEBP"},
                                {"name": "2x.avif", "format": "AVIF"},
                                {"name": "2x.webp", "format": "WEBP"}
                            ]
                        }}
                    },
                    {
                        "id": "61bb",
                        "name": "NoWebp",
                        "data": {"host": {
                            "url": "//cdn.7tv.app/emote/61bb",
                            "files": [{"name": "1x.avif", "format": "AVIF"}]
                        }}
                    }
                ]
            }
        });
        let entries = normalize(Provider::SevenTv, Scope::Channel, payload).unwrap();
        assert_eq!(entries[0].url, "https://cdn.7tv.app/emote/60ae/2x.webp");
        assert_eq!(entries[1].url, "https://cdn.7tv.app/emote/61bb/1x.avif");
    }

    #[test]
    fn test_seven_tv_user_without_set() {
        let payload = json!({"id": "u", "emote_set": null});
        let entries = normalize(Provider::SevenTv, Scope::Channel, payload).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_seven_tv_global_null_emotes() {
        let payload = json!({"id": "global", "emotes": null});
        let entries = normalize(Provider::SevenTv, Scope::Global, payload).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_malformed_payload_is_error() {
        let payload = json!({"message": "user not found"});
        let err = normalize(Provider::Bttv, Scope::Global, payload).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }
}
