//! Catalog configuration: third-party emote fetching

use serde::Deserialize;
use std::time::Duration;

use crate::emotes::providers::ProviderEndpoints;
use crate::emotes::MergeOrder;

/// Third-party emote catalog settings
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Fetch BTTV/FFZ/7TV catalogs at all
    pub enabled: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Collision priority between buckets
    pub merge_order: MergeOrder,
    /// Provider API base URLs
    pub endpoints: ProviderEndpoints,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 5,
            merge_order: MergeOrder::default(),
            endpoints: ProviderEndpoints::default(),
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Catalog settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileCatalog {
    pub enabled: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub merge_order: Option<String>,
    pub bttv_base: Option<String>,
    pub ffz_base: Option<String>,
    pub seven_tv_base: Option<String>,
}

impl CatalogConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileCatalog>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            enabled: file.enabled.unwrap_or(defaults.enabled),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
            merge_order: file
                .merge_order
                .map(|s| MergeOrder::from_str(&s))
                .unwrap_or(defaults.merge_order),
            endpoints: ProviderEndpoints {
                bttv: file.bttv_base.unwrap_or(defaults.endpoints.bttv),
                ffz: file.ffz_base.unwrap_or(defaults.endpoints.ffz),
                seven_tv: file.seven_tv_base.unwrap_or(defaults.endpoints.seven_tv),
            },
        }
    }
}
