// Emote catalog - third-party emote definitions for one channel
//
// A Catalog is built wholesale from six provider/scope buckets (three
// providers, global + channel scope each) and never mutated afterwards.
// Renders hold an Arc<Catalog>; a rebuild produces a new Catalog that is
// swapped in by the CatalogStore.
//
// Two views of the same data:
// - buckets: each provider/scope list as fetched (for the emote browser)
// - lookup: merged code -> URL map used for substitution, collisions
//   resolved by MergeOrder, first insertion wins

pub mod aggregator;
pub mod providers;
pub mod store;

pub use aggregator::{CatalogAggregator, FetchError, HttpFetcher, JsonFetcher};
pub use store::CatalogStore;

use std::collections::HashMap;

/// Third-party emote provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Bttv,
    Ffz,
    SevenTv,
}

impl Provider {
    /// Providers in their base precedence order
    pub fn all() -> &'static [Provider] {
        &[Provider::Bttv, Provider::Ffz, Provider::SevenTv]
    }

    pub fn id(&self) -> &'static str {
        match self {
            Provider::Bttv => "bttv",
            Provider::Ffz => "ffz",
            Provider::SevenTv => "7tv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provider::Bttv => "BTTV",
            Provider::Ffz => "FFZ",
            Provider::SevenTv => "7TV",
        }
    }
}

/// Catalog scope: provider-wide or channel-specific
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Channel,
}

impl Scope {
    pub fn all() -> &'static [Scope] {
        &[Scope::Global, Scope::Channel]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Channel => "channel",
        }
    }
}

/// Precedence used when two buckets define the same code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeOrder {
    /// All channel buckets before any global bucket (a channel's emote
    /// shadows a global one with the same code)
    #[default]
    ChannelFirst,
    /// Per provider: global then channel, providers in base order
    ProviderFirst,
}

impl MergeOrder {
    /// Parse merge order string from config
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "provider-first" | "provider_first" => Self::ProviderFirst,
            _ => Self::ChannelFirst,
        }
    }

    /// Convert to string for TOML serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChannelFirst => "channel-first",
            Self::ProviderFirst => "provider-first",
        }
    }

    /// Full insertion sequence, highest precedence first
    pub fn sequence(&self) -> Vec<(Provider, Scope)> {
        match self {
            Self::ChannelFirst => [Scope::Channel, Scope::Global]
                .iter()
                .flat_map(|&scope| Provider::all().iter().map(move |&p| (p, scope)))
                .collect(),
            Self::ProviderFirst => Provider::all()
                .iter()
                .flat_map(|&p| [(p, Scope::Global), (p, Scope::Channel)])
                .collect(),
        }
    }

    fn rank(&self, provider: Provider, scope: Scope) -> usize {
        self.sequence()
            .iter()
            .position(|&(p, s)| p == provider && s == scope)
            .unwrap_or(usize::MAX)
    }
}

/// One emote definition from a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Token matched against message text (case-sensitive)
    pub code: String,
    pub url: String,
    /// Provider's own id for the emote
    pub origin_id: String,
    pub provider: Provider,
    pub scope: Scope,
}

/// Outcome of fetching one provider/scope bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketStatus {
    Loaded,
    /// Not requested (e.g. no usable channel id)
    Skipped,
    /// Fetch or decode failed; the bucket contributes nothing
    Failed(String),
}

/// Entries contributed by one provider/scope
#[derive(Debug, Clone)]
pub struct Bucket {
    pub provider: Provider,
    pub scope: Scope,
    pub entries: Vec<CatalogEntry>,
    pub status: BucketStatus,
}

impl Bucket {
    pub fn loaded(provider: Provider, scope: Scope, entries: Vec<CatalogEntry>) -> Self {
        Self {
            provider,
            scope,
            entries,
            status: BucketStatus::Loaded,
        }
    }

    pub fn skipped(provider: Provider, scope: Scope) -> Self {
        Self {
            provider,
            scope,
            entries: Vec::new(),
            status: BucketStatus::Skipped,
        }
    }

    pub fn failed(provider: Provider, scope: Scope, reason: impl Into<String>) -> Self {
        Self {
            provider,
            scope,
            entries: Vec::new(),
            status: BucketStatus::Failed(reason.into()),
        }
    }
}

/// Aggregated third-party emotes for one channel
#[derive(Debug, Clone)]
pub struct Catalog {
    generation: u64,
    channel_id: Option<String>,
    buckets: Vec<Bucket>,
    lookup: HashMap<String, String>,
}

impl Catalog {
    /// Empty catalog (no third-party emotes)
    pub fn empty() -> Self {
        Self {
            generation: 0,
            channel_id: None,
            buckets: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Merge fetched buckets into a catalog
    ///
    /// Buckets are inserted in `order`; for every code the first URL seen is
    /// kept and later definitions are skipped. The per-bucket lists are kept
    /// untouched for browsing.
    pub fn merge(
        channel_id: Option<String>,
        generation: u64,
        mut buckets: Vec<Bucket>,
        order: MergeOrder,
    ) -> Self {
        buckets.sort_by_key(|b| order.rank(b.provider, b.scope));

        let mut lookup = HashMap::new();
        for bucket in &buckets {
            for entry in &bucket.entries {
                lookup
                    .entry(entry.code.clone())
                    .or_insert_with(|| entry.url.clone());
            }
        }

        Self {
            generation,
            channel_id,
            buckets,
            lookup,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.channel_id.as_deref()
    }

    /// Merged code -> URL map
    pub fn lookup(&self) -> &HashMap<String, String> {
        &self.lookup
    }

    pub fn resolve(&self, code: &str) -> Option<&str> {
        self.lookup.get(code).map(String::as_str)
    }

    /// Entries of one provider/scope, as fetched
    pub fn entries(&self, provider: Provider, scope: Scope) -> &[CatalogEntry] {
        self.bucket(provider, scope)
            .map(|b| b.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn bucket(&self, provider: Provider, scope: Scope) -> Option<&Bucket> {
        self.buckets
            .iter()
            .find(|b| b.provider == provider && b.scope == scope)
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Number of distinct codes available for substitution
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Number of buckets whose fetch failed
    pub fn failed_buckets(&self) -> usize {
        self.buckets
            .iter()
            .filter(|b| matches!(b.status, BucketStatus::Failed(_)))
            .count()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}
