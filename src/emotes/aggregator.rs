//! Catalog aggregation: fan out to every provider/scope, fan in, merge
//!
//! All six fetches run concurrently and each one sits behind its own failure
//! boundary: network errors, non-success statuses, timeouts and malformed
//! payloads turn into an empty bucket plus a warning. `build_catalog` itself
//! cannot fail; if every provider is down the result is a valid empty catalog.

use super::providers::{self, ProviderEndpoints};
use super::{Bucket, Catalog, MergeOrder, Provider, Scope};
use futures::future::{join_all, BoxFuture};
use std::fmt;
use std::time::Duration;

/// Errors that can occur while fetching one provider/scope
///
/// Never escapes the aggregator: each one is logged and the bucket is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, DNS or TLS failure
    Network(String),
    /// Provider answered with a non-success status
    Status(u16),
    /// Provider did not answer within the fetch timeout
    Timeout(Duration),
    /// Body was not the JSON shape the provider documents
    Malformed(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {}", msg),
            FetchError::Status(code) => write!(f, "HTTP {}", code),
            FetchError::Timeout(d) => write!(f, "timed out after {:.1}s", d.as_secs_f64()),
            FetchError::Malformed(msg) => write!(f, "malformed payload: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Source of JSON documents for provider endpoints
///
/// The HTTP implementation is `HttpFetcher`; tests substitute canned payloads.
pub trait JsonFetcher: Send + Sync {
    fn get_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<serde_json::Value, FetchError>>;
}

/// reqwest-backed fetcher
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> anyhow::Result<Self> {
        use anyhow::Context;

        let client = reqwest::Client::builder()
            .user_agent(concat!("chatweave/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(2)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

impl JsonFetcher for HttpFetcher {
    fn get_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<serde_json::Value, FetchError>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| FetchError::Malformed(e.to_string()))
        })
    }
}

/// Builds catalogs for a channel from all providers
pub struct CatalogAggregator<F> {
    fetcher: F,
    endpoints: ProviderEndpoints,
    order: MergeOrder,
    timeout: Duration,
}

impl<F: JsonFetcher> CatalogAggregator<F> {
    pub fn new(fetcher: F, endpoints: ProviderEndpoints, order: MergeOrder, timeout: Duration) -> Self {
        Self {
            fetcher,
            endpoints,
            order,
            timeout,
        }
    }

    /// Fetch, normalize and merge every provider/scope for `channel_id`
    ///
    /// Channel-scope fetches are skipped when the id is not numeric.
    pub async fn build_catalog(&self, channel_id: &str, generation: u64) -> Catalog {
        let channel_id = channel_id.trim();
        let channel_usable = is_numeric_id(channel_id);
        if !channel_usable && !channel_id.is_empty() {
            tracing::warn!(
                "Channel id {:?} is not numeric, skipping channel emote fetches",
                channel_id
            );
        }

        let fetches = Provider::all().iter().flat_map(|&provider| {
            Scope::all().iter().map(move |&scope| (provider, scope))
        });
        let fetches = fetches.map(|(provider, scope)| async move {
            if scope == Scope::Channel && !channel_usable {
                return Bucket::skipped(provider, scope);
            }
            self.fetch_bucket(provider, scope, channel_id).await
        });

        let buckets = join_all(fetches).await;

        let channel = channel_usable.then(|| channel_id.to_string());
        let catalog = Catalog::merge(channel, generation, buckets, self.order);

        tracing::info!(
            "Catalog generation {} ready: {} emotes ({} bucket(s) failed)",
            generation,
            catalog.len(),
            catalog.failed_buckets()
        );
        for bucket in catalog.buckets() {
            tracing::debug!(
                "  {} {}: {} entries ({:?})",
                bucket.provider.label(),
                bucket.scope.as_str(),
                bucket.entries.len(),
                bucket.status
            );
        }

        catalog
    }

    async fn fetch_bucket(&self, provider: Provider, scope: Scope, channel_id: &str) -> Bucket {
        let url = self.endpoints.url(provider, scope, channel_id);

        let result = match tokio::time::timeout(self.timeout, self.fetcher.get_json(&url)).await {
            Ok(Ok(payload)) => providers::normalize(provider, scope, payload),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        };

        match result {
            Ok(entries) => Bucket::loaded(provider, scope, entries),
            Err(e) => {
                tracing::warn!(
                    "{} {} emotes unavailable: {}",
                    provider.label(),
                    scope.as_str(),
                    e
                );
                Bucket::failed(provider, scope, e.to_string())
            }
        }
    }
}

fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// Canned-payload fetcher shared by the aggregator and headless tests
#[cfg(test)]
pub(crate) mod test_support {
    use super::{FetchError, JsonFetcher};
    use futures::future::BoxFuture;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned payloads by URL; unknown URLs fail with a network error
    #[derive(Default)]
    pub(crate) struct FakeFetcher {
        responses: HashMap<String, Result<serde_json::Value, FetchError>>,
        pub(crate) requested: Mutex<Vec<String>>,
        stall: Vec<String>,
        stall_all: bool,
    }

    impl FakeFetcher {
        pub(crate) fn with(mut self, url: &str, response: Result<serde_json::Value, FetchError>) -> Self {
            self.responses.insert(url.to_string(), response);
            self
        }

        pub(crate) fn stalling(mut self, url: &str) -> Self {
            self.stall.push(url.to_string());
            self
        }

        /// Every request hangs until the caller's timeout fires
        pub(crate) fn unreachable() -> Self {
            Self {
                stall_all: true,
                ..Self::default()
            }
        }
    }

    impl JsonFetcher for FakeFetcher {
        fn get_json<'a>(
            &'a self,
            url: &'a str,
        ) -> BoxFuture<'a, Result<serde_json::Value, FetchError>> {
            Box::pin(async move {
                self.requested.lock().unwrap().push(url.to_string());
                if self.stall_all || self.stall.iter().any(|u| u == url) {
                    futures::future::pending::<()>().await;
                }
                self.responses
                    .get(url)
                    .cloned()
                    .unwrap_or_else(|| Err(FetchError::Network("connection refused".into())))
            })
        }
    }
}
