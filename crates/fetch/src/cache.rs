//! Memoized fetches backed by `moka::future::Cache`.
//!
//! A cached list is reused for the same url and fallback until it is older
//! than the time to live. Failed fetches are cached too: their fallback result
//! is what a caller gets until the entry expires.

use std::{sync::Arc, time::Duration};

use model::{feature::UnitFeature, unit::Unit, WithId};
use moka::future::Cache;

use crate::{http::HttpClient, retry::Fetcher};

pub const DEFAULT_TIME_TO_LIVE: Duration = Duration::from_secs(60);

/// Identifies a memoized call. Fallbacks are told apart by allocation, so
/// callers should keep reusing the same `Arc` for the same fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    url: String,
    fallback: Option<usize>,
}

impl CacheKey {
    fn new<T>(url: &str, fallback: Option<&Arc<[T]>>) -> Self {
        Self {
            url: url.to_owned(),
            fallback: fallback.map(|fallback| Arc::as_ptr(fallback) as *const T as usize),
        }
    }
}

pub struct CachedFetcher<H: HttpClient + 'static> {
    fetcher: Arc<Fetcher<H>>,
    units: Cache<CacheKey, Arc<Vec<Unit>>>,
    features: Cache<CacheKey, Arc<Vec<WithId<UnitFeature>>>>,
}

impl<H: HttpClient + 'static> CachedFetcher<H> {
    pub fn new(fetcher: Fetcher<H>) -> Self {
        Self::with_time_to_live(fetcher, DEFAULT_TIME_TO_LIVE)
    }

    pub fn with_time_to_live(fetcher: Fetcher<H>, time_to_live: Duration) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            units: Cache::builder().time_to_live(time_to_live).build(),
            features: Cache::builder().time_to_live(time_to_live).build(),
        }
    }

    pub fn fetcher(&self) -> &Fetcher<H> {
        &self.fetcher
    }

    pub async fn units(&self, url: &str, fallback: Option<Arc<[Unit]>>) -> Arc<Vec<Unit>> {
        let key = CacheKey::new(url, fallback.as_ref());
        self.units
            .get_with(key, async {
                log::info!("Fetching units...");
                Arc::new(self.fetcher.fetch_units(url, fallback.as_deref()).await)
            })
            .await
    }

    pub async fn features(
        &self,
        url: &str,
        fallback: Option<Arc<[WithId<UnitFeature>]>>,
    ) -> Arc<Vec<WithId<UnitFeature>>> {
        let key = CacheKey::new(url, fallback.as_ref());
        self.features
            .get_with(key, async {
                log::info!("Fetching units...");
                Arc::new(self.fetcher.fetch_features(url, fallback.as_deref()).await)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{http::tests::ScriptedClient, RetryPolicy};

    fn policy() -> RetryPolicy {
        RetryPolicy {
            attempts: 1,
            timeout: Duration::from_millis(10),
            backoff_unit: Duration::from_millis(1),
        }
    }

    fn units_payload(callsign: &str) -> serde_json::Value {
        json!([{ "callsign": callsign, "affiliation": "unknown", "latitude": 0.0, "longitude": 0.0 }])
    }

    #[tokio::test]
    async fn repeated_calls_hit_the_network_once() {
        let client = ScriptedClient::new(vec![Ok(units_payload("A")), Ok(units_payload("B"))]);
        let cached = CachedFetcher::new(Fetcher::new(client, policy()));

        let first = cached.units("http://units", None).await;
        let second = cached.units("http://units", None).await;
        assert_eq!(first, second);
        assert_eq!(first[0].callsign(), "A");
        assert_eq!(cached.fetcher().client().calls(), 1);
    }

    #[tokio::test]
    async fn urls_and_fallbacks_are_cached_separately() {
        let client = ScriptedClient::new(vec![
            Ok(units_payload("A")),
            Ok(units_payload("B")),
            Ok(units_payload("C")),
        ]);
        let cached = CachedFetcher::new(Fetcher::new(client, policy()));
        let fallback: Arc<[Unit]> = Arc::from(Vec::new());

        assert_eq!(cached.units("http://one", None).await[0].callsign(), "A");
        assert_eq!(cached.units("http://two", None).await[0].callsign(), "B");
        assert_eq!(
            cached.units("http://one", Some(fallback.clone())).await[0].callsign(),
            "C"
        );
        assert_eq!(
            cached.units("http://one", Some(fallback)).await[0].callsign(),
            "C"
        );
        assert_eq!(cached.fetcher().client().calls(), 3);
    }

    #[tokio::test]
    async fn entries_expire() {
        let client = ScriptedClient::new(vec![Ok(units_payload("A")), Ok(units_payload("B"))]);
        let cached =
            CachedFetcher::with_time_to_live(Fetcher::new(client, policy()), Duration::from_millis(50));

        assert_eq!(cached.units("http://units", None).await[0].callsign(), "A");
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(cached.units("http://units", None).await[0].callsign(), "B");
        assert_eq!(cached.fetcher().client().calls(), 2);
    }

    #[tokio::test]
    async fn fallback_result_is_cached() {
        let cached = CachedFetcher::new(Fetcher::new(ScriptedClient::failing(), policy()));
        let fallback: Arc<[Unit]> = Arc::from(crate::sample::sample_units());

        let units = cached.units("http://units", Some(fallback.clone())).await;
        assert_eq!(units.as_slice(), &fallback[..]);
        cached.units("http://units", Some(fallback)).await;
        assert_eq!(cached.fetcher().client().calls(), 1);
    }
}
