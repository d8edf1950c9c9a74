use anyhow::{bail, Result};
use serde::Serialize;
use std::sync::Arc;

use crate::core::freshness::FreshnessPolicy;
use crate::db::SeriesStore;
use crate::fetcher::{DataSource, DateRange};
use crate::indicators::series::series_metadata;
use crate::models::{normalize, Observation};

/// Where a fetched series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FetchOrigin {
    Cache,
    Live,
    /// Nothing usable: no credential, an upstream failure, or an empty response.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub observations: Vec<Observation>,
    pub origin: FetchOrigin,
}

impl FetchOutcome {
    fn unavailable() -> Self {
        Self { observations: Vec::new(), origin: FetchOrigin::Unavailable }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Cache-or-fetch access to one upstream series at a time.
///
/// `source` is `None` when no credential is configured; stale series then
/// resolve to an empty outcome instead of an error.
#[derive(Clone)]
pub struct RawFetcher {
    store: Arc<dyn SeriesStore>,
    source: Option<Arc<dyn DataSource>>,
    policy: FreshnessPolicy,
}

impl RawFetcher {
    pub fn new(store: Arc<dyn SeriesStore>, source: Option<Arc<dyn DataSource>>, policy: FreshnessPolicy) -> Self {
        Self { store, source, policy }
    }

    pub fn store(&self) -> &Arc<dyn SeriesStore> {
        &self.store
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Only an empty series id is an error. Upstream and persistence failures
    /// are logged and degrade to whatever data is still available.
    pub async fn fetch(&self, series_id: &str, range: DateRange) -> Result<FetchOutcome> {
        if series_id.trim().is_empty() {
            bail!("series id must not be empty");
        }

        if !self.policy.should_fetch(self.store.as_ref(), series_id).await {
            match self.store.get(series_id).await {
                Ok(Some(observations)) => {
                    tracing::debug!(series_id, count = observations.len(), "serving cached series");
                    return Ok(FetchOutcome { observations, origin: FetchOrigin::Cache });
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(series_id, error = %e, "cache read failed, refetching"),
            }
        }

        let Some(source) = &self.source else {
            tracing::debug!(series_id, "no upstream credential configured");
            return Ok(FetchOutcome::unavailable());
        };

        let observations = match source.fetch_data(series_id, range).await {
            Ok(observations) => normalize(observations),
            Err(e) => {
                tracing::warn!(series_id, source = source.name(), error = %e, "upstream fetch failed");
                return Ok(FetchOutcome::unavailable());
            }
        };

        if observations.is_empty() {
            tracing::info!(series_id, "upstream returned no usable observations");
            return Ok(FetchOutcome::unavailable());
        }

        let metadata = series_metadata(series_id);
        if let Err(e) = self.store.put(series_id, &observations, &metadata).await {
            tracing::warn!(series_id, error = %e, "failed to cache series");
        } else {
            tracing::info!(series_id, count = observations.len(), "cached series");
        }

        Ok(FetchOutcome { observations, origin: FetchOrigin::Live })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{BrokenStore, StubSource};
    use super::*;
    use crate::db::{init_in_memory, SqliteStore};
    use chrono::NaiveDate;

    fn obs(date: &str, value: f64) -> Observation {
        Observation::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), value)
    }

    async fn sqlite() -> Arc<dyn SeriesStore> {
        Arc::new(SqliteStore::new(init_in_memory().await.unwrap()))
    }

    fn unrate() -> Vec<Observation> {
        vec![obs("2020-01-01", 3.5), obs("2020-02-01", 3.5), obs("2020-03-01", 4.4)]
    }

    #[tokio::test]
    async fn test_live_fetch_then_cache_hit() {
        let store = sqlite().await;
        let source = Arc::new(StubSource::default().with("UNRATE", unrate()));
        let fetcher = RawFetcher::new(store.clone(), Some(source.clone()), FreshnessPolicy::default());

        let first = fetcher.fetch("UNRATE", DateRange::default()).await.unwrap();
        assert_eq!(first.origin, FetchOrigin::Live);
        assert_eq!(first.observations, unrate());
        assert_eq!(store.count("UNRATE").await.unwrap(), 3);

        let second = fetcher.fetch("UNRATE", DateRange::default()).await.unwrap();
        assert_eq!(second.origin, FetchOrigin::Cache);
        assert_eq!(second.observations, unrate());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_live_outcome_matches_cached_outcome() {
        let store = sqlite().await;
        let messy = vec![obs("2020-03-01", 4.4), obs("2020-01-01", 3.5), obs("2020-03-01", 4.5), obs("2020-02-01", 3.5)];
        let source = Arc::new(StubSource::default().with("UNRATE", messy));
        let fetcher = RawFetcher::new(store.clone(), Some(source), FreshnessPolicy::default());

        let live = fetcher.fetch("UNRATE", DateRange::default()).await.unwrap();
        assert_eq!(live.observations, vec![obs("2020-01-01", 3.5), obs("2020-02-01", 3.5), obs("2020-03-01", 4.5)]);
        assert_eq!(store.count("UNRATE").await.unwrap(), live.observations.len() as i64);

        let cached = fetcher.fetch("UNRATE", DateRange::default()).await.unwrap();
        assert_eq!(cached.origin, FetchOrigin::Cache);
        assert_eq!(cached.observations, live.observations);
    }

    #[tokio::test]
    async fn test_persists_catalog_metadata() {
        let store = sqlite().await;
        let source = Arc::new(StubSource::default().with("UNRATE", unrate()));
        let fetcher = RawFetcher::new(store.clone(), Some(source), FreshnessPolicy::default());

        fetcher.fetch("UNRATE", DateRange::default()).await.unwrap();
        let meta = store.get_metadata("UNRATE").await.unwrap().unwrap();
        assert_eq!(meta, series_metadata("UNRATE"));
    }

    #[tokio::test]
    async fn test_missing_credential_is_soft() {
        let fetcher = RawFetcher::new(sqlite().await, None, FreshnessPolicy::default());
        assert!(!fetcher.has_source());
        let outcome = fetcher.fetch("UNRATE", DateRange::default()).await.unwrap();
        assert_eq!(outcome.origin, FetchOrigin::Unavailable);
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_still_serves_fresh_cache() {
        let store = sqlite().await;
        store.put("UNRATE", &unrate(), &series_metadata("UNRATE")).await.unwrap();

        let fetcher = RawFetcher::new(store, None, FreshnessPolicy::default());
        let outcome = fetcher.fetch("UNRATE", DateRange::default()).await.unwrap();
        assert_eq!(outcome.origin, FetchOrigin::Cache);
        assert_eq!(outcome.observations.len(), 3);
    }

    #[tokio::test]
    async fn test_upstream_error_degrades_to_empty() {
        let store = sqlite().await;
        let source = Arc::new(StubSource::default().failing_on("GDP"));
        let fetcher = RawFetcher::new(store.clone(), Some(source), FreshnessPolicy::default());

        let outcome = fetcher.fetch("GDP", DateRange::default()).await.unwrap();
        assert_eq!(outcome.origin, FetchOrigin::Unavailable);
        assert!(store.freshness("GDP").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_response_is_not_cached() {
        let store = sqlite().await;
        let source = Arc::new(StubSource::default().with("GDP", vec![]));
        let fetcher = RawFetcher::new(store.clone(), Some(source.clone()), FreshnessPolicy::default());

        assert!(fetcher.fetch("GDP", DateRange::default()).await.unwrap().is_empty());
        assert!(fetcher.fetch("GDP", DateRange::default()).await.unwrap().is_empty());
        assert_eq!(source.calls(), 2);
        assert!(store.freshness("GDP").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_failure_still_returns_data() {
        let source = Arc::new(StubSource::default().with("UNRATE", unrate()));
        let fetcher = RawFetcher::new(Arc::new(BrokenStore), Some(source), FreshnessPolicy::default());

        let outcome = fetcher.fetch("UNRATE", DateRange::default()).await.unwrap();
        assert_eq!(outcome.origin, FetchOrigin::Live);
        assert_eq!(outcome.observations, unrate());
    }

    #[tokio::test]
    async fn test_empty_series_id_is_an_error() {
        let fetcher = RawFetcher::new(sqlite().await, None, FreshnessPolicy::default());
        assert!(fetcher.fetch("", DateRange::default()).await.is_err());
        assert!(fetcher.fetch("   ", DateRange::default()).await.is_err());
    }
}
