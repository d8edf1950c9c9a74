use chrono::{DateTime, Duration, Utc};

use crate::db::SeriesStore;
use crate::models::FreshnessRecord;

/// Decides whether a cached series can be served or must be refetched.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessPolicy {
    ttl: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self { ttl: Duration::hours(crate::config::DEFAULT_CACHE_TTL_HOURS) }
    }
}

impl FreshnessPolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub async fn should_fetch(&self, store: &dyn SeriesStore, series_id: &str) -> bool {
        self.should_fetch_at(store, series_id, Utc::now()).await
    }

    /// Read-only. A store error counts as "must fetch".
    pub async fn should_fetch_at(&self, store: &dyn SeriesStore, series_id: &str, now: DateTime<Utc>) -> bool {
        let record = match store.freshness(series_id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(series_id, error = %e, "freshness lookup failed, forcing refetch");
                return true;
            }
        };

        // The timestamp and the rows are written by different statements, so a
        // recent timestamp alone does not prove the rows are there.
        let stored = match &record {
            Some(_) => match store.count(series_id).await {
                Ok(count) => count,
                Err(e) => {
                    tracing::warn!(series_id, error = %e, "observation count failed, forcing refetch");
                    return true;
                }
            },
            None => 0,
        };

        self.evaluate(record.as_ref(), stored, now)
    }

    pub fn evaluate(&self, record: Option<&FreshnessRecord>, stored_observations: i64, now: DateTime<Utc>) -> bool {
        let Some(record) = record else {
            return true;
        };

        let elapsed = now.signed_duration_since(record.last_fetched_at);
        if elapsed > self.ttl {
            return true;
        }

        stored_observations == 0
    }
}
