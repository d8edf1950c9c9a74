use chrono::Utc;
use futures_util::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::core::composite::compute_composite;
use crate::core::freshness::FreshnessPolicy;
use crate::core::raw_fetcher::{FetchOrigin, RawFetcher};
use crate::core::synthetic;
use crate::core::transform::transform;
use crate::db::SqliteStore;
use crate::fetcher::fred::FredFetcher;
use crate::fetcher::{DataSource, DateRange};
use crate::indicators::registry::{Catalog, MetricDefinition, MetricKind};
use crate::models::{ComputedMetric, FallbackReason, Observation, Provenance};

/// Resolves catalog metrics to data: cached or live FRED series, composites,
/// or example data when neither is available.
pub struct MetricService {
    catalog: Catalog,
    fetcher: RawFetcher,
    fallback_seed: Option<u64>,
}

impl MetricService {
    /// Serves the built-in catalog.
    pub fn new(fetcher: RawFetcher) -> Self {
        Self::with_catalog(Catalog::standard().clone(), fetcher)
    }

    pub fn with_catalog(catalog: Catalog, fetcher: RawFetcher) -> Self {
        Self { catalog, fetcher, fallback_seed: None }
    }

    /// SQLite-backed service; without an API key every stale series resolves to example data.
    pub fn from_config(config: &EngineConfig, pool: SqlitePool) -> Self {
        let store = Arc::new(SqliteStore::new(pool));
        let source = config.fred_api_key.as_ref().map(|key| {
            Arc::new(FredFetcher::new(key.clone(), config.proxy_url.clone())) as Arc<dyn DataSource>
        });
        if source.is_none() {
            tracing::warn!("FRED_API_KEY not set, live fetches disabled");
        }
        let fetcher = RawFetcher::new(store, source, FreshnessPolicy::new(config.cache_ttl));
        Self::new(fetcher)
    }

    /// Makes example data reproducible. Each metric derives its own stream from the seed.
    pub fn with_fallback_seed(mut self, seed: u64) -> Self {
        self.fallback_seed = Some(seed);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn fetcher(&self) -> &RawFetcher {
        &self.fetcher
    }

    /// `None` only when the id is not in the catalog.
    pub async fn get_metric(&self, id: &str) -> Option<ComputedMetric> {
        let Some(metric) = self.catalog.get(id) else {
            tracing::debug!(id, "unknown metric");
            return None;
        };
        Some(self.assemble(metric).await)
    }

    /// Every catalog metric, assembled concurrently, in catalog order.
    pub async fn get_all_metrics(&self) -> Vec<ComputedMetric> {
        join_all(self.catalog.metrics().iter().map(|metric| self.assemble(metric))).await
    }

    async fn assemble(&self, metric: &MetricDefinition) -> ComputedMetric {
        let (data, provenance) = match self.resolve(metric).await {
            Ok(resolved) => resolved,
            Err(reason) => {
                tracing::info!(metric = %metric.id, ?reason, "using example data");
                (self.fallback(metric), Provenance::SyntheticFallback { reason })
            }
        };

        ComputedMetric {
            id: metric.id.clone(),
            title: metric.title.clone(),
            description: metric.description.clone(),
            unit: metric.unit.clone(),
            category: metric.category.as_str().to_string(),
            frequency: metric.frequency.as_str().to_string(),
            is_percentage: metric.is_percentage,
            data,
            source: provenance.describe(),
            provenance,
        }
    }

    async fn resolve(&self, metric: &MetricDefinition) -> Result<(Vec<Observation>, Provenance), FallbackReason> {
        match &metric.kind {
            MetricKind::Unmapped => Err(FallbackReason::NoMapping),
            MetricKind::Direct { series_id, transform: kind } => {
                let outcome = self.fetcher.fetch(series_id, DateRange::default()).await.map_err(|e| {
                    tracing::error!(metric = %metric.id, series_id = %series_id, error = %e, "fetch failed");
                    FallbackReason::Error
                })?;

                let provenance = match outcome.origin {
                    FetchOrigin::Cache => Provenance::CacheHit { series_id: series_id.clone() },
                    FetchOrigin::Live => Provenance::LiveFetch { series_id: series_id.clone() },
                    FetchOrigin::Unavailable => return Err(FallbackReason::NoData),
                };
                if outcome.is_empty() {
                    return Err(FallbackReason::NoData);
                }

                let data = transform(outcome.observations, *kind);
                if data.is_empty() {
                    tracing::debug!(metric = %metric.id, ?kind, "transform left no points");
                    return Err(FallbackReason::NoData);
                }
                Ok((data, provenance))
            }
            MetricKind::Composite { formula } => {
                let data = compute_composite(&self.fetcher, formula.as_ref()).await;
                if data.is_empty() {
                    return Err(FallbackReason::NoData);
                }
                Ok((data, Provenance::Calculated))
            }
        }
    }

    fn fallback(&self, metric: &MetricDefinition) -> Vec<Observation> {
        let today = Utc::now().date_naive();
        let mut rng = match self.fallback_seed {
            Some(seed) => StdRng::seed_from_u64(metric_seed(seed, &metric.id)),
            None => StdRng::from_entropy(),
        };
        synthetic::generate(metric, today, &mut rng)
    }
}

fn metric_seed(seed: u64, metric_id: &str) -> u64 {
    metric_id
        .bytes()
        .fold(seed, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)))
}
