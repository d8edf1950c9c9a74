use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use debt_cycle_lib::core::freshness::FreshnessPolicy;
use debt_cycle_lib::fetcher::{DataSource, DateRange};
use debt_cycle_lib::models::FallbackReason;
use debt_cycle_lib::{db, Catalog, MetricService, Observation, Provenance, RawFetcher, SeriesStore, SqliteStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Quarterly history for a handful of FRED series.
struct FakeFred {
    series: HashMap<&'static str, Vec<Observation>>,
    requests: AtomicUsize,
}

impl FakeFred {
    fn new() -> Self {
        let quarters = ["2022-01-01", "2022-04-01", "2022-07-01", "2022-10-01", "2023-01-01", "2023-04-01"];
        let series_of = |values: [f64; 6]| -> Vec<Observation> {
            quarters
                .iter()
                .zip(values)
                .map(|(d, v)| Observation::new(NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(), v))
                .collect()
        };

        let mut series = HashMap::new();
        series.insert("GFDEBTN", series_of([30_000_000.0, 30_500_000.0, 31_000_000.0, 31_400_000.0, 31_500_000.0, 32_000_000.0]));
        series.insert("FGRECPT", series_of([4_800.0, 4_900.0, 4_950.0, 5_000.0, 4_700.0, 4_600.0]));
        series.insert("A191RL1Q225SBEA", series_of([-1.0, -0.6, 2.7, 2.6, 2.2, 2.1]));
        // Interest payments stop two quarters early.
        series.insert("A091RC1Q027SBEA", series_of([700.0, 720.0, 760.0, 800.0, 850.0, 900.0])[..4].to_vec());

        Self { series, requests: AtomicUsize::new(0) }
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for FakeFred {
    fn name(&self) -> &str {
        "fake-fred"
    }

    async fn fetch_data(&self, series_id: &str, _range: DateRange) -> Result<Vec<Observation>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.series.get(series_id).cloned().unwrap_or_default())
    }
}

async fn store() -> Arc<dyn SeriesStore> {
    Arc::new(SqliteStore::new(db::init_in_memory().await.unwrap()))
}

fn ascending(data: &[Observation]) -> bool {
    data.windows(2).all(|w| w[0].date < w[1].date)
}

#[tokio::test]
async fn composite_metrics_from_live_series() {
    let source = Arc::new(FakeFred::new());
    let fetcher = RawFetcher::new(store().await, Some(source.clone()), FreshnessPolicy::default());
    let service = MetricService::new(fetcher).with_fallback_seed(1);

    let debt_to_revenue = service.get_metric("govtDebtToRevenue").await.unwrap();
    assert_eq!(debt_to_revenue.provenance, Provenance::Calculated);
    assert_eq!(debt_to_revenue.data.len(), 6);
    assert_eq!(debt_to_revenue.data[0].value, 6.25);
    assert!(ascending(&debt_to_revenue.data));

    let service_ratio = service.get_metric("govtDebtServiceToRevenue").await.unwrap();
    assert_eq!(service_ratio.data.len(), 4);
    assert_eq!(service_ratio.data.last().unwrap().value, 16.0);

    // No reserves series upstream.
    let reserves = service.get_metric("debtToReserves").await.unwrap();
    assert_eq!(reserves.source, "Example Data (FRED API data unavailable)");
    let profile = Catalog::standard().get("debtToReserves").unwrap().fallback;
    assert!(reserves.data.iter().all(|o| profile.contains(o.value)));
}

#[tokio::test]
async fn cached_series_are_not_refetched() {
    let source = Arc::new(FakeFred::new());
    let fetcher = RawFetcher::new(store().await, Some(source.clone()), FreshnessPolicy::default());
    let service = MetricService::new(fetcher);

    let first = service.get_metric("gdp").await.unwrap();
    assert_eq!(first.source, "Federal Reserve Economic Data (FRED) - A191RL1Q225SBEA");
    let requests = source.requests();

    let second = service.get_metric("gdp").await.unwrap();
    assert_eq!(second.provenance, Provenance::CacheHit { series_id: "A191RL1Q225SBEA".into() });
    assert_eq!(second.data, first.data);
    assert_eq!(source.requests(), requests);

    // Shares its upstream series with the dashboard metric.
    let growth = service.get_metric("gdp-growth-def").await.unwrap();
    assert!(matches!(growth.provenance, Provenance::CacheHit { .. }));
    assert_eq!(growth.data.len(), 2);
    assert_eq!(source.requests(), requests);
}

#[tokio::test]
async fn stale_cache_is_refreshed() {
    let store = store().await;
    let source = Arc::new(FakeFred::new());
    let fetcher = RawFetcher::new(store.clone(), Some(source.clone()), FreshnessPolicy::default());
    let service = MetricService::new(fetcher);

    service.get_metric("gdp").await.unwrap();
    store
        .set_last_fetched_at("A191RL1Q225SBEA", Utc::now() - Duration::hours(48))
        .await
        .unwrap();

    let refreshed = service.get_metric("gdp").await.unwrap();
    assert!(matches!(refreshed.provenance, Provenance::LiveFetch { .. }));
    assert_eq!(store.count("A191RL1Q225SBEA").await.unwrap(), 6);
}

#[tokio::test]
async fn no_credential_serves_example_data_everywhere() {
    let fetcher = RawFetcher::new(store().await, None, FreshnessPolicy::default());
    let service = MetricService::new(fetcher).with_fallback_seed(2024);

    let metrics = service.get_all_metrics().await;
    assert_eq!(metrics.len(), Catalog::standard().metrics().len());

    for metric in metrics {
        let definition = Catalog::standard().get(&metric.id).unwrap();
        assert_eq!(metric.provenance, Provenance::SyntheticFallback { reason: FallbackReason::NoData });
        assert!(!metric.data.is_empty(), "{} is empty", metric.id);
        assert!(ascending(&metric.data), "{} is not ascending", metric.id);
        assert!(
            metric.data.iter().all(|o| definition.fallback.contains(o.value)),
            "{} left its band",
            metric.id
        );
        assert!(metric.data.last().unwrap().date <= Utc::now().date_naive());
    }
}

#[tokio::test]
async fn unknown_metric_is_none() {
    let fetcher = RawFetcher::new(store().await, None, FreshnessPolicy::default());
    let service = MetricService::new(fetcher);
    assert!(service.get_metric("bitcoin").await.is_none());
}
