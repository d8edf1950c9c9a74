use serde::Serialize;

use crate::core::raw_fetcher::RawFetcher;
use crate::fetcher::DateRange;
use crate::indicators::registry::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeedStatus {
    /// Already had stored observations.
    Skipped,
    Seeded(usize),
    /// Nothing came back from upstream.
    Empty,
}

/// Warms the cache with every upstream series the catalog references.
///
/// Series run one at a time so a cold cache does not burst the upstream rate
/// limit. Per-series failures are logged and reported, never returned.
pub async fn seed_catalog(catalog: &Catalog, fetcher: &RawFetcher) -> Vec<(String, SeedStatus)> {
    let series_ids = catalog.upstream_series_ids();
    tracing::info!(series = series_ids.len(), metrics = catalog.metrics().len(), "seeding series cache");

    let mut report = Vec::with_capacity(series_ids.len());
    for series_id in series_ids {
        let stored = match fetcher.store().count(series_id).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(series_id, error = %e, "count failed, fetching anyway");
                0
            }
        };

        let status = if stored > 0 {
            tracing::debug!(series_id, stored, "already cached");
            SeedStatus::Skipped
        } else {
            match fetcher.fetch(series_id, DateRange::default()).await {
                Ok(outcome) if !outcome.is_empty() => SeedStatus::Seeded(outcome.observations.len()),
                Ok(_) => SeedStatus::Empty,
                Err(e) => {
                    tracing::warn!(series_id, error = %e, "seed fetch failed");
                    SeedStatus::Empty
                }
            }
        };
        report.push((series_id.to_string(), status));
    }

    let seeded = report.iter().filter(|(_, s)| matches!(s, SeedStatus::Seeded(_))).count();
    let skipped = report.iter().filter(|(_, s)| *s == SeedStatus::Skipped).count();
    tracing::info!(seeded, skipped, empty = report.len() - seeded - skipped, "seeding complete");
    report
}
