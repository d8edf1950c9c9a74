use futures_util::future::join_all;

use crate::core::raw_fetcher::RawFetcher;
use crate::core::timeseries::align_exact;
use crate::fetcher::DateRange;
use crate::indicators::CompositeFormula;
use crate::models::{round2, Observation};

/// Evaluates a formula on every date where all of its inputs are observed.
///
/// Dependencies are fetched concurrently and all of them settle before
/// alignment. A dependency that fails or comes back empty contributes no
/// dates, which empties the result without affecting its siblings. A date
/// whose evaluation fails or is not finite is skipped.
pub async fn compute_composite(fetcher: &RawFetcher, formula: &dyn CompositeFormula) -> Vec<Observation> {
    let inputs = formula.required_inputs();

    let fetches = inputs.iter().map(|series_id| async move {
        match fetcher.fetch(series_id, DateRange::default()).await {
            Ok(outcome) => outcome.observations,
            Err(e) => {
                tracing::warn!(series_id, error = %e, "dependency fetch failed");
                Vec::new()
            }
        }
    });
    let fetched = join_all(fetches).await;

    let series: Vec<(&str, &[Observation])> = inputs
        .iter()
        .zip(fetched.iter())
        .map(|(id, obs)| (*id, obs.as_slice()))
        .collect();

    if let Some((missing, _)) = series.iter().find(|(_, obs)| obs.is_empty()) {
        tracing::info!(metric = formula.slug(), dependency = missing, "dependency has no data");
        return Vec::new();
    }

    let rows = align_exact(&series);
    let result: Vec<Observation> = rows
        .into_iter()
        .filter_map(|row| match formula.evaluate(&row.values) {
            Ok(value) if value.is_finite() => Some(Observation { date: row.date, value: round2(value) }),
            Ok(_) => {
                tracing::debug!(metric = formula.slug(), date = %row.date, "non-finite result skipped");
                None
            }
            Err(e) => {
                tracing::debug!(metric = formula.slug(), date = %row.date, error = %e, "date skipped");
                None
            }
        })
        .collect();

    tracing::debug!(metric = formula.slug(), name = formula.name(), points = result.len(), "composite evaluated");
    result
}
