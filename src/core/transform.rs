use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{normalize, round2, Observation};

/// Post-processing applied to a direct metric's raw series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransformKind {
    Identity,
    YearOverYear,
}

/// Output is ascending by date with unique dates for every kind.
pub fn transform(observations: Vec<Observation>, kind: TransformKind) -> Vec<Observation> {
    match kind {
        TransformKind::Identity => normalize(observations),
        TransformKind::YearOverYear => annual_percentage_change(&observations),
    }
}

/// Percent change against the observation at the same month and day one year earlier.
///
/// Pairs are skipped when either side is missing or the prior value is zero.
/// Values are rounded to 2 decimals.
pub fn annual_percentage_change(observations: &[Observation]) -> Vec<Observation> {
    if observations.len() < 2 {
        return Vec::new();
    }

    let by_date: BTreeMap<NaiveDate, f64> = observations.iter().map(|o| (o.date, o.value)).collect();
    let Some(first_year) = by_date.keys().next().map(|d| d.year()) else {
        return Vec::new();
    };

    by_date
        .iter()
        .filter(|(date, _)| date.year() > first_year)
        .filter_map(|(date, &current)| {
            // Feb 29 has no counterpart in the prior year.
            let prior_date = date.with_year(date.year() - 1)?;
            let &prior = by_date.get(&prior_date)?;
            if prior == 0.0 {
                return None;
            }
            let change = (current - prior) / prior * 100.0;
            Some(Observation { date: *date, value: round2(change) })
        })
        .collect()
}
