use crate::models::Observation;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// One date on which every input series has an observation.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow<'a> {
    pub date: NaiveDate,
    pub values: HashMap<&'a str, f64>,
}

/// Aligns several named series on exact dates.
///
/// Builds `date -> {series id: value}` over the union of all dates and keeps
/// only the dates covered by every series. No forward fill and no
/// interpolation: a missing value drops the date. Rows come out ascending.
pub fn align_exact<'a>(series: &[(&'a str, &[Observation])]) -> Vec<AlignedRow<'a>> {
    if series.is_empty() {
        return Vec::new();
    }

    let mut by_date: BTreeMap<NaiveDate, HashMap<&'a str, f64>> = BTreeMap::new();
    for (series_id, observations) in series {
        for obs in *observations {
            by_date.entry(obs.date).or_default().insert(*series_id, obs.value);
        }
    }

    by_date
        .into_iter()
        .filter(|(_, values)| series.iter().all(|(id, _)| values.contains_key(id)))
        .map(|(date, values)| AlignedRow { date, values })
        .collect()
}
