use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, NaiveDate, Utc};

/// One (date, value) sample of a series.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, FromRow)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Descriptive record stored alongside a cached series.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, FromRow)]
pub struct SeriesMetadata {
    pub name: String,
    pub description: String,
    pub unit: String,
    pub frequency: String,
}

impl SeriesMetadata {
    /// Record used when a series id is not in the catalog.
    pub fn unknown(series_id: &str) -> Self {
        Self {
            name: series_id.to_string(),
            description: format!("FRED Series {}", series_id),
            unit: "value".to_string(),
            frequency: "Unknown".to_string(),
        }
    }
}

/// Last successful fetch-and-store time of one series.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
pub struct FreshnessRecord {
    pub series_id: String,
    pub last_fetched_at: DateTime<Utc>,
}

/// Why a metric ended up on synthetic data.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    NoMapping,
    NoData,
    Error,
}

/// Which path produced a computed metric's observations.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    LiveFetch { series_id: String },
    CacheHit { series_id: String },
    Calculated,
    SyntheticFallback { reason: FallbackReason },
}

impl Provenance {
    pub fn describe(&self) -> String {
        match self {
            Provenance::LiveFetch { series_id } | Provenance::CacheHit { series_id } => {
                format!("Federal Reserve Economic Data (FRED) - {}", series_id)
            }
            Provenance::Calculated => "Calculated from FRED Data".to_string(),
            Provenance::SyntheticFallback { reason } => match reason {
                FallbackReason::NoMapping => "Example Data (No FRED mapping available)".to_string(),
                FallbackReason::NoData => "Example Data (FRED API data unavailable)".to_string(),
                FallbackReason::Error => "Example Data (Error fetching FRED data)".to_string(),
            },
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Provenance::SyntheticFallback { .. })
    }
}

/// A metric definition resolved against data for a single request.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ComputedMetric {
    pub id: String,
    pub title: String,
    pub description: String,
    pub unit: String,
    pub category: String,
    pub frequency: String,
    pub is_percentage: bool,
    pub data: Vec<Observation>,
    pub provenance: Provenance,
    pub source: String,
}

/// Sorts by date and keeps the last value seen for a duplicated date.
pub fn normalize(observations: Vec<Observation>) -> Vec<Observation> {
    let map: std::collections::BTreeMap<NaiveDate, f64> = observations
        .into_iter()
        .map(|o| (o.date, o.value))
        .collect();
    map.into_iter().map(|(date, value)| Observation { date, value }).collect()
}

/// Round half away from zero to 2 decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
