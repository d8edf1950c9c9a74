use async_trait::async_trait;
use anyhow::Result;
use chrono::NaiveDate;
use crate::models::Observation;

pub mod fred;
pub mod proxy;

/// Inclusive observation window; `None` bounds fall back to the provider defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }
}

#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_data(&self, series_id: &str, range: DateRange) -> Result<Vec<Observation>>;
}
