pub mod config;
pub mod core;
pub mod db;
pub mod fetcher;
pub mod indicators;
pub mod models;

pub use crate::config::EngineConfig;
pub use crate::core::orchestrator::MetricService;
pub use crate::core::raw_fetcher::{FetchOrigin, FetchOutcome, RawFetcher};
pub use crate::db::{SeriesStore, SqliteStore};
pub use crate::indicators::registry::Catalog;
pub use crate::models::{ComputedMetric, Observation, Provenance};
