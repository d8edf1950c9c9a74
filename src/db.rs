use sqlx::sqlite::{SqlitePoolOptions, SqlitePool};
use sqlx::Row;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::models::{FreshnessRecord, Observation, SeriesMetadata};

pub async fn init(data_dir: &Path) -> Result<SqlitePool> {
    let db_path = data_dir.join("series_cache.db");
    let database_url = format!("sqlite://{}?mode=rwc", db_path.to_string_lossy());

    tracing::info!(%database_url, "connecting to SQLite cache");

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .with_context(|| format!("failed to open {}", database_url))?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("series cache initialized");
    Ok(pool)
}

/// Private in-memory database; a single connection keeps the schema alive.
pub async fn init_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

/// Persistent observations keyed by upstream series id.
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// All stored observations ascending by date, or `None` when nothing is stored.
    async fn get(&self, series_id: &str) -> Result<Option<Vec<Observation>>>;

    /// Replaces every observation of the series, upserts its metadata and
    /// stamps the fetch time, all in one transaction.
    async fn put(&self, series_id: &str, observations: &[Observation], metadata: &SeriesMetadata) -> Result<()>;

    async fn count(&self, series_id: &str) -> Result<i64>;

    async fn get_metadata(&self, series_id: &str) -> Result<Option<SeriesMetadata>>;

    async fn freshness(&self, series_id: &str) -> Result<Option<FreshnessRecord>>;

    async fn set_last_fetched_at(&self, series_id: &str, at: DateTime<Utc>) -> Result<()>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeriesStore for SqliteStore {
    async fn get(&self, series_id: &str) -> Result<Option<Vec<Observation>>> {
        let rows = sqlx::query_as::<_, Observation>(
            "SELECT date, value FROM cached_observations WHERE series_id = $1 ORDER BY date ASC"
        )
        .bind(series_id)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows))
        }
    }

    async fn put(&self, series_id: &str, observations: &[Observation], metadata: &SeriesMetadata) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cached_observations WHERE series_id = $1")
            .bind(series_id)
            .execute(&mut *tx)
            .await?;

        // Duplicated dates in the input collapse to the last value.
        for point in observations {
            sqlx::query(
                "INSERT INTO cached_observations (series_id, date, value)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (series_id, date) DO UPDATE
                 SET value = EXCLUDED.value"
            )
            .bind(series_id)
            .bind(point.date)
            .bind(point.value)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "INSERT INTO fred_series (id, name, description, unit, frequency)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE
             SET name = EXCLUDED.name,
                 description = EXCLUDED.description,
                 unit = EXCLUDED.unit,
                 frequency = EXCLUDED.frequency,
                 updated_at = CURRENT_TIMESTAMP"
        )
        .bind(series_id)
        .bind(&metadata.name)
        .bind(&metadata.description)
        .bind(&metadata.unit)
        .bind(&metadata.frequency)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO last_fetch_timestamps (series_id, last_fetched_at)
             VALUES ($1, $2)
             ON CONFLICT (series_id) DO UPDATE
             SET last_fetched_at = EXCLUDED.last_fetched_at"
        )
        .bind(series_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn count(&self, series_id: &str) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM cached_observations WHERE series_id = $1")
            .bind(series_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    async fn get_metadata(&self, series_id: &str) -> Result<Option<SeriesMetadata>> {
        let record = sqlx::query_as::<_, SeriesMetadata>(
            "SELECT name, description, unit, frequency FROM fred_series WHERE id = $1"
        )
        .bind(series_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn freshness(&self, series_id: &str) -> Result<Option<FreshnessRecord>> {
        let record = sqlx::query_as::<_, FreshnessRecord>(
            "SELECT series_id, last_fetched_at FROM last_fetch_timestamps WHERE series_id = $1"
        )
        .bind(series_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn set_last_fetched_at(&self, series_id: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "INSERT INTO last_fetch_timestamps (series_id, last_fetched_at)
             VALUES ($1, $2)
             ON CONFLICT (series_id) DO UPDATE
             SET last_fetched_at = EXCLUDED.last_fetched_at"
        )
        .bind(series_id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
