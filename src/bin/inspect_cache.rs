use debt_cycle_lib::{db, Catalog, EngineConfig, SeriesStore, SqliteStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = EngineConfig::from_env();
    let store = SqliteStore::new(db::init(&config.data_dir).await?);

    println!("{:<20} | {:<8} | {:<12} | {:<25}", "Series", "Count", "Latest", "Last Fetched");
    println!("{}", "-".repeat(75));

    for series_id in Catalog::standard().upstream_series_ids() {
        let count = store.count(series_id).await?;
        let latest = store
            .get(series_id)
            .await?
            .and_then(|obs| obs.last().map(|o| o.date.to_string()))
            .unwrap_or_else(|| "N/A".to_string());
        let fetched = store
            .freshness(series_id)
            .await?
            .map(|r| r.last_fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!("{:<20} | {:<8} | {:<12} | {:<25}", series_id, count, latest, fetched);
    }

    Ok(())
}
