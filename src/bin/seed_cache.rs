use debt_cycle_lib::core::seeder::{seed_catalog, SeedStatus};
use debt_cycle_lib::{db, EngineConfig, MetricService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = EngineConfig::from_env();
    let pool = db::init(&config.data_dir).await?;
    let service = MetricService::from_config(&config, pool);
    if !service.fetcher().has_source() {
        anyhow::bail!("FRED_API_KEY is required to seed the cache");
    }

    let report = seed_catalog(service.catalog(), service.fetcher()).await;

    println!("{:<20} | {:<10}", "Series", "Status");
    println!("{}", "-".repeat(35));
    for (series_id, status) in &report {
        let label = match status {
            SeedStatus::Skipped => "cached".to_string(),
            SeedStatus::Seeded(count) => format!("+{}", count),
            SeedStatus::Empty => "no data".to_string(),
        };
        println!("{:<20} | {:<10}", series_id, label);
    }

    Ok(())
}
