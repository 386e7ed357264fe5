//! Heroes ETL - one-shot character dataset migration

use anyhow::Result;
use heroes_common::logging::{init_logging, LogConfig};
use heroes_etl::config::Config;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Local untracked .env seeds the environment before anything reads it
    dotenvy::dotenv().ok();

    let log_config = LogConfig::from_env().unwrap_or_default();
    init_logging(&log_config)?;

    let config = Config::load()?;
    let summary = heroes_etl::run(&config).await?;

    info!(
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        "Migration complete"
    );

    Ok(())
}
