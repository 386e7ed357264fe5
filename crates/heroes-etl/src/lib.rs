//! Heroes ETL Pipeline Library
//!
//! One-shot batch migration of a character dataset into a document store:
//!
//! - **Extract**: download the dataset file from the Kaggle API, keep a
//!   dated raw snapshot, return parsed rows
//! - **Transform**: reshape each row into a nested document
//! - **Load**: bulk-insert with a unique index on `id`, absorbing
//!   duplicate-id rejections so reruns are idempotent
//!
//! The stages run strictly in sequence and hand data to each other only
//! through return values.
//!
//! # Example
//!
//! ```no_run
//! use heroes_etl::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let summary = heroes_etl::run(&config).await?;
//!     println!("inserted {}", summary.inserted);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod extract;
pub mod load;
pub mod transform;

use heroes_common::Result;
use load::LoadSummary;

/// Run the whole pipeline once: extract, transform, load.
pub async fn run(config: &config::Config) -> Result<LoadSummary> {
    let kaggle = extract::KaggleClient::new(&config.kaggle)?;
    let rows = extract::extract_dataset_file(
        &kaggle,
        &config.storage,
        &config.source.dataset,
        &config.source.file_name,
    )
    .await?;

    tracing::info!(target: "transform", "Reshaping {} rows into documents", rows.len());
    let documents = transform::transform_rows(&rows);

    let sink = load::MongoSink::connect(
        &config.mongo.url,
        &config.mongo.database,
        &config.mongo.collection,
    )
    .await?;

    load::load_documents(&sink, &documents).await
}
