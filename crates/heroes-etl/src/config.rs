//! Configuration management
//!
//! Everything is read from the process environment, optionally seeded from a
//! local untracked `.env` file. Credentials for the dataset API never have
//! defaults; everything else falls back to the constants below.

use heroes_common::{EtlError, Result};
use std::path::PathBuf;

// ============================================================================
// Pipeline Configuration Constants
// ============================================================================

/// Default base URL of the Kaggle REST API.
pub const DEFAULT_KAGGLE_API_URL: &str = "https://www.kaggle.com/api/v1";

/// Default dataset to migrate, as `owner/dataset`.
pub const DEFAULT_DATASET: &str = "dannielr/marvel-superheroes";

/// Default dataset file to extract and load.
pub const DEFAULT_DATASET_FILE: &str = "marvel_dc_characters.csv";

/// Default destination database name.
pub const DEFAULT_DATABASE_NAME: &str = "heroes";

/// Default destination collection name.
pub const DEFAULT_COLLECTION_NAME: &str = "characters";

/// Default working directory for downloaded and extracted scratch files.
pub const DEFAULT_WORK_DIR: &str = ".";

/// Default directory for dated raw snapshots.
pub const DEFAULT_RAW_DATA_DIR: &str = "data/0_raw";

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub kaggle: KaggleConfig,
    pub source: SourceConfig,
    pub storage: StorageConfig,
    pub mongo: MongoConfig,
}

/// Dataset API access configuration
#[derive(Debug, Clone)]
pub struct KaggleConfig {
    pub base_url: String,
    pub username: String,
    pub key: String,
}

/// Which dataset file to migrate
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub dataset: String,
    pub file_name: String,
}

/// Local filesystem layout
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub work_dir: PathBuf,
    pub raw_data_dir: PathBuf,
}

/// Destination store configuration
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub url: String,
    pub database: String,
    pub collection: String,
}

impl Config {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            kaggle: KaggleConfig {
                base_url: std::env::var("KAGGLE_API_URL")
                    .unwrap_or_else(|_| DEFAULT_KAGGLE_API_URL.to_string()),
                username: std::env::var("KAGGLE_USERNAME")
                    .map_err(|_| EtlError::Config("KAGGLE_USERNAME is not set".to_string()))?,
                key: std::env::var("KAGGLE_KEY")
                    .map_err(|_| EtlError::Config("KAGGLE_KEY is not set".to_string()))?,
            },
            source: SourceConfig {
                dataset: std::env::var("HEROES_DATASET")
                    .unwrap_or_else(|_| DEFAULT_DATASET.to_string()),
                file_name: std::env::var("HEROES_DATASET_FILE")
                    .unwrap_or_else(|_| DEFAULT_DATASET_FILE.to_string()),
            },
            storage: StorageConfig {
                work_dir: std::env::var("HEROES_WORK_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_WORK_DIR)),
                raw_data_dir: std::env::var("HEROES_RAW_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_RAW_DATA_DIR)),
            },
            mongo: MongoConfig {
                url: std::env::var("MONGODB_URL")
                    .map_err(|_| EtlError::Config("MONGODB_URL is not set".to_string()))?,
                database: std::env::var("HEROES_DATABASE")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string()),
                collection: std::env::var("HEROES_COLLECTION")
                    .unwrap_or_else(|_| DEFAULT_COLLECTION_NAME.to_string()),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.kaggle.base_url.is_empty() {
            return Err(EtlError::Config("Kaggle API URL cannot be empty".to_string()));
        }

        if self.kaggle.username.is_empty() || self.kaggle.key.is_empty() {
            return Err(EtlError::Config(
                "Kaggle credentials cannot be empty".to_string(),
            ));
        }

        if !self.source.dataset.contains('/') {
            return Err(EtlError::Config(format!(
                "Dataset must be given as owner/dataset, got '{}'",
                self.source.dataset
            )));
        }

        if self.mongo.url.is_empty() {
            return Err(EtlError::Config("MongoDB URL cannot be empty".to_string()));
        }

        if self.mongo.database.is_empty() || self.mongo.collection.is_empty() {
            return Err(EtlError::Config(
                "Database and collection names cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
