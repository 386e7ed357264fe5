//! Dataset extraction from the Kaggle API
//!
//! Downloads one file of a dataset as a zip archive, decompresses it, parses
//! it as CSV and keeps a dated raw copy for audit and re-processing. The raw
//! snapshot would normally live in blob storage (S3, GCS); this pipeline
//! keeps it under a local directory instead.

use chrono::NaiveDate;
use futures::StreamExt;
use heroes_common::checksum::file_sha256;
use heroes_common::types::CharacterRow;
use heroes_common::{EtlError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::{KaggleConfig, StorageConfig};

/// HTTP client for the Kaggle dataset API
pub struct KaggleClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    key: String,
}

impl KaggleClient {
    /// Create a new client from configuration
    pub fn new(config: &KaggleConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("heroes-etl/0.1")
            .build()
            .map_err(|e| EtlError::Download(e.to_string()))?;

        Ok(KaggleClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            key: config.key.clone(),
        })
    }

    /// Download a single dataset file as a zip archive into `work_dir`.
    ///
    /// The API serves `GET /datasets/download/{owner}/{dataset}/{file}` with
    /// HTTP basic auth and responds with a compressed single-file archive.
    pub async fn download_dataset_file(
        &self,
        dataset: &str,
        file_name: &str,
        work_dir: &Path,
    ) -> Result<PathBuf> {
        let url = format!("{}/datasets/download/{}/{}", self.base_url, dataset, file_name);
        info!(target: "extract", "Extracting data from Kaggle -> Dataset: {} | File: {}", dataset, file_name);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.key))
            .send()
            .await
            .map_err(|e| EtlError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EtlError::Download(format!(
                "HTTP {} fetching {}",
                response.status(),
                url
            )));
        }

        let total_size = response.content_length().unwrap_or(0);
        let pb = ProgressBar::new(total_size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes}")
                .map_err(|e| EtlError::Download(e.to_string()))?
                .progress_chars("#>-"),
        );
        pb.set_message(format!("Downloading {}", file_name));

        let zip_path = work_dir.join(format!("{}.zip", file_name));
        let mut file = std::fs::File::create(&zip_path)?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| EtlError::Download(e.to_string()))?;
            std::io::Write::write_all(&mut file, &chunk)?;
            pb.inc(chunk.len() as u64);
        }

        pb.finish_and_clear();

        Ok(zip_path)
    }
}

/// Download and parse one dataset file, keeping a dated raw snapshot.
///
/// Decompression and parse failures are logged and re-raised. The downloaded
/// archive and the extracted file are removed from the working directory
/// whether or not processing succeeded; only the raw snapshot survives the
/// call.
pub async fn extract_dataset_file(
    kaggle: &KaggleClient,
    storage: &StorageConfig,
    dataset: &str,
    file_name: &str,
) -> Result<Vec<CharacterRow>> {
    std::fs::create_dir_all(&storage.work_dir)?;

    let zip_path = match kaggle
        .download_dataset_file(dataset, file_name, &storage.work_dir)
        .await
    {
        Ok(path) => path,
        Err(e) => {
            // An interrupted download can leave a partial archive behind
            silent_remove_file(&storage.work_dir.join(format!("{}.zip", file_name)));
            return Err(e);
        },
    };
    let extracted_path = storage.work_dir.join(file_name);

    let result = process_archive(
        &zip_path,
        &extracted_path,
        &storage.raw_data_dir,
        file_name,
    );

    // Scratch files go away on success and on error alike
    silent_remove_file(&zip_path);
    silent_remove_file(&extracted_path);

    result
}

fn process_archive(
    zip_path: &Path,
    extracted_path: &Path,
    raw_data_dir: &Path,
    file_name: &str,
) -> Result<Vec<CharacterRow>> {
    info!(target: "extract", "Unzipping the file: {}", zip_path.display());
    unzip_entry(zip_path, file_name, extracted_path).map_err(|e| {
        error!(target: "extract", "Unzipping: {}", e);
        e
    })?;

    info!(target: "extract", "Loading the file: {}", extracted_path.display());
    let rows = read_rows(extracted_path).map_err(|e| {
        error!(target: "extract", "Parsing: {}", e);
        e
    })?;

    let today = chrono::Local::now().date_naive();
    let snapshot_path = snapshot_raw_copy(extracted_path, raw_data_dir, file_name, today)?;
    let digest = file_sha256(&snapshot_path)?;
    info!(
        target: "extract",
        "Stored raw snapshot {} (sha256 {})",
        snapshot_path.display(),
        digest
    );

    Ok(rows)
}

/// Decompress one named entry of a zip archive to `dest`
fn unzip_entry(zip_path: &Path, entry_name: &str, dest: &Path) -> Result<()> {
    let file = std::fs::File::open(zip_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| EtlError::Archive(e.to_string()))?;

    let mut entry = archive
        .by_name(entry_name)
        .map_err(|e| EtlError::Archive(format!("entry '{}': {}", entry_name, e)))?;

    let mut out = std::fs::File::create(dest)?;
    std::io::copy(&mut entry, &mut out)?;

    Ok(())
}

/// Parse the extracted CSV into rows, keyed by header name
fn read_rows(path: &Path) -> Result<Vec<CharacterRow>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| EtlError::Csv(e.to_string()))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: CharacterRow = record.map_err(|e| EtlError::Csv(e.to_string()))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Copy the extracted file unmodified into the raw storage directory,
/// inserting the calendar date before the extension
fn snapshot_raw_copy(
    src: &Path,
    raw_data_dir: &Path,
    file_name: &str,
    date: NaiveDate,
) -> Result<PathBuf> {
    std::fs::create_dir_all(raw_data_dir)?;

    let dest = raw_data_dir.join(dated_file_name(file_name, date));
    std::fs::copy(src, &dest)?;

    Ok(dest)
}

/// `marvel_dc_characters.csv` + 2024-01-18 -> `marvel_dc_characters_2024-01-18.csv`
fn dated_file_name(file_name: &str, date: NaiveDate) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("csv");

    format!("{}_{}.{}", stem, date.format("%Y-%m-%d"), ext)
}

/// Best-effort removal. Errors are swallowed: leftover scratch files must
/// never change the run outcome.
pub fn silent_remove_file(path: &Path) {
    let _ = std::fs::remove_file(path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_zip(dir: &Path, zip_name: &str, entry_name: &str, content: &[u8]) -> PathBuf {
        let zip_path = dir.join(zip_name);
        let file = std::fs::File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(entry_name, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
        writer.finish().unwrap();
        zip_path
    }

    #[test]
    fn test_dated_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 18).unwrap();
        assert_eq!(
            dated_file_name("marvel_dc_characters.csv", date),
            "marvel_dc_characters_2024-01-18.csv"
        );
    }

    #[test]
    fn test_unzip_entry_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = write_zip(dir.path(), "data.csv.zip", "data.csv", b"a,b\n1,2\n");

        let dest = dir.path().join("data.csv");
        unzip_entry(&zip_path, "data.csv", &dest).unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"a,b\n1,2\n");
    }

    #[test]
    fn test_unzip_missing_entry_errors() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = write_zip(dir.path(), "data.csv.zip", "other.csv", b"a,b\n");

        let dest = dir.path().join("data.csv");
        let err = unzip_entry(&zip_path, "data.csv", &dest).unwrap_err();
        assert!(matches!(err, EtlError::Archive(_)));
    }

    #[test]
    fn test_unzip_corrupt_archive_errors() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("broken.zip");
        std::fs::write(&zip_path, b"this is not a zip archive").unwrap();

        let dest = dir.path().join("data.csv");
        let err = unzip_entry(&zip_path, "data.csv", &dest).unwrap_err();
        assert!(matches!(err, EtlError::Archive(_)));
    }

    #[test]
    fn test_read_rows_parses_and_skips_excluded_column() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("characters.csv");
        std::fs::write(
            &csv_path,
            "ID,Name,Identity,Alignment,Status,EyeColor,HairColor,Gender,Appearances,FirstAppearance,Year,Universe\n\
             1,Spider-Man,Secret,Good,Alive,Hazel,Brown,Male,4043,Aug-62,1962,Marvel\n\
             2,Batman,Secret,Good,Alive,Blue,Black,Male,,May-39,1939,DC\n",
        )
        .unwrap();

        let rows = read_rows(&csv_path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Spider-Man");
        assert_eq!(rows[0].appearances, Some(4043));
        assert_eq!(rows[1].appearances, None);
        assert_eq!(rows[1].universe, "DC");
    }

    #[test]
    fn test_read_rows_rejects_malformed_csv() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("characters.csv");
        std::fs::write(
            &csv_path,
            "ID,Name,Identity,Alignment,Status,EyeColor,HairColor,Gender,Appearances,Year,Universe\n\
             not-a-number,Spider-Man,Secret,Good,Alive,Hazel,Brown,Male,4043,1962,Marvel\n",
        )
        .unwrap();

        let err = read_rows(&csv_path).unwrap_err();
        assert!(matches!(err, EtlError::Csv(_)));
    }

    #[test]
    fn test_snapshot_raw_copy_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("characters.csv");
        std::fs::write(&src, b"ID,Name\n1,Spider-Man\n").unwrap();

        let raw_dir = dir.path().join("raw");
        let date = NaiveDate::from_ymd_opt(2024, 1, 18).unwrap();
        let dest = snapshot_raw_copy(&src, &raw_dir, "characters.csv", date).unwrap();

        assert_eq!(dest, raw_dir.join("characters_2024-01-18.csv"));
        assert_eq!(std::fs::read(&dest).unwrap(), b"ID,Name\n1,Spider-Man\n");
    }

    #[test]
    fn test_silent_remove_missing_file_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        // Removing a file that does not exist must not panic or error
        silent_remove_file(&dir.path().join("never-created.csv"));
    }
}
