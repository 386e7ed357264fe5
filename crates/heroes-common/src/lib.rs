//! Heroes ETL Common Library
//!
//! Shared types, utilities, and error handling for the heroes-etl workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used by the pipeline crate:
//!
//! - **Error Handling**: The [`EtlError`] type and [`Result`] alias
//! - **Logging**: Tracing subscriber configuration and initialization
//! - **Types**: The source row and destination document shapes
//! - **Checksums**: Integrity digests for raw data snapshots
//!
//! # Example
//!
//! ```no_run
//! use heroes_common::{Result, EtlError};
//! use heroes_common::checksum::file_sha256;
//!
//! fn audit_snapshot(path: &str) -> Result<()> {
//!     let digest = file_sha256(path)?;
//!     tracing::info!(%digest, "raw snapshot written");
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{EtlError, Result};
