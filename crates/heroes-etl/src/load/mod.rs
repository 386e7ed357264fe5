//! Idempotent document loading
//!
//! The destination sits behind [`DocumentSink`], which owns the mapping from
//! its native error codes to the duplicate-identifier classification. The
//! loader itself only knows the three outcomes: full success, benign
//! all-duplicates, hard failure.

use async_trait::async_trait;
use heroes_common::types::HeroDocument;
use heroes_common::{EtlError, Result};
use mongodb::bson::doc;
use mongodb::error::ErrorKind;
use mongodb::options::{IndexOptions, InsertManyOptions};
use mongodb::{Client, Collection, IndexModel};
use tracing::{info, warn};

/// MongoDB server error code for a write rejected by a unique index
/// ("E11000 duplicate key error"). This is where the Mongo sink's
/// duplicate-identifier classification comes from; other sinks decide
/// their own mapping.
const MONGO_DUPLICATE_KEY_CODE: i32 = 11000;

/// How a single rejected document failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteErrorKind {
    /// The unique constraint on `id` already holds this value
    DuplicateId,
    /// Any other per-document rejection (validation, size limits, ...)
    Other,
}

/// One rejected document out of a bulk insert
#[derive(Debug, Clone)]
pub struct WriteFailure {
    /// Position of the document in the submitted batch
    pub index: usize,
    pub kind: WriteErrorKind,
    pub message: String,
}

/// Why a bulk insert did not fully succeed
#[derive(Debug)]
pub enum InsertManyFailure {
    /// Some documents were rejected; the rest were written
    Partial {
        inserted: u64,
        failures: Vec<WriteFailure>,
    },
    /// The operation failed as a whole (connectivity, auth, ...)
    Fatal(EtlError),
}

/// Destination store seam.
///
/// Implementations classify their native write errors into
/// [`WriteErrorKind`]; the loader never inspects store-specific codes.
#[async_trait]
pub trait DocumentSink {
    /// Idempotently ensure the unique index on `id`; safe to call every run
    async fn ensure_unique_id_index(&self) -> Result<()>;

    /// Bulk-insert the batch, reporting per-document failures when it is
    /// only partially written
    async fn insert_many(
        &self,
        documents: &[HeroDocument],
    ) -> std::result::Result<u64, InsertManyFailure>;
}

/// Result of a successful (or benignly duplicate) load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub inserted: u64,
    pub duplicates: usize,
}

/// Load documents through the sink, absorbing duplicate-id rejections.
///
/// Three outcomes:
/// - every document written: summary with the inserted count;
/// - some documents rejected, all of them solely for duplicate ids: a
///   warning, then a summary (reruns over already-loaded data succeed);
/// - any rejection for another reason, or any whole-operation failure:
///   the error propagates.
pub async fn load_documents<S: DocumentSink>(
    sink: &S,
    documents: &[HeroDocument],
) -> Result<LoadSummary> {
    sink.ensure_unique_id_index().await?;

    info!(target: "load", "Loading {} records into the destination collection...", documents.len());

    match sink.insert_many(documents).await {
        Ok(inserted) => {
            info!(target: "load", "Inserted {} documents", inserted);
            Ok(LoadSummary {
                inserted,
                duplicates: 0,
            })
        },
        Err(InsertManyFailure::Partial { inserted, failures }) => {
            let hard: Vec<&WriteFailure> = failures
                .iter()
                .filter(|f| f.kind != WriteErrorKind::DuplicateId)
                .collect();

            if hard.is_empty() {
                warn!(
                    target: "load",
                    "Data is already in the database ({} duplicate ids)",
                    failures.len()
                );
                Ok(LoadSummary {
                    inserted,
                    duplicates: failures.len(),
                })
            } else {
                let detail = hard
                    .iter()
                    .map(|f| format!("#{}: {}", f.index, f.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(EtlError::LoadFailed {
                    failed: hard.len(),
                    total: documents.len(),
                    detail,
                })
            }
        },
        Err(InsertManyFailure::Fatal(e)) => Err(e),
    }
}

// ============================================================================
// MongoDB Sink
// ============================================================================

/// MongoDB-backed [`DocumentSink`]
pub struct MongoSink {
    collection: Collection<HeroDocument>,
}

impl MongoSink {
    /// Connect to the store and address one collection.
    ///
    /// The connection lives for the rest of the process; the driver pools
    /// internally and nothing is explicitly closed.
    pub async fn connect(url: &str, db_name: &str, collection_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(url)
            .await
            .map_err(|e| EtlError::Database(e.to_string()))?;
        let collection = client
            .database(db_name)
            .collection::<HeroDocument>(collection_name);

        Ok(MongoSink { collection })
    }
}

#[async_trait]
impl DocumentSink for MongoSink {
    async fn ensure_unique_id_index(&self) -> Result<()> {
        let model = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection
            .create_index(model, None)
            .await
            .map_err(|e| EtlError::Database(e.to_string()))?;

        Ok(())
    }

    async fn insert_many(
        &self,
        documents: &[HeroDocument],
    ) -> std::result::Result<u64, InsertManyFailure> {
        // Unordered, so a duplicate does not shadow insertable documents
        // later in the batch when a run is repeated over partly-loaded data
        let options = InsertManyOptions::builder().ordered(false).build();

        match self.collection.insert_many(documents, options).await {
            Ok(result) => Ok(result.inserted_ids.len() as u64),
            Err(e) => Err(classify_mongo_error(e, documents.len())),
        }
    }
}

/// Classify a server write-error code for the Mongo sink
fn classify_write_code(code: i32) -> WriteErrorKind {
    if code == MONGO_DUPLICATE_KEY_CODE {
        WriteErrorKind::DuplicateId
    } else {
        WriteErrorKind::Other
    }
}

fn classify_mongo_error(e: mongodb::error::Error, batch_size: usize) -> InsertManyFailure {
    match *e.kind {
        ErrorKind::BulkWrite(ref failure) => match failure.write_errors {
            Some(ref write_errors) => {
                let failures: Vec<WriteFailure> = write_errors
                    .iter()
                    .map(|we| WriteFailure {
                        index: we.index,
                        kind: classify_write_code(we.code),
                        message: we.message.clone(),
                    })
                    .collect();

                // With an unordered insert every document either landed or
                // shows up in write_errors
                let inserted = (batch_size - failures.len()) as u64;

                InsertManyFailure::Partial { inserted, failures }
            },
            None => InsertManyFailure::Fatal(EtlError::Database(e.to_string())),
        },
        _ => InsertManyFailure::Fatal(EtlError::Database(e.to_string())),
    }
}
