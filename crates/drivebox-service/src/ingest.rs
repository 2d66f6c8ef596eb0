//! Upload ingestion — batch validation, per-owner dedup, and registration.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use drivebox_core::config::upload::UploadConfig;
use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_entity::file::{FileRecord, NewFileRecord};
use drivebox_registry::FileRegistry;
use drivebox_storage::{BlobManager, StoredBlob};

use crate::classify::CategoryClassifier;
use crate::context::RequestContext;

/// One file of an upload batch, already spooled to blob storage.
///
/// The bytes are on disk before ingestion starts; a file that does not
/// make it into the registry has its blob released again.
#[derive(Debug, Clone)]
pub struct SpooledFile {
    /// The client-supplied file name.
    pub name: String,
    /// The client-reported MIME type.
    pub mime_type: String,
    /// The spooled bytes.
    pub blob: StoredBlob,
}

/// A file rejected from a batch, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedFile {
    /// The client-supplied file name.
    pub name: String,
    /// Human-readable rejection reason.
    pub reason: String,
}

/// A file skipped because the owner already has a live file under its name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DuplicateFile {
    /// The incoming file's name.
    pub name: String,
    /// The live file it collided with.
    pub existing_file: String,
}

/// An upload batch handed to the ingestor.
///
/// `rejected` carries files the transport layer already refused (oversize,
/// empty name); they pass through to the report untouched.
#[derive(Debug, Clone, Default)]
pub struct UploadBatch {
    /// Files spooled and awaiting registration.
    pub files: Vec<SpooledFile>,
    /// Files refused before spooling completed.
    pub rejected: Vec<RejectedFile>,
}

/// Outcome of ingesting one batch.
///
/// The three lists partition the batch: every incoming file lands in
/// exactly one of them.
#[derive(Debug, Clone, Serialize, Default)]
pub struct IngestReport {
    /// Files registered by this batch.
    pub uploaded: Vec<FileRecord>,
    /// Files skipped because the owner already has a live file under their
    /// name, paired with the name they collided with.
    pub duplicates: Vec<DuplicateFile>,
    /// Files refused individually (oversize, empty name).
    pub rejected: Vec<RejectedFile>,
}

/// Ingests upload batches.
///
/// All mutation for one owner runs under that owner's lock, so the
/// dedup check and the subsequent registration are a single critical
/// section: two concurrent uploads of the same name can never both
/// register.
#[derive(Debug)]
pub struct UploadIngestor {
    /// File metadata registry.
    registry: Arc<dyn FileRegistry>,
    /// Blob storage.
    blobs: BlobManager,
    /// Name-to-category mapping.
    classifier: CategoryClassifier,
    /// Batch limits.
    config: UploadConfig,
    /// One lock per owner; entries are created on first upload and kept.
    owner_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl UploadIngestor {
    /// Creates a new ingestor.
    pub fn new(registry: Arc<dyn FileRegistry>, blobs: BlobManager, config: UploadConfig) -> Self {
        Self {
            registry,
            blobs,
            classifier: CategoryClassifier::new(),
            config,
            owner_locks: DashMap::new(),
        }
    }

    /// Ingest a spooled batch for the authenticated owner.
    ///
    /// An empty batch and an oversized batch are whole-batch validation
    /// errors; on the latter every spooled blob is released before the
    /// error returns. Per-file problems (duplicate name, pre-rejected
    /// files) never fail the batch; they are reported in the per-file
    /// lists of the returned [`IngestReport`].
    pub async fn ingest(
        &self,
        ctx: &RequestContext,
        batch: UploadBatch,
    ) -> AppResult<IngestReport> {
        if batch.files.is_empty() && batch.rejected.is_empty() {
            return Err(AppError::validation("No files uploaded"));
        }
        if batch.files.len() > self.config.max_batch_files {
            self.discard_all(batch.files).await;
            return Err(AppError::validation(format!(
                "Too many files: at most {} per upload",
                self.config.max_batch_files
            )));
        }

        let lock = self.owner_lock(ctx.owner_id);
        let _guard = lock.lock().await;

        // Names live at batch start. Uploads of the same name later in the
        // same batch also count as duplicates, so the set grows as we go.
        let mut live_names: std::collections::HashSet<String> = self
            .registry
            .list_by_owner(ctx.owner_id)
            .await?
            .into_iter()
            .map(|r| r.original_name)
            .collect();

        let mut report = IngestReport {
            rejected: batch.rejected,
            ..IngestReport::default()
        };

        let mut queue = batch.files.into_iter();
        while let Some(file) = queue.next() {
            if live_names.contains(&file.name) {
                self.discard(file.blob).await;
                report.duplicates.push(DuplicateFile {
                    existing_file: file.name.clone(),
                    name: file.name,
                });
                continue;
            }

            let new = NewFileRecord {
                owner_id: ctx.owner_id,
                original_name: file.name.clone(),
                stored_name: file.blob.stored_name.clone(),
                size: file.blob.size,
                mime_type: file.mime_type.clone(),
                category: self.classifier.classify(&file.name),
            };

            match self.registry.register(new).await {
                Ok(record) => {
                    live_names.insert(record.original_name.clone());
                    report.uploaded.push(record);
                }
                Err(e) => {
                    // Nothing past this point registers; every spooled blob
                    // without a record must go.
                    self.discard(file.blob).await;
                    self.discard_all(queue.collect()).await;
                    return Err(e);
                }
            }
        }

        info!(
            owner_id = %ctx.owner_id,
            username = %ctx.username,
            uploaded = report.uploaded.len(),
            duplicates = report.duplicates.len(),
            rejected = report.rejected.len(),
            "Upload batch ingested"
        );

        Ok(report)
    }

    /// Release one spooled blob that will not be registered.
    async fn discard(&self, blob: StoredBlob) {
        if let Err(e) = self.blobs.release(&blob.stored_name).await {
            warn!(
                stored_name = %blob.stored_name,
                error = %e,
                "Failed to release unregistered blob"
            );
        }
    }

    async fn discard_all(&self, files: Vec<SpooledFile>) {
        for file in files {
            self.discard(file.blob).await;
        }
    }

    fn owner_lock(&self, owner_id: Uuid) -> Arc<Mutex<()>> {
        self.owner_locks
            .entry(owner_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
