//! Owner-scoped file access: listing, download, and deletion.

use std::sync::Arc;

use tracing::info;

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::traits::blob::ByteStream;
use drivebox_entity::file::{Category, FileRecord};
use drivebox_registry::FileRegistry;
use drivebox_storage::BlobManager;

use crate::context::RequestContext;

/// Optional filters applied when listing an owner's files.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Keep only files of this category.
    pub category: Option<Category>,
    /// Keep only files whose original name contains this string
    /// (case-insensitive).
    pub search: Option<String>,
}

/// A file resolved for download.
pub struct FileDownload {
    /// The record being downloaded.
    pub record: FileRecord,
    /// The file bytes.
    pub stream: ByteStream,
}

/// Listing, download, and deletion over the owner's own files.
///
/// Every operation takes the caller's [`RequestContext`]; a file owned by
/// someone else is indistinguishable from a file that does not exist.
#[derive(Debug, Clone)]
pub struct FileService {
    /// File metadata registry.
    registry: Arc<dyn FileRegistry>,
    /// Blob storage.
    blobs: BlobManager,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(registry: Arc<dyn FileRegistry>, blobs: BlobManager) -> Self {
        Self { registry, blobs }
    }

    /// List the caller's files in upload order, optionally filtered.
    pub async fn list(&self, ctx: &RequestContext, filter: &ListFilter) -> AppResult<Vec<FileRecord>> {
        let needle = filter.search.as_ref().map(|s| s.to_lowercase());

        let files = self
            .registry
            .list_by_owner(ctx.owner_id)
            .await?
            .into_iter()
            .filter(|r| filter.category.is_none_or(|c| r.category == c))
            .filter(|r| {
                needle
                    .as_ref()
                    .is_none_or(|n| r.original_name.to_lowercase().contains(n))
            })
            .collect();

        Ok(files)
    }

    /// Resolve one of the caller's files for download.
    pub async fn download(&self, ctx: &RequestContext, id: u64) -> AppResult<FileDownload> {
        let record = self
            .registry
            .find_by_owner(ctx.owner_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let stream = self.blobs.read(&record.stored_name).await?;
        Ok(FileDownload { record, stream })
    }

    /// Delete one of the caller's files.
    ///
    /// The record goes first so the name is immediately free for re-upload;
    /// the blob release follows. A failed release leaves an orphaned blob,
    /// never a dangling record.
    pub async fn delete(&self, ctx: &RequestContext, id: u64) -> AppResult<FileRecord> {
        let record = self
            .registry
            .find_by_owner(ctx.owner_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        if !self.registry.delete(ctx.owner_id, id).await? {
            return Err(AppError::not_found("File not found"));
        }
        self.blobs.release(&record.stored_name).await?;

        info!(
            owner_id = %ctx.owner_id,
            file_id = id,
            name = %record.original_name,
            "File deleted"
        );
        Ok(record)
    }
}
