//! File handlers — upload, list, download, delete.

use std::str::FromStr;

use axum::Json;
use axum::body::Body;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use tracing::warn;

use drivebox_core::error::AppError;
use drivebox_entity::file::{Category, FileRecord};
use drivebox_service::file::ListFilter;
use drivebox_service::ingest::{RejectedFile, SpooledFile, UploadBatch};
use drivebox_storage::{BlobUpload, StoredBlob};

use crate::dto::request::ListFilesQuery;
use crate::dto::response::{ApiResponse, UploadResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/files/upload — multipart batch upload
///
/// Each file field is streamed to blob storage chunk by chunk as it
/// arrives, so resident memory stays bounded by the multipart chunk size
/// no matter how large the request body is.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    let batch = read_batch(&state, &mut multipart).await?;

    let report = state.ingestor.ingest(&auth, batch).await?;
    Ok(Json(ApiResponse::ok(UploadResponse {
        uploaded: report.uploaded,
        duplicates: report.duplicates,
        rejected: report.rejected,
    })))
}

/// Spool every file field of the request to blob storage.
///
/// Fields above the per-file size cap land in the batch's rejected list
/// with their partial blob removed. If the transport fails mid-request,
/// every blob spooled so far is released before the error returns.
async fn read_batch(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<UploadBatch, ApiError> {
    let mut batch = UploadBatch::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                discard_batch(state, batch).await;
                return Err(AppError::validation(format!("Multipart error: {e}")).into());
            }
        };
        // Only file fields count; stray form values are ignored.
        let Some(name) = field.file_name().map(String::from) else {
            continue;
        };
        if name.is_empty() {
            batch.rejected.push(RejectedFile {
                name,
                reason: "File name must not be empty".to_string(),
            });
            continue;
        }
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        match spool_field(state, &name, field).await {
            Ok(Some(blob)) => batch.files.push(SpooledFile {
                name,
                mime_type,
                blob,
            }),
            Ok(None) => {
                warn!(name = %name, "Rejecting oversized file");
                batch.rejected.push(RejectedFile {
                    name,
                    reason: "File exceeds the maximum allowed size".to_string(),
                });
            }
            Err(e) => {
                discard_batch(state, batch).await;
                return Err(e);
            }
        }
    }

    Ok(batch)
}

/// Stream one field into a fresh blob.
///
/// Returns `None` (with the partial blob removed) as soon as the field
/// exceeds the configured per-file size.
async fn spool_field(
    state: &AppState,
    name: &str,
    mut field: Field<'_>,
) -> Result<Option<StoredBlob>, ApiError> {
    let max_bytes = state.config.upload.max_file_size_bytes;
    let mut upload = state.blobs.begin_store(name).await?;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                abort_spool(upload).await;
                return Err(AppError::validation(format!("Multipart error: {e}")).into());
            }
        };
        if upload.size() + chunk.len() as u64 > max_bytes {
            abort_spool(upload).await;
            return Ok(None);
        }
        if let Err(e) = upload.write(chunk).await {
            abort_spool(upload).await;
            return Err(e.into());
        }
    }

    Ok(Some(upload.finish().await?))
}

async fn abort_spool(upload: BlobUpload) {
    if let Err(e) = upload.abort().await {
        warn!(error = %e, "Failed to remove partial blob");
    }
}

/// Release every blob a failed request already spooled.
async fn discard_batch(state: &AppState, batch: UploadBatch) {
    for file in batch.files {
        if let Err(e) = state.blobs.release(&file.blob.stored_name).await {
            warn!(
                stored_name = %file.blob.stored_name,
                error = %e,
                "Failed to release spooled blob"
            );
        }
    }
}

/// GET /api/files?category=...&q=...
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<ApiResponse<Vec<FileRecord>>>, ApiError> {
    let category = query
        .category
        .as_deref()
        .map(Category::from_str)
        .transpose()
        .map_err(|_| AppError::validation("Invalid category"))?;

    let filter = ListFilter {
        category,
        search: query.search,
    };
    let files = state.file_service.list(&auth, &filter).await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// GET /api/files/download/{id}
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<u64>,
) -> Result<Response, ApiError> {
    let download = state.file_service.download(&auth, id).await?;
    stream_response(&download.record, download.stream, true)
}

/// DELETE /api/files/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<FileRecord>>, ApiError> {
    let record = state.file_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// Builds a streaming file response with the original name and MIME type.
pub(crate) fn stream_response(
    record: &FileRecord,
    stream: drivebox_core::traits::blob::ByteStream,
    attachment: bool,
) -> Result<Response, ApiError> {
    let disposition = if attachment {
        format!("attachment; filename=\"{}\"", record.original_name)
    } else {
        format!("inline; filename=\"{}\"", record.original_name)
    };

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, record.mime_type.clone())
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, record.size)
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
