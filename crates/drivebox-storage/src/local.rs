//! Local filesystem blob provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_core::traits::blob::{BlobProvider, BlobSink, ByteStream};

/// Local filesystem blob provider.
///
/// Stored names are flat file names under the root directory; they come from
/// the blob manager and never contain path separators.
#[derive(Debug, Clone)]
pub struct LocalBlobProvider {
    /// Root directory for all stored blobs.
    root: PathBuf,
}

impl LocalBlobProvider {
    /// Create a new local blob provider rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a stored name to an absolute path within the root.
    fn resolve(&self, stored_name: &str) -> PathBuf {
        let clean = Path::new(stored_name)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(stored_name));
        self.root.join(clean)
    }
}

/// Open file handle for a chunk-by-chunk blob write.
#[derive(Debug)]
struct LocalBlobSink {
    file: fs::File,
    stored_name: String,
}

#[async_trait]
impl BlobSink for LocalBlobSink {
    async fn write(&mut self, chunk: Bytes) -> AppResult<()> {
        self.file.write_all(&chunk).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {}", self.stored_name),
                e,
            )
        })
    }

    async fn finish(self: Box<Self>) -> AppResult<()> {
        let mut file = self.file;
        file.flush().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to flush blob: {}", self.stored_name),
                e,
            )
        })
    }
}

#[async_trait]
impl BlobProvider for LocalBlobProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn store(&self, stored_name: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(stored_name);

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {stored_name}"),
                e,
            )
        })?;

        debug!(stored_name, bytes = data.len(), "Wrote blob");
        Ok(())
    }

    async fn open_store(&self, stored_name: &str) -> AppResult<Box<dyn BlobSink>> {
        let full_path = self.resolve(stored_name);
        let file = fs::File::create(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob: {stored_name}"),
                e,
            )
        })?;
        Ok(Box::new(LocalBlobSink {
            file,
            stored_name: stored_name.to_string(),
        }))
    }

    async fn read(&self, stored_name: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(stored_name);
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {stored_name}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open blob: {stored_name}"),
                    e,
                )
            }
        })?;

        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream.map(|r| r.map(|b| b.into()))))
    }

    async fn read_bytes(&self, stored_name: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(stored_name);
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {stored_name}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read blob: {stored_name}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, stored_name: &str) -> AppResult<()> {
        let full_path = self.resolve(stored_name);
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(stored_name, "Deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {stored_name}"),
                e,
            )),
        }
    }

    async fn exists(&self, stored_name: &str) -> AppResult<bool> {
        Ok(self.resolve(stored_name).exists())
    }
}
