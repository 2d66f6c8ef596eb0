//! Blob manager — stored-name generation and bounded retry over a provider.

use std::sync::Arc;

use bytes::Bytes;
use rand::RngExt;
use tracing::warn;

use drivebox_core::config::storage::StorageConfig;
use drivebox_core::result::AppResult;
use drivebox_core::traits::blob::{BlobProvider, BlobSink, ByteStream};

/// A blob fully written through [`BlobManager::begin_store`].
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// The generated stored name the blob lives under.
    pub stored_name: String,
    /// Total bytes written.
    pub size: u64,
}

/// An in-progress chunked blob write under a freshly generated stored name.
///
/// Exactly one of [`BlobUpload::finish`] or [`BlobUpload::abort`] must be
/// called; dropping the upload without either leaves a partial blob on disk.
pub struct BlobUpload {
    provider: Arc<dyn BlobProvider>,
    sink: Box<dyn BlobSink>,
    stored_name: String,
    size: u64,
}

impl BlobUpload {
    /// Bytes written so far.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Append a chunk.
    pub async fn write(&mut self, chunk: Bytes) -> AppResult<()> {
        self.size += chunk.len() as u64;
        self.sink.write(chunk).await
    }

    /// Flush and close the blob.
    pub async fn finish(self) -> AppResult<StoredBlob> {
        self.sink.finish().await?;
        Ok(StoredBlob {
            stored_name: self.stored_name,
            size: self.size,
        })
    }

    /// Discard the write and remove whatever was already on disk.
    pub async fn abort(self) -> AppResult<()> {
        // Close the handle before deleting.
        drop(self.sink);
        self.provider.delete(&self.stored_name).await
    }
}

/// Wraps a [`BlobProvider`] with the policies the ingestion path needs:
/// collision-free stored-name generation, the chunked write path for
/// uploads, and a bounded retry loop for `delete`, the one operation a
/// transient fault at the storage layer can leave half-done and that can
/// safely be replayed. Chunked writes cannot be retried, since the chunks
/// arrive from the client exactly once.
#[derive(Clone)]
pub struct BlobManager {
    /// The underlying provider.
    provider: Arc<dyn BlobProvider>,
    /// Attempts before a storage fault becomes fatal.
    retry_attempts: u32,
    /// Delay between attempts in milliseconds.
    retry_delay_ms: u64,
}

impl std::fmt::Debug for BlobManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobManager")
            .field("provider", &self.provider.provider_type())
            .field("retry_attempts", &self.retry_attempts)
            .finish()
    }
}

impl BlobManager {
    /// Creates a new manager over the given provider.
    pub fn new(provider: Arc<dyn BlobProvider>, config: &StorageConfig) -> Self {
        Self {
            provider,
            retry_attempts: config.retry_attempts.max(1),
            retry_delay_ms: config.retry_delay_ms,
        }
    }

    /// Open a chunked write under a freshly generated unique stored name.
    ///
    /// The name is `files-{millis}-{random}{ext}` where `ext` is taken from
    /// the original name; the random suffix is re-rolled if the name is
    /// already taken.
    pub async fn begin_store(&self, original_name: &str) -> AppResult<BlobUpload> {
        let stored_name = self.unique_stored_name(original_name).await?;
        let sink = self.provider.open_store(&stored_name).await?;
        Ok(BlobUpload {
            provider: Arc::clone(&self.provider),
            sink,
            stored_name,
            size: 0,
        })
    }

    /// Read a blob as a byte stream.
    pub async fn read(&self, stored_name: &str) -> AppResult<ByteStream> {
        self.provider.read(stored_name).await
    }

    /// Read a blob fully into memory.
    pub async fn read_bytes(&self, stored_name: &str) -> AppResult<Bytes> {
        self.provider.read_bytes(stored_name).await
    }

    /// Release a blob's bytes, retrying transient faults.
    pub async fn release(&self, stored_name: &str) -> AppResult<()> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.provider.delete(stored_name).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_retryable() && attempt < self.retry_attempts => {
                    warn!(
                        stored_name,
                        attempt,
                        error = %e,
                        "Blob delete failed, retrying"
                    );
                    tokio::time::sleep(std::time::Duration::from_millis(self.retry_delay_ms))
                        .await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Generate a stored name that no existing blob uses.
    async fn unique_stored_name(&self, original_name: &str) -> AppResult<String> {
        let ext = extension_of(original_name);
        loop {
            let millis = chrono::Utc::now().timestamp_millis();
            let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
            let candidate = format!("files-{millis}-{suffix}{ext}");
            if !self.provider.exists(&candidate).await? {
                return Ok(candidate);
            }
        }
    }
}

/// The extension of a file name including the leading dot, or empty.
fn extension_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => format!(".{ext}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalBlobProvider;

    async fn manager(dir: &tempfile::TempDir) -> BlobManager {
        let provider = LocalBlobProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        BlobManager::new(Arc::new(provider), &StorageConfig::default())
    }

    async fn store(mgr: &BlobManager, name: &str, data: &str) -> StoredBlob {
        let mut upload = mgr.begin_store(name).await.unwrap();
        upload.write(Bytes::from(data.to_string())).await.unwrap();
        upload.finish().await.unwrap()
    }

    #[test]
    fn extension_includes_dot() {
        assert_eq!(extension_of("report.pdf"), ".pdf");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of(".hidden"), "");
    }

    #[tokio::test]
    async fn begin_store_keeps_extension_and_is_unique() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = manager(&dir).await;

        let a = store(&mgr, "photo.jpg", "a").await;
        let b = store(&mgr, "photo.jpg", "b").await;

        assert!(a.stored_name.starts_with("files-") && a.stored_name.ends_with(".jpg"));
        assert_ne!(a.stored_name, b.stored_name);
        assert_eq!(mgr.read_bytes(&a.stored_name).await.unwrap(), Bytes::from("a"));
        assert_eq!(mgr.read_bytes(&b.stored_name).await.unwrap(), Bytes::from("b"));
    }

    #[tokio::test]
    async fn upload_counts_bytes_across_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = manager(&dir).await;

        let mut upload = mgr.begin_store("big.bin").await.unwrap();
        upload.write(Bytes::from(vec![0u8; 1000])).await.unwrap();
        assert_eq!(upload.size(), 1000);
        upload.write(Bytes::from(vec![0u8; 24])).await.unwrap();
        let blob = upload.finish().await.unwrap();

        assert_eq!(blob.size, 1024);
        assert_eq!(mgr.read_bytes(&blob.stored_name).await.unwrap().len(), 1024);
    }

    #[tokio::test]
    async fn abort_removes_the_partial_blob() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = manager(&dir).await;

        let mut upload = mgr.begin_store("partial.bin").await.unwrap();
        upload.write(Bytes::from("half")).await.unwrap();
        upload.abort().await.unwrap();

        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = manager(&dir).await;

        let blob = store(&mgr, "a.txt", "x").await;
        mgr.release(&blob.stored_name).await.unwrap();
        mgr.release(&blob.stored_name).await.unwrap();
    }
}
