//! Blob store trait for pluggable durable byte storage.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// An in-progress blob write.
///
/// Chunks are appended in order; the blob is not durable until
/// [`BlobSink::finish`] returns. A sink that is dropped without `finish`
/// leaves a partial blob behind, so callers that abandon a write must
/// delete it through the provider.
#[async_trait]
pub trait BlobSink: Send {
    /// Append a chunk to the blob.
    async fn write(&mut self, chunk: Bytes) -> AppResult<()>;

    /// Flush and close the blob.
    async fn finish(self: Box<Self>) -> AppResult<()>;
}

/// Trait for durable byte storage backends.
///
/// A blob is addressed by an opaque stored name chosen by the caller at
/// write time; the registry records that name and it never changes for the
/// life of the blob. The [`BlobProvider`] trait is defined here in
/// `drivebox-core` and implemented in `drivebox-storage`.
#[async_trait]
pub trait BlobProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Write bytes under the given stored name.
    async fn store(&self, stored_name: &str, data: Bytes) -> AppResult<()>;

    /// Open a sink that writes a blob chunk by chunk under the given
    /// stored name. This is the write path for uploads too large to
    /// buffer in memory.
    async fn open_store(&self, stored_name: &str) -> AppResult<Box<dyn BlobSink>>;

    /// Read a blob and return its byte stream.
    async fn read(&self, stored_name: &str) -> AppResult<ByteStream>;

    /// Read a blob into memory as a complete byte vector.
    async fn read_bytes(&self, stored_name: &str) -> AppResult<Bytes>;

    /// Delete a blob. Deleting a missing blob is not an error.
    async fn delete(&self, stored_name: &str) -> AppResult<()>;

    /// Check whether a blob exists under the given stored name.
    async fn exists(&self, stored_name: &str) -> AppResult<bool>;
}
