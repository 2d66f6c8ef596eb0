//! Core traits defined in `drivebox-core` and implemented by other crates.

pub mod blob;

pub use blob::{BlobProvider, BlobSink, ByteStream};
