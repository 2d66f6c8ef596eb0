//! # drivebox-storage
//!
//! Blob storage for DriveBox: the local filesystem provider and the
//! [`manager::BlobManager`] wrapper that adds unique stored-name generation
//! and bounded retry on top of any [`drivebox_core::traits::BlobProvider`].

pub mod local;
pub mod manager;

pub use local::LocalBlobProvider;
pub use manager::{BlobManager, BlobUpload, StoredBlob};
