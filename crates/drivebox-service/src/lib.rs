//! # drivebox-service
//!
//! The file registry and ingestion/sharing engine. Services in this crate
//! own the invariants: per-owner dedup on ingest, owner-scoped access,
//! single-active-token sharing, and read-only stats aggregation.

pub mod classify;
pub mod context;
pub mod file;
pub mod ingest;
pub mod share;
pub mod stats;

pub use classify::CategoryClassifier;
pub use context::RequestContext;
pub use file::FileService;
pub use ingest::UploadIngestor;
pub use share::{ShareService, ShareTokenCodec};
pub use stats::StatsService;
