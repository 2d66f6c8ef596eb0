//! Read-only aggregation over an owner's files.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use drivebox_core::config::StatsConfig;
use drivebox_core::result::AppResult;
use drivebox_entity::file::{Category, FileRecord};
use drivebox_registry::FileRegistry;

use crate::context::RequestContext;

/// Per-category slice of an owner's storage.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CategoryStats {
    /// Number of files in the category.
    pub count: u64,
    /// Total bytes in the category.
    pub size: u64,
}

/// A snapshot of one owner's storage.
///
/// Derived entirely from the registry at request time; nothing here is
/// cached or incrementally maintained.
#[derive(Debug, Clone, Serialize)]
pub struct StorageStats {
    /// Total number of live files.
    pub total_files: u64,
    /// Total bytes across all live files.
    pub total_size: u64,
    /// Breakdown by category; only categories with at least one file appear.
    pub categories: BTreeMap<Category, CategoryStats>,
    /// The most recently uploaded files, newest first.
    pub recent: Vec<FileRecord>,
}

/// Computes storage snapshots.
#[derive(Debug, Clone)]
pub struct StatsService {
    /// File metadata registry.
    registry: Arc<dyn FileRegistry>,
    /// Snapshot shape.
    config: StatsConfig,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(registry: Arc<dyn FileRegistry>, config: StatsConfig) -> Self {
        Self { registry, config }
    }

    /// Aggregate the caller's files into a snapshot.
    ///
    /// Recency ties (same upload timestamp) are broken by insertion order,
    /// earliest-registered first, so the ordering is deterministic.
    pub async fn snapshot(&self, ctx: &RequestContext) -> AppResult<StorageStats> {
        let files = self.registry.list_by_owner(ctx.owner_id).await?;

        let mut categories: BTreeMap<Category, CategoryStats> = BTreeMap::new();
        let mut total_size = 0u64;
        for file in &files {
            let entry = categories.entry(file.category).or_default();
            entry.count += 1;
            entry.size += file.size;
            total_size += file.size;
        }

        let mut recent = files.clone();
        recent.sort_by(recency_order);
        recent.truncate(self.config.recent_limit);

        Ok(StorageStats {
            total_files: files.len() as u64,
            total_size,
            categories,
            recent,
        })
    }
}

/// Newest first; ids are monotonic, so on a timestamp tie the lower id
/// (registered earlier) comes first.
fn recency_order(a: &FileRecord, b: &FileRecord) -> std::cmp::Ordering {
    b.uploaded_at
        .cmp(&a.uploaded_at)
        .then_with(|| a.id.cmp(&b.id))
}
