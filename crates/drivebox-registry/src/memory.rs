//! In-memory registry implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_entity::file::{FileRecord, NewFileRecord, SharePermission};

use crate::FileRegistry;

/// In-memory [`FileRegistry`] indexed by owner and by id.
///
/// Records live in a per-owner `BTreeMap` keyed by id; since ids are
/// assigned monotonically, iterating a map yields insertion order. A
/// secondary index maps active share tokens back to their records.
/// Mutations to one owner's map are serialized by the owning shard lock;
/// reads of other owners proceed concurrently.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    /// Next id to assign; ids are unique for the registry's lifetime.
    next_id: AtomicU64,
    /// Owner id -> (file id -> record).
    owners: DashMap<Uuid, BTreeMap<u64, FileRecord>>,
    /// Active share token -> (owner id, file id).
    tokens: DashMap<String, (Uuid, u64)>,
}

impl InMemoryRegistry {
    /// Creates an empty registry. Ids start at 1.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            owners: DashMap::new(),
            tokens: DashMap::new(),
        }
    }
}

#[async_trait]
impl FileRegistry for InMemoryRegistry {
    async fn register(&self, new: NewFileRecord) -> AppResult<FileRecord> {
        let mut files = self.owners.entry(new.owner_id).or_default();

        if files
            .values()
            .any(|r| r.original_name == new.original_name)
        {
            return Err(AppError::conflict(format!(
                "A file named '{}' already exists for this owner",
                new.original_name
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = FileRecord {
            id,
            owner_id: new.owner_id,
            original_name: new.original_name,
            stored_name: new.stored_name,
            size: new.size,
            mime_type: new.mime_type,
            category: new.category,
            uploaded_at: Utc::now(),
            share_token: None,
            share_permission: None,
        };

        files.insert(id, record.clone());
        debug!(file_id = id, owner_id = %record.owner_id, "Registered file record");
        Ok(record)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FileRecord>> {
        Ok(self
            .owners
            .get(&owner_id)
            .map(|files| files.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by_owner(&self, owner_id: Uuid, id: u64) -> AppResult<Option<FileRecord>> {
        Ok(self
            .owners
            .get(&owner_id)
            .and_then(|files| files.get(&id).cloned()))
    }

    async fn delete(&self, owner_id: Uuid, id: u64) -> AppResult<bool> {
        let removed = self
            .owners
            .get_mut(&owner_id)
            .and_then(|mut files| files.remove(&id));

        match removed {
            Some(record) => {
                if let Some(token) = &record.share_token {
                    self.tokens.remove(token);
                }
                debug!(file_id = id, owner_id = %owner_id, "Deleted file record");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_share(
        &self,
        owner_id: Uuid,
        id: u64,
        token: &str,
        permission: SharePermission,
    ) -> AppResult<bool> {
        let Some(mut files) = self.owners.get_mut(&owner_id) else {
            return Ok(false);
        };
        let Some(record) = files.get_mut(&id) else {
            return Ok(false);
        };

        // A new mint replaces and invalidates the previous token.
        if let Some(old_token) = record.share_token.take() {
            self.tokens.remove(&old_token);
        }

        record.share_token = Some(token.to_string());
        record.share_permission = Some(permission);
        self.tokens.insert(token.to_string(), (owner_id, id));
        Ok(true)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<FileRecord>> {
        let Some(entry) = self.tokens.get(token) else {
            return Ok(None);
        };
        let (owner_id, id) = *entry;
        drop(entry);

        let record = self
            .owners
            .get(&owner_id)
            .and_then(|files| files.get(&id).cloned());

        // Exact token equality, not merely an index hit.
        Ok(record.filter(|r| r.share_token.as_deref() == Some(token)))
    }
}
