//! # drivebox-registry
//!
//! The authoritative table of file metadata. Every operation that takes an
//! owner id is owner-scoped: a record owned by someone else behaves exactly
//! like a record that does not exist, so callers cannot probe for foreign
//! files.
//!
//! The trait is the seam for a future persistent registry; the shipped
//! implementation is [`memory::InMemoryRegistry`].

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use drivebox_core::result::AppResult;
use drivebox_entity::file::{FileRecord, NewFileRecord, SharePermission};

pub use memory::InMemoryRegistry;

/// Owner-scoped file metadata registry.
#[async_trait]
pub trait FileRegistry: Send + Sync + std::fmt::Debug + 'static {
    /// Assign a fresh id and insert the record.
    ///
    /// Fails with a conflict if the owner already has a live record with the
    /// same original name; callers are expected to have pre-checked the
    /// dedup invariant under their own critical section.
    async fn register(&self, new: NewFileRecord) -> AppResult<FileRecord>;

    /// All live records for the given owner, in insertion order.
    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FileRecord>>;

    /// Look up a single record by owner and id.
    ///
    /// A record owned by a different owner is reported as absent.
    async fn find_by_owner(&self, owner_id: Uuid, id: u64) -> AppResult<Option<FileRecord>>;

    /// Remove a record if it is owned by `owner_id`.
    ///
    /// Returns whether a record was removed.
    async fn delete(&self, owner_id: Uuid, id: u64) -> AppResult<bool>;

    /// Overwrite the share fields of an owned record.
    ///
    /// Any previously active token for the file stops resolving. Returns
    /// `false` (without touching anything) if the record is absent or owned
    /// by someone else.
    async fn set_share(
        &self,
        owner_id: Uuid,
        id: u64,
        token: &str,
        permission: SharePermission,
    ) -> AppResult<bool>;

    /// Global (not owner-scoped) lookup by share token.
    ///
    /// Matches only if the record's stored token equals `token` exactly;
    /// a token that merely decodes to a valid file id does not match.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<FileRecord>>;
}
