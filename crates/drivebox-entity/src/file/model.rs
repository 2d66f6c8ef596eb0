//! File record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use super::share::SharePermission;

/// A file registered in DriveBox.
///
/// `share_token` and `share_permission` are either both present or both
/// absent; [`FileRecord::active_share`] is the only sanctioned way to read
/// them together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Registry-unique, monotonically assigned identifier.
    pub id: u64,
    /// The owning user.
    pub owner_id: Uuid,
    /// The name the file was uploaded under (including extension).
    pub original_name: String,
    /// Opaque handle into the blob store.
    pub stored_name: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME type reported at upload time.
    pub mime_type: String,
    /// Category derived from the original name's extension.
    pub category: Category,
    /// When the file was ingested.
    pub uploaded_at: DateTime<Utc>,
    /// The currently active share token, if the file is shared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_token: Option<String>,
    /// The permission granted by the active share token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_permission: Option<SharePermission>,
}

impl FileRecord {
    /// Returns the active share token and its permission, if any.
    pub fn active_share(&self) -> Option<(&str, SharePermission)> {
        match (&self.share_token, self.share_permission) {
            (Some(token), Some(permission)) => Some((token.as_str(), permission)),
            _ => None,
        }
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.original_name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.original_name)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to register a new file record.
///
/// The registry assigns the `id` and `uploaded_at` fields; freshly
/// registered files carry no share token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFileRecord {
    /// The owning user.
    pub owner_id: Uuid,
    /// The name the file was uploaded under.
    pub original_name: String,
    /// Opaque handle into the blob store.
    pub stored_name: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME type reported at upload time.
    pub mime_type: String,
    /// Category derived from the original name's extension.
    pub category: Category,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> FileRecord {
        FileRecord {
            id: 1,
            owner_id: Uuid::new_v4(),
            original_name: name.to_string(),
            stored_name: "files-0-0".to_string(),
            size: 10,
            mime_type: "application/octet-stream".to_string(),
            category: Category::Other,
            uploaded_at: Utc::now(),
            share_token: None,
            share_permission: None,
        }
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(record("PHOTO.JPG").extension(), Some("jpg".to_string()));
        assert_eq!(record("noext").extension(), None);
    }

    #[test]
    fn active_share_requires_both_fields() {
        let mut rec = record("a.txt");
        assert!(rec.active_share().is_none());

        rec.share_token = Some("tok".to_string());
        rec.share_permission = Some(SharePermission::View);
        assert_eq!(rec.active_share(), Some(("tok", SharePermission::View)));
    }
}
