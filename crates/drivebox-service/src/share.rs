//! Share tokens — minting, decoding, validation, and public access.

use std::str::FromStr;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE as BASE64;
use chrono::Utc;
use tracing::info;

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::traits::blob::ByteStream;
use drivebox_entity::file::{FileRecord, SharePermission};
use drivebox_registry::FileRegistry;
use drivebox_storage::BlobManager;

use crate::context::RequestContext;

/// A successfully decoded share token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    /// The file the token was minted for.
    pub file_id: u64,
    /// Mint time in milliseconds since epoch.
    pub minted_at_millis: i64,
    /// The granted permission.
    pub permission: SharePermission,
}

/// Mints and decodes opaque bearer tokens.
///
/// A token is the base64 encoding of `"{file_id}-{millis}-{permission}"`,
/// using the URL-safe alphabet so tokens survive a path segment verbatim.
/// Both numeric fields are purely decimal, so the hyphen separator is
/// unambiguous. The encoding is reversible by design; authorization never
/// rests on decoding alone but on exact equality with the token stored on
/// the record (see [`ShareTokenCodec::validate`]).
#[derive(Debug, Clone, Default)]
pub struct ShareTokenCodec;

impl ShareTokenCodec {
    /// Creates a new codec.
    pub fn new() -> Self {
        Self
    }

    /// Produce a token for the given file and permission, stamped with the
    /// current time.
    pub fn mint(&self, file_id: u64, permission: SharePermission) -> String {
        let raw = format!(
            "{file_id}-{}-{}",
            Utc::now().timestamp_millis(),
            permission.as_str()
        );
        BASE64.encode(raw)
    }

    /// Reverse the encoding.
    ///
    /// Fails (generically) if the token is not base64, does not have exactly
    /// three hyphen-separated fields, the id or timestamp is non-numeric, or
    /// the permission is unknown.
    pub fn decode(&self, token: &str) -> AppResult<DecodedToken> {
        let raw = BASE64
            .decode(token)
            .map_err(|_| AppError::invalid_link())?;
        let raw = String::from_utf8(raw).map_err(|_| AppError::invalid_link())?;

        let fields: Vec<&str> = raw.split('-').collect();
        let &[id, millis, permission] = fields.as_slice() else {
            return Err(AppError::invalid_link());
        };

        Ok(DecodedToken {
            file_id: id.parse().map_err(|_| AppError::invalid_link())?,
            minted_at_millis: millis.parse().map_err(|_| AppError::invalid_link())?,
            permission: SharePermission::from_str(permission)
                .map_err(|_| AppError::invalid_link())?,
        })
    }

    /// Validate a presented token against the record it claims to grant
    /// access to.
    ///
    /// Decoding alone is forgeable (the format is reversible); the token is
    /// only valid if it is *exactly* the one currently stored on the record.
    pub fn validate(&self, token: &str, record: &FileRecord) -> AppResult<DecodedToken> {
        let decoded = self.decode(token)?;
        if record.share_token.as_deref() != Some(token) {
            return Err(AppError::invalid_link());
        }
        Ok(decoded)
    }
}

/// A minted share grant, returned to the file owner.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ShareGrant {
    /// The bearer token.
    pub token: String,
    /// The granted permission.
    pub permission: SharePermission,
}

/// A resolved public share access.
pub struct SharedFile {
    /// The shared record.
    pub record: FileRecord,
    /// The permission the presented token grants.
    pub permission: SharePermission,
    /// The file bytes.
    pub stream: ByteStream,
}

/// Owner-side minting and public token access.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// File metadata registry.
    registry: Arc<dyn FileRegistry>,
    /// Blob storage.
    blobs: BlobManager,
    /// Token codec.
    codec: ShareTokenCodec,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(registry: Arc<dyn FileRegistry>, blobs: BlobManager) -> Self {
        Self {
            registry,
            blobs,
            codec: ShareTokenCodec::new(),
        }
    }

    /// Mint a share token for an owned file.
    ///
    /// The permission arrives as a raw string from the request; anything
    /// other than `view`/`download` is a validation error. Minting
    /// overwrites any previously active token for the file.
    pub async fn mint_share(
        &self,
        ctx: &RequestContext,
        file_id: u64,
        permission: &str,
    ) -> AppResult<ShareGrant> {
        let permission = SharePermission::from_str(permission)
            .map_err(|_| AppError::validation("Invalid permissions"))?;

        let record = self
            .registry
            .find_by_owner(ctx.owner_id, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let token = self.codec.mint(record.id, permission);
        let updated = self
            .registry
            .set_share(ctx.owner_id, record.id, &token, permission)
            .await?;
        if !updated {
            // The record vanished between lookup and update.
            return Err(AppError::not_found("File not found"));
        }

        info!(
            owner_id = %ctx.owner_id,
            file_id,
            permission = %permission,
            "Share token minted"
        );

        Ok(ShareGrant { token, permission })
    }

    /// Resolve a presented token to a shared file, with no owner context.
    ///
    /// Every failure (malformed token, unknown token, stale token after a
    /// re-mint) is reported as the same generic invalid-link error.
    pub async fn access_shared(&self, token: &str) -> AppResult<SharedFile> {
        self.codec.decode(token)?;

        let record = self
            .registry
            .find_by_token(token)
            .await?
            .ok_or_else(AppError::invalid_link)?;

        let decoded = self.codec.validate(token, &record)?;

        let stream = self
            .blobs
            .read(&record.stored_name)
            .await
            .map_err(|_| AppError::invalid_link())?;

        Ok(SharedFile {
            record,
            permission: decoded.permission,
            stream,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use drivebox_entity::file::Category;
    use uuid::Uuid;

    fn record_with_token(token: Option<&str>) -> FileRecord {
        FileRecord {
            id: 42,
            owner_id: Uuid::new_v4(),
            original_name: "report.pdf".to_string(),
            stored_name: "files-0-1.pdf".to_string(),
            size: 500,
            mime_type: "application/pdf".to_string(),
            category: Category::Documents,
            uploaded_at: Utc::now(),
            share_token: token.map(String::from),
            share_permission: token.map(|_| SharePermission::View),
        }
    }

    #[test]
    fn mint_decode_round_trip() {
        let codec = ShareTokenCodec::new();
        let token = codec.mint(42, SharePermission::View);

        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded.file_id, 42);
        assert_eq!(decoded.permission, SharePermission::View);
        assert!(decoded.minted_at_millis <= Utc::now().timestamp_millis());
    }

    #[test]
    fn token_is_url_safe() {
        let codec = ShareTokenCodec::new();
        let token = codec.mint(7, SharePermission::Download);
        assert!(token.is_ascii());
        assert!(!token.contains('/'));
        assert!(!token.contains('+'));
    }

    #[test]
    fn decode_rejects_malformed_tokens() {
        let codec = ShareTokenCodec::new();

        // Not base64 at all.
        assert!(codec.decode("!!!").is_err());
        // Wrong field count.
        assert!(codec.decode(&BASE64.encode("42-view")).is_err());
        assert!(codec.decode(&BASE64.encode("1-2-3-4")).is_err());
        // Non-numeric id / timestamp.
        assert!(codec.decode(&BASE64.encode("abc-123-view")).is_err());
        assert!(codec.decode(&BASE64.encode("42-abc-view")).is_err());
        // Unknown permission.
        assert!(codec.decode(&BASE64.encode("42-123-admin")).is_err());
    }

    #[test]
    fn validate_requires_exact_stored_token() {
        let codec = ShareTokenCodec::new();
        let token = codec.mint(42, SharePermission::View);
        let record = record_with_token(Some(&token));

        assert!(codec.validate(&token, &record).is_ok());

        // A forged token that decodes to the right file id still fails.
        let forged = BASE64.encode("42-1-view");
        assert!(codec.decode(&forged).is_ok());
        assert!(codec.validate(&forged, &record).is_err());

        // An unshared record matches nothing.
        let unshared = record_with_token(None);
        assert!(codec.validate(&token, &unshared).is_err());
    }

    #[test]
    fn flipping_any_character_breaks_validation() {
        let codec = ShareTokenCodec::new();
        let token = codec.mint(42, SharePermission::View);
        let record = record_with_token(Some(&token));

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == token {
                continue;
            }
            assert!(
                codec.validate(&tampered, &record).is_err(),
                "tampered token at index {i} validated"
            );
        }
    }
}
