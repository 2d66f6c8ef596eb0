//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use drivebox_entity::file::FileRecord;
use drivebox_service::ingest::{DuplicateFile, RejectedFile};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<drivebox_entity::user::User> for UserResponse {
    fn from(user: drivebox_entity::user::User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Registration/login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed access token.
    pub token: String,
    /// The authenticated user.
    pub user: UserResponse,
}

/// Upload batch outcome.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    /// Files registered by this batch.
    pub uploaded: Vec<FileRecord>,
    /// Files skipped because a live file already uses their name, paired
    /// with the name they collided with.
    pub duplicates: Vec<DuplicateFile>,
    /// Files refused individually.
    pub rejected: Vec<RejectedFile>,
}

/// Share creation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    /// The bearer token.
    pub token: String,
    /// The granted permission.
    pub permissions: String,
    /// Absolute URL the shared file is reachable under.
    pub share_url: String,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}
