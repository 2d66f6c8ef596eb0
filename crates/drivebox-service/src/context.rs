//! Per-request context passed explicitly into every service operation.

use uuid::Uuid;

/// Identity of the authenticated caller.
///
/// The HTTP boundary builds this from a verified credential; below the
/// boundary the owner id is always passed explicitly rather than read from
/// ambient request state.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user, used as the owner id on all records.
    pub owner_id: Uuid,
    /// Username, for logging.
    pub username: String,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(owner_id: Uuid, username: impl Into<String>) -> Self {
        Self {
            owner_id,
            username: username.into(),
        }
    }
}
