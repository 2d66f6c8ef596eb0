//! Share handlers — token minting and public access.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;

use drivebox_entity::file::SharePermission;

use crate::dto::request::ShareRequest;
use crate::dto::response::{ApiResponse, ShareResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::handlers::file::stream_response;
use crate::state::AppState;

/// POST /api/files/{id}/share
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<u64>,
    Json(req): Json<ShareRequest>,
) -> Result<Json<ApiResponse<ShareResponse>>, ApiError> {
    let grant = state
        .share_service
        .mint_share(&auth, id, &req.permissions)
        .await?;

    let share_url = state.share_url(&grant.token);
    Ok(Json(ApiResponse::ok(ShareResponse {
        token: grant.token,
        permissions: grant.permission.to_string(),
        share_url,
    })))
}

/// GET /shared/{token} — public, no authentication
pub async fn access_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let shared = state.share_service.access_shared(&token).await?;

    // View shares render inline; download shares force a save dialog.
    let attachment = shared.permission == SharePermission::Download;
    stream_response(&shared.record, shared.stream, attachment)
}
