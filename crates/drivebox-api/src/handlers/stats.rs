//! Stats and category handlers.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;

use drivebox_entity::file::Category;
use drivebox_service::stats::StorageStats;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/stats
pub async fn get_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<StorageStats>>, ApiError> {
    let stats = state.stats_service.snapshot(&auth).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/categories — per-category file counts for the caller
pub async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<BTreeMap<Category, u64>>>, ApiError> {
    let stats = state.stats_service.snapshot(&auth).await?;

    let counts = Category::ALL
        .iter()
        .map(|&c| {
            let count = stats.categories.get(&c).map(|s| s.count).unwrap_or(0);
            (c, count)
        })
        .collect();
    Ok(Json(ApiResponse::ok(counts)))
}
