//! Auth handlers — register and login.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use drivebox_core::error::AppError;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, AuthResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user = state
        .directory
        .register(&req.username, &req.email, &req.password)?;
    let token = state.jwt_encoder.generate_token(user.id, &user.username)?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        token,
        user: user.into(),
    })))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user = state.directory.login(&req.email, &req.password)?;
    let token = state.jwt_encoder.generate_token(user.id, &user.username)?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        token,
        user: user.into(),
    })))
}
