//! Application assembly.

use axum::Router;

use drivebox_core::config::AppConfig;
use drivebox_core::result::AppResult;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete application: state wiring plus the router.
pub async fn build_app(config: AppConfig) -> AppResult<Router> {
    let state = AppState::build(config).await?;
    Ok(build_router(state))
}
