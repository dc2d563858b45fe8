use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

/// Public achievement catalog.
pub async fn list_achievements(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let achievements = state
        .store
        .list_achievements()
        .api_err("Failed to list achievements")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(achievements)))
}
