use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse, DEFAULT_PAGE_SIZE, StoreResultExt};

/// Top licensed members by points. Public; password hashes never
/// serialize.
pub async fn list_rankings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rankings = state
        .store
        .top_users_by_points(DEFAULT_PAGE_SIZE)
        .api_err("Failed to list rankings")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(rankings)))
}
