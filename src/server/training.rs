use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::auth::RequireReferent;
use crate::server::AppState;
use crate::server::dto::{CreateTrainingSlotRequest, MessageResponse, UpdateTrainingSlotRequest};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::types::TrainingSlot;

pub async fn list_training_slots(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let slots = state
        .store
        .list_training_slots()
        .api_err("Failed to list training schedule")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(slots)))
}

pub async fn create_training_slot(
    _referent: RequireReferent,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTrainingSlotRequest>,
) -> impl IntoResponse {
    if req.day.trim().is_empty() || req.kind.trim().is_empty() {
        return Err(ApiError::bad_request("Day and kind cannot be empty"));
    }
    if req.ends_at <= req.starts_at {
        return Err(ApiError::bad_request("Slot must end after it starts"));
    }

    let slot = TrainingSlot {
        id: Uuid::new_v4().to_string(),
        day: req.day,
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        kind: req.kind,
        required_license: req.required_license,
        description: req.description,
    };

    state
        .store
        .create_training_slot(&slot)
        .api_err("Failed to create training slot")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(slot))))
}

pub async fn update_training_slot(
    _referent: RequireReferent,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTrainingSlotRequest>,
) -> impl IntoResponse {
    if req.is_empty() {
        return Err(ApiError::bad_request("No recognized fields to update"));
    }

    let mut slot = state
        .store
        .get_training_slot(&id)
        .api_err("Failed to get training slot")?
        .or_not_found("Training slot not found")?;

    if let Some(day) = req.day {
        slot.day = day;
    }
    if let Some(starts_at) = req.starts_at {
        slot.starts_at = starts_at;
    }
    if let Some(ends_at) = req.ends_at {
        slot.ends_at = ends_at;
    }
    if let Some(kind) = req.kind {
        slot.kind = kind;
    }
    if let Some(required_license) = req.required_license {
        slot.required_license = Some(required_license);
    }
    if let Some(description) = req.description {
        slot.description = description;
    }

    if slot.ends_at <= slot.starts_at {
        return Err(ApiError::bad_request("Slot must end after it starts"));
    }

    state
        .store
        .update_training_slot(&slot)
        .api_err("Failed to update training slot")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(slot)))
}

pub async fn delete_training_slot(
    _referent: RequireReferent,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_training_slot(&id)
        .api_err("Failed to delete training slot")?;

    if !deleted {
        return Err(ApiError::not_found("Training slot not found"));
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(MessageResponse::new(
        "Training slot deleted",
    ))))
}
