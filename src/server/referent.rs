use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::auth::RequireReferent;
use crate::server::AppState;
use crate::server::dto::{MessageResponse, UpdateMemberRequest};
use crate::server::response::{
    ApiError, ApiResponse, DEFAULT_PAGE_SIZE, StoreOptionExt, StoreResultExt,
};
use crate::server::validation::validate_person_name;

pub async fn list_members(
    _referent: RequireReferent,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let members = state
        .store
        .list_users(DEFAULT_PAGE_SIZE)
        .api_err("Failed to list members")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(members)))
}

pub async fn update_member(
    _referent: RequireReferent,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateMemberRequest>,
) -> impl IntoResponse {
    if req.is_empty() {
        return Err(ApiError::bad_request("No recognized fields to update"));
    }

    let mut member = state
        .store
        .get_user(&id)
        .api_err("Failed to get member")?
        .or_not_found("Member not found")?;

    if let Some(first_name) = req.first_name {
        validate_person_name(&first_name, "First name")?;
        member.first_name = first_name;
    }
    if let Some(last_name) = req.last_name {
        validate_person_name(&last_name, "Last name")?;
        member.last_name = last_name;
    }
    if let Some(license_type) = req.license_type {
        member.license_type = license_type;
    }
    if let Some(licensed) = req.licensed {
        member.licensed = licensed;
    }
    if let Some(role) = req.role {
        member.role = role;
    }
    if let Some(points) = req.points {
        if points < 0 {
            return Err(ApiError::bad_request("Points cannot be negative"));
        }
        member.points = points;
    }
    if let Some(participations) = req.participations {
        if participations < 0 {
            return Err(ApiError::bad_request("Participations cannot be negative"));
        }
        member.participations = participations;
    }

    state
        .store
        .update_user(&member)
        .api_err("Failed to update member")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(member)))
}

pub async fn toggle_license(
    _referent: RequireReferent,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut member = state
        .store
        .get_user(&id)
        .api_err("Failed to get member")?
        .or_not_found("Member not found")?;

    member.licensed = !member.licensed;

    state
        .store
        .update_user(&member)
        .api_err("Failed to update member")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(member)))
}

pub async fn delete_member(
    _referent: RequireReferent,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_user(&id)
        .api_err("Failed to delete member")?;

    if !deleted {
        return Err(ApiError::not_found("Member not found"));
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(MessageResponse::new(
        "Member deleted",
    ))))
}
