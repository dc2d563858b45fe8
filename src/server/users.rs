use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::{
    EarnedAchievement, MessageResponse, ProfileResponse, UpdateProfileRequest,
};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::{validate_password, validate_person_name};
use crate::types::User;

/// Joins a user's grants against the catalog. Grants whose definition has
/// disappeared from the catalog are skipped.
pub fn earned_achievements(
    state: &AppState,
    user: &User,
) -> Result<Vec<EarnedAchievement>, ApiError> {
    let grants = state
        .store
        .list_user_grants(&user.id)
        .api_err("Failed to list achievements")?;

    let mut earned = Vec::with_capacity(grants.len());
    for grant in grants {
        if let Some(def) = state
            .store
            .get_achievement(&grant.achievement_id)
            .api_err("Failed to load achievement")?
        {
            earned.push(EarnedAchievement {
                id: def.id,
                name: def.name,
                description: def.description,
                icon: def.icon,
                points: def.points,
                granted_at: grant.granted_at,
            });
        }
    }
    Ok(earned)
}

pub async fn get_me(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let achievements = earned_achievements(&state, &user)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(ProfileResponse {
        user,
        achievements,
    })))
}

pub async fn update_me(
    RequireUser(mut user): RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    if req.is_empty() {
        return Err(ApiError::bad_request("No recognized fields to update"));
    }

    if let Some(first_name) = req.first_name {
        validate_person_name(&first_name, "First name")?;
        user.first_name = first_name;
    }
    if let Some(last_name) = req.last_name {
        validate_person_name(&last_name, "Last name")?;
        user.last_name = last_name;
    }
    if let Some(license_type) = req.license_type {
        user.license_type = license_type;
    }
    if let Some(licensed) = req.licensed {
        user.licensed = licensed;
    }
    if let Some(password) = req.password {
        validate_password(&password)?;
        user.password_hash = state
            .passwords
            .hash(&password)
            .api_err("Failed to hash password")?;
    }

    state
        .store
        .update_user(&user)
        .api_err("Failed to update profile")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(user)))
}

pub async fn delete_me(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    state
        .store
        .delete_user(&user.id)
        .api_err("Failed to delete account")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(MessageResponse::new(
        "Account deleted",
    ))))
}
