use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::auth::RequireStaff;
use crate::server::AppState;
use crate::server::dto::{CreateMatchRequest, MessageResponse, UpdateMatchRequest};
use crate::server::response::{
    ApiError, ApiResponse, DEFAULT_PAGE_SIZE, StoreOptionExt, StoreResultExt,
};
use crate::types::Match;

pub async fn list_matches(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let matches = state
        .store
        .list_matches(DEFAULT_PAGE_SIZE)
        .api_err("Failed to list matches")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(matches)))
}

pub async fn get_match(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let game = state
        .store
        .get_match(&id)
        .api_err("Failed to get match")?
        .or_not_found("Match not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(game)))
}

pub async fn create_match(
    _staff: RequireStaff,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMatchRequest>,
) -> impl IntoResponse {
    if req.home_team.trim().is_empty() || req.away_team.trim().is_empty() {
        return Err(ApiError::bad_request("Team names cannot be empty"));
    }

    // The tournament link is optional but must point at a real tournament.
    if let Some(ref tournament_id) = req.tournament_id {
        state
            .store
            .get_tournament(tournament_id)
            .api_err("Failed to check tournament")?
            .ok_or_else(|| ApiError::bad_request("Unknown tournament"))?;
    }

    let game = Match {
        id: Uuid::new_v4().to_string(),
        tournament_id: req.tournament_id,
        home_team: req.home_team,
        away_team: req.away_team,
        scheduled_on: req.scheduled_on,
        starts_at: req.starts_at,
        venue: req.venue,
        home_score: None,
        away_score: None,
    };

    state
        .store
        .create_match(&game)
        .api_err("Failed to create match")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(game))))
}

pub async fn update_match(
    _staff: RequireStaff,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateMatchRequest>,
) -> impl IntoResponse {
    if req.is_empty() {
        return Err(ApiError::bad_request("No recognized fields to update"));
    }

    let mut game = state
        .store
        .get_match(&id)
        .api_err("Failed to get match")?
        .or_not_found("Match not found")?;

    if let Some(home_team) = req.home_team {
        game.home_team = home_team;
    }
    if let Some(away_team) = req.away_team {
        game.away_team = away_team;
    }
    if let Some(scheduled_on) = req.scheduled_on {
        game.scheduled_on = scheduled_on;
    }
    if let Some(starts_at) = req.starts_at {
        game.starts_at = starts_at;
    }
    if let Some(venue) = req.venue {
        game.venue = venue;
    }
    if let Some(home_score) = req.home_score {
        game.home_score = Some(home_score);
    }
    if let Some(away_score) = req.away_score {
        game.away_score = Some(away_score);
    }

    state
        .store
        .update_match(&game)
        .api_err("Failed to update match")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(game)))
}

pub async fn delete_match(
    _staff: RequireStaff,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_match(&id)
        .api_err("Failed to delete match")?;

    if !deleted {
        return Err(ApiError::not_found("Match not found"));
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(MessageResponse::new(
        "Match deleted",
    ))))
}
