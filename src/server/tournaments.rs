use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::auth::{RequireStaff, RequireUser};
use crate::error::Error;
use crate::points;
use crate::server::AppState;
use crate::server::dto::{CreateTournamentRequest, MessageResponse, UpdateTournamentRequest};
use crate::server::response::{
    ApiError, ApiResponse, DEFAULT_PAGE_SIZE, StoreOptionExt, StoreResultExt,
};
use crate::server::validation::validate_title;
use crate::types::{Tournament, TournamentStatus};

pub async fn list_tournaments(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let tournaments = state
        .store
        .list_tournaments(DEFAULT_PAGE_SIZE)
        .api_err("Failed to list tournaments")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(tournaments)))
}

pub async fn get_tournament(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let tournament = state
        .store
        .get_tournament(&id)
        .api_err("Failed to get tournament")?
        .or_not_found("Tournament not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(tournament)))
}

pub async fn create_tournament(
    _staff: RequireStaff,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTournamentRequest>,
) -> impl IntoResponse {
    validate_title(&req.name, "Tournament")?;
    if req.ends_on < req.starts_on {
        return Err(ApiError::bad_request("End date precedes start date"));
    }
    if req.capacity < 1 {
        return Err(ApiError::bad_request("Capacity must be at least 1"));
    }

    let tournament = Tournament {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        description: req.description,
        starts_on: req.starts_on,
        ends_on: req.ends_on,
        status: TournamentStatus::Open,
        participants: Vec::new(),
        capacity: req.capacity,
        paid: req.paid,
        price_cents: req.price_cents,
    };

    state
        .store
        .create_tournament(&tournament)
        .api_err("Failed to create tournament")?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(tournament)),
    ))
}

pub async fn update_tournament(
    _staff: RequireStaff,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTournamentRequest>,
) -> impl IntoResponse {
    if req.is_empty() {
        return Err(ApiError::bad_request("No recognized fields to update"));
    }

    let mut tournament = state
        .store
        .get_tournament(&id)
        .api_err("Failed to get tournament")?
        .or_not_found("Tournament not found")?;

    if let Some(name) = req.name {
        validate_title(&name, "Tournament")?;
        tournament.name = name;
    }
    if let Some(description) = req.description {
        tournament.description = description;
    }
    if let Some(starts_on) = req.starts_on {
        tournament.starts_on = starts_on;
    }
    if let Some(ends_on) = req.ends_on {
        tournament.ends_on = ends_on;
    }
    if let Some(status) = req.status {
        tournament.status = status;
    }
    if let Some(capacity) = req.capacity {
        if capacity < tournament.participants.len() as i64 {
            return Err(ApiError::bad_request(
                "Capacity cannot drop below the current participant count",
            ));
        }
        tournament.capacity = capacity;
    }
    if let Some(paid) = req.paid {
        tournament.paid = paid;
    }
    if let Some(price_cents) = req.price_cents {
        tournament.price_cents = Some(price_cents);
    }

    if tournament.ends_on < tournament.starts_on {
        return Err(ApiError::bad_request("End date precedes start date"));
    }

    state
        .store
        .update_tournament(&tournament)
        .api_err("Failed to update tournament")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(tournament)))
}

pub async fn delete_tournament(
    _staff: RequireStaff,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_tournament(&id)
        .api_err("Failed to delete tournament")?;

    if !deleted {
        return Err(ApiError::not_found("Tournament not found"));
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(MessageResponse::new(
        "Tournament deleted",
    ))))
}

/// Registers the caller for a tournament and runs the achievement check.
///
/// Valid only while the tournament is open and below capacity, for a
/// licensed member who is not already a participant. On success the
/// participant is appended, the status flips to `full` when capacity is
/// reached, and the member's participation count feeds the achievement
/// engine.
pub async fn register(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if !user.licensed {
        return Err(ApiError::forbidden(
            "An active license is required to register",
        ));
    }

    let mut tournament = state
        .store
        .get_tournament(&id)
        .api_err("Failed to get tournament")?
        .or_not_found("Tournament not found")?;

    if tournament.status != TournamentStatus::Open {
        return Err(ApiError::bad_request("Registrations are closed"));
    }
    if tournament.participants.iter().any(|p| *p == user.id) {
        return Err(ApiError::bad_request("Already registered for this tournament"));
    }
    if tournament.participants.len() as i64 >= tournament.capacity {
        return Err(ApiError::bad_request("Tournament is full"));
    }

    match state.store.add_participant(&tournament.id, &user.id) {
        Ok(()) => {}
        Err(Error::AlreadyExists) => {
            return Err(ApiError::bad_request("Already registered for this tournament"));
        }
        Err(_) => return Err(ApiError::internal("Failed to register")),
    }
    tournament.participants.push(user.id.clone());

    if tournament.participants.len() as i64 >= tournament.capacity {
        tournament.status = TournamentStatus::Full;
        state
            .store
            .update_tournament(&tournament)
            .api_err("Failed to update tournament")?;
    }

    state
        .store
        .increment_participations(&user.id)
        .api_err("Failed to update participations")?;

    points::award_participation_achievements(state.store.as_ref(), &user.id)
        .api_err("Failed to check achievements")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(MessageResponse::new(
        "Registration confirmed",
    ))))
}
