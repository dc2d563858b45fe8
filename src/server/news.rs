use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::RequireStaff;
use crate::server::AppState;
use crate::server::dto::{CreateNewsRequest, MessageResponse, UpdateNewsRequest};
use crate::server::response::{
    ApiError, ApiResponse, DEFAULT_PAGE_SIZE, StoreOptionExt, StoreResultExt,
};
use crate::server::validation::validate_title;
use crate::types::News;

pub async fn list_news(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let posts = state
        .store
        .list_news(DEFAULT_PAGE_SIZE)
        .api_err("Failed to list news")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(posts)))
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let post = state
        .store
        .get_news(&id)
        .api_err("Failed to get news")?
        .or_not_found("News post not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(post)))
}

pub async fn create_news(
    RequireStaff(author): RequireStaff,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateNewsRequest>,
) -> impl IntoResponse {
    validate_title(&req.title, "News")?;

    let post = News {
        id: Uuid::new_v4().to_string(),
        title: req.title,
        body: req.body,
        author_id: author.id.clone(),
        author_name: author.display_name(),
        published_at: Utc::now(),
        image_url: req.image_url,
    };

    state
        .store
        .create_news(&post)
        .api_err("Failed to create news")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(post))))
}

pub async fn update_news(
    _staff: RequireStaff,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateNewsRequest>,
) -> impl IntoResponse {
    if req.is_empty() {
        return Err(ApiError::bad_request("No recognized fields to update"));
    }

    let mut post = state
        .store
        .get_news(&id)
        .api_err("Failed to get news")?
        .or_not_found("News post not found")?;

    if let Some(title) = req.title {
        validate_title(&title, "News")?;
        post.title = title;
    }
    if let Some(body) = req.body {
        post.body = body;
    }
    if let Some(image_url) = req.image_url {
        post.image_url = Some(image_url);
    }

    state
        .store
        .update_news(&post)
        .api_err("Failed to update news")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(post)))
}

pub async fn delete_news(
    _staff: RequireStaff,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_news(&id)
        .api_err("Failed to delete news")?;

    if !deleted {
        return Err(ApiError::not_found("News post not found"));
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(MessageResponse::new(
        "News post deleted",
    ))))
}
