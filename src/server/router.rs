use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use super::dto::HealthResponse;
use super::response::ApiResponse;
use super::{achievements, auth_routes, matches, news, rankings, referent, tournaments, training, users};
use crate::auth::{Hasher, TokenService};
use crate::mail::Mailer;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub passwords: Hasher,
    pub mailer: Mailer,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, tokens: TokenService, mailer: Mailer) -> Self {
        Self {
            store,
            tokens,
            passwords: Hasher::new(),
            mailer,
        }
    }
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::success(HealthResponse {
        status: "ok",
        store: state.store.backend(),
    }))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

/// Builds the CORS layer from the configured allow-list.
/// An empty list or a `*` entry allows any origin.
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let list: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(list)
    }
}

fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Auth
        .route("/auth/register", post(auth_routes::register))
        .route("/auth/login", post(auth_routes::login))
        .route("/auth/forgot-password", post(auth_routes::forgot_password))
        .route("/auth/reset-password", post(auth_routes::reset_password))
        .route("/auth/referent-request", post(auth_routes::referent_request))
        .route("/auth/referent-verify", post(auth_routes::referent_verify))
        // Profile
        .route("/users/me", get(users::get_me))
        .route("/users/me", patch(users::update_me))
        .route("/users/me", delete(users::delete_me))
        // Achievement catalog
        .route("/achievements", get(achievements::list_achievements))
        // Tournaments
        .route("/tournaments", get(tournaments::list_tournaments))
        .route("/tournaments", post(tournaments::create_tournament))
        .route("/tournaments/{id}", get(tournaments::get_tournament))
        .route("/tournaments/{id}", patch(tournaments::update_tournament))
        .route("/tournaments/{id}", delete(tournaments::delete_tournament))
        .route("/tournaments/{id}/register", post(tournaments::register))
        // Matches
        .route("/matches", get(matches::list_matches))
        .route("/matches", post(matches::create_match))
        .route("/matches/{id}", get(matches::get_match))
        .route("/matches/{id}", patch(matches::update_match))
        .route("/matches/{id}", delete(matches::delete_match))
        // News
        .route("/news", get(news::list_news))
        .route("/news", post(news::create_news))
        .route("/news/{id}", get(news::get_news))
        .route("/news/{id}", patch(news::update_news))
        .route("/news/{id}", delete(news::delete_news))
        // Training schedule
        .route("/training-schedule", get(training::list_training_slots))
        .route("/training-schedule", post(training::create_training_slot))
        .route("/training-schedule/{id}", put(training::update_training_slot))
        .route(
            "/training-schedule/{id}",
            delete(training::delete_training_slot),
        )
        // Member management
        .route("/referent/users", get(referent::list_members))
        .route("/referent/users/{id}", patch(referent::update_member))
        .route("/referent/users/{id}", delete(referent::delete_member))
        .route(
            "/referent/users/{id}/toggle-license",
            patch(referent::toggle_license),
        )
        // Rankings
        .route("/rankings", get(rankings::list_rankings))
        // Health
        .route("/health", get(health))
}

pub fn create_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .with_state(state)
}
