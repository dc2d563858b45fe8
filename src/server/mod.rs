mod achievements;
mod auth_routes;
pub mod dto;
mod matches;
mod news;
mod rankings;
mod referent;
pub mod response;
mod router;
mod tournaments;
mod training;
mod users;
pub mod validation;

pub use router::{AppState, cors_layer, create_router};
